//! End-to-end runs: HttpSource against a local axum server, MemoryStore as destination.
//!
//! The server mimics the SportsDataIO and Sleeper paths so the real endpoint
//! tables can be driven through the orchestrator.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use roster_core::{EndpointTable, Record};
use roster_ingest::job::{SLEEPER_ENDPOINTS, SPORTSDATA_ENDPOINTS};
use roster_ingest::{EntryOutcome, Orchestrator};
use roster_source::{FetchError, HttpSource, SourceSettings};
use roster_storage::{CollectionSynchronizer, MemoryStore};

const TIMEOUT: Duration = Duration::from_secs(5);

fn rec(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        _ => panic!("test record must be an object"),
    }
}

async fn spawn(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    addr
}

fn orchestrator(addr: SocketAddr, store: Arc<MemoryStore>) -> Orchestrator {
    let settings = SourceSettings::new("test", format!("http://{addr}"), TIMEOUT);
    let source = HttpSource::new(settings).unwrap();
    Orchestrator::new(
        Arc::new(source),
        CollectionSynchronizer::new(store),
        "test ingestion completed.",
    )
}

#[tokio::test]
async fn teams_replace_prior_contents() {
    let app = Router::new().route(
        "/fantasy/json/Teams",
        get(|| async {
            Json(json!([
                {"TeamID": 1, "Key": "ARI"},
                {"TeamID": 2, "Key": "ATL"}
            ]))
        }),
    );
    let addr = spawn(app).await;

    let store = Arc::new(MemoryStore::new());
    store
        .seed("teams", vec![rec(json!({"TeamID": 99, "Key": "OLD"}))])
        .await;

    let table = EndpointTable::from_pairs(&[("teams", "/fantasy/json/Teams")]).unwrap();
    let report = orchestrator(addr, store.clone()).run(&table).await;

    assert!(report.is_clean());
    assert_eq!(
        store.snapshot("teams").await,
        vec![
            rec(json!({"TeamID": 1, "Key": "ARI"})),
            rec(json!({"TeamID": 2, "Key": "ATL"})),
        ]
    );
}

#[tokio::test]
async fn server_error_leaves_collection_and_run_continues() {
    let app = Router::new()
        .route(
            "/fantasy/json/Teams",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        )
        .route(
            "/fantasy/json/FantasyPlayers",
            get(|| async { Json(json!([{"PlayerID": 7, "Name": "Someone"}])) }),
        );
    let addr = spawn(app).await;

    let store = Arc::new(MemoryStore::new());
    let stale = vec![rec(json!({"TeamID": 99, "Key": "OLD"}))];
    store.seed("teams", stale.clone()).await;

    let table = EndpointTable::from_pairs(SPORTSDATA_ENDPOINTS).unwrap();
    let report = orchestrator(addr, store.clone()).run(&table).await;

    assert_eq!(report.failed(), 1);
    assert!(matches!(
        report.entry("teams").unwrap().outcome,
        EntryOutcome::FetchFailed(FetchError::Status { status: 500, .. })
    ));
    assert_eq!(store.snapshot("teams").await, stale);
    assert_eq!(store.snapshot("fantasy_players").await.len(), 1);
}

#[tokio::test]
async fn sleeper_mapping_is_stored_as_records() {
    let app = Router::new().route(
        "/players/nfl",
        get(|| async {
            Json(json!({
                "102": {"player_id": "102", "position": "WR"},
                "101": {"player_id": "101", "position": "QB"}
            }))
        }),
    );
    let addr = spawn(app).await;

    let store = Arc::new(MemoryStore::new());
    let table = EndpointTable::from_pairs(SLEEPER_ENDPOINTS).unwrap();
    let report = orchestrator(addr, store.clone()).run(&table).await;

    assert!(matches!(
        report.entry("players").unwrap().outcome,
        EntryOutcome::Synced { count: 2, removed: 0 }
    ));
    let mut ids: Vec<String> = store
        .snapshot("players")
        .await
        .iter()
        .map(|r| r["player_id"].as_str().unwrap().to_string())
        .collect();
    ids.sort();
    assert_eq!(ids, vec!["101", "102"]);
}

#[tokio::test]
async fn empty_array_is_skipped_not_wiped() {
    let app = Router::new().route("/fantasy/json/Teams", get(|| async { Json(json!([])) }));
    let addr = spawn(app).await;

    let store = Arc::new(MemoryStore::new());
    let stale = vec![rec(json!({"TeamID": 99}))];
    store.seed("teams", stale.clone()).await;

    let table = EndpointTable::from_pairs(&[("teams", "/fantasy/json/Teams")]).unwrap();
    let report = orchestrator(addr, store.clone()).run(&table).await;

    assert!(report.is_clean());
    assert!(matches!(
        report.entry("teams").unwrap().outcome,
        EntryOutcome::Skipped { ref reason } if reason == "empty payload"
    ));
    assert_eq!(store.snapshot("teams").await, stale);
    assert!(store.calls().await.is_empty());
}

#[tokio::test]
async fn malformed_body_never_reaches_the_store() {
    let app = Router::new().route(
        "/fantasy/json/Teams",
        get(|| async { Json(json!([{"TeamID": 1}, "not an object"])) }),
    );
    let addr = spawn(app).await;

    let store = Arc::new(MemoryStore::new());
    let table = EndpointTable::from_pairs(&[("teams", "/fantasy/json/Teams")]).unwrap();
    let report = orchestrator(addr, store.clone()).run(&table).await;

    assert!(matches!(
        report.entry("teams").unwrap().outcome,
        EntryOutcome::FetchFailed(FetchError::Decode { .. })
    ));
    assert!(store.calls().await.is_empty());
}

#[tokio::test]
async fn parallel_run_keeps_failures_isolated() {
    let app = Router::new()
        .route("/a", get(|| async { StatusCode::BAD_GATEWAY }))
        .route("/b", get(|| async { Json(json!([{"id": 1}])) }))
        .route("/c", get(|| async { Json(json!([{"id": 1}, {"id": 2}])) }));
    let addr = spawn(app).await;

    let store = Arc::new(MemoryStore::new());
    let table = EndpointTable::from_pairs(&[("a", "/a"), ("b", "/b"), ("c", "/c")]).unwrap();
    let report = orchestrator(addr, store.clone())
        .with_concurrency(3)
        .run(&table)
        .await;

    let names: Vec<_> = report.entries.iter().map(|e| e.collection.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
    assert_eq!(report.failed(), 1);
    assert_eq!(store.snapshot("b").await.len(), 1);
    assert_eq!(store.snapshot("c").await.len(), 2);
}
