//! MongoDB-backed [`DocumentStore`].

use futures::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::{Client, Collection, Database};
use roster_core::config::MongoConfig;
use roster_core::Record;
use serde_json::Value;
use tracing::info;

use crate::error::StoreError;
use crate::traits::DocumentStore;

/// One client per run, shared by every collection sync.
pub struct MongoStore {
    client: Client,
    db: Database,
}

impl MongoStore {
    /// Open the client and ping the database so a bad URI fails before any fetch.
    pub async fn connect(config: &MongoConfig) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(&config.uri).await?;
        let db = client.database(&config.database);
        db.run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        info!(uri = %config.redacted_uri(), db = %config.database, "Connected to MongoDB");
        Ok(Self { client, db })
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.db.collection::<Document>(name)
    }
}

#[async_trait::async_trait]
impl DocumentStore for MongoStore {
    async fn delete_all(&self, collection: &str) -> Result<u64, StoreError> {
        let result = self.collection(collection).delete_many(doc! {}, None).await?;
        Ok(result.deleted_count)
    }

    async fn insert_many(&self, collection: &str, records: &[Record]) -> Result<u64, StoreError> {
        if records.is_empty() {
            return Ok(0);
        }
        let docs = encode_records(records)?;
        let result = self.collection(collection).insert_many(docs, None).await?;
        Ok(result.inserted_ids.len() as u64)
    }

    async fn count(&self, collection: &str) -> Result<u64, StoreError> {
        Ok(self.collection(collection).count_documents(doc! {}, None).await?)
    }

    async fn find_all(&self, collection: &str) -> Result<Vec<Record>, StoreError> {
        let cursor = self.collection(collection).find(doc! {}, None).await?;
        let docs: Vec<Document> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(decode_document).collect())
    }

    async fn prepare(&self, _collection: &str, records: &[Record]) -> Result<(), StoreError> {
        encode_records(records).map(|_| ())
    }

    /// Waits for in-flight operations, then closes pooled connections.
    async fn shutdown(&self) {
        self.client.clone().shutdown().await;
    }

    fn name(&self) -> &str {
        "mongodb"
    }
}

/// Convert JSON records to BSON documents, failing on the first one BSON can't hold
/// (e.g. unsigned integers above `i64::MAX`).
pub fn encode_records(records: &[Record]) -> Result<Vec<Document>, StoreError> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            mongodb::bson::to_document(record).map_err(|e| StoreError::Encode {
                index,
                reason: e.to_string(),
            })
        })
        .collect()
}

/// BSON document back to a JSON record, minus the store-generated `_id`.
pub fn decode_document(mut doc: Document) -> Record {
    doc.remove("_id");
    match Bson::Document(doc).into_relaxed_extjson() {
        Value::Object(map) => map,
        _ => Record::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("test record must be an object"),
        }
    }

    #[test]
    fn encodes_nested_records() {
        let records = vec![record(json!({
            "PlayerID": 12345,
            "Name": "Some Player",
            "Active": true,
            "Positions": ["QB", "RB"],
            "Team": {"Key": "ARI"},
            "Injury": null
        }))];
        let docs = encode_records(&records).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].get_str("Name").unwrap(), "Some Player");
        assert!(docs[0].get_bool("Active").unwrap());
        assert_eq!(docs[0].get_document("Team").unwrap().get_str("Key").unwrap(), "ARI");
    }

    #[test]
    fn rejects_out_of_range_unsigned_integers() {
        let records = vec![record(json!({"ok": 1})), record(json!({"big": u64::MAX}))];
        let err = encode_records(&records).unwrap_err();
        assert!(matches!(err, StoreError::Encode { index: 1, .. }));
    }

    #[test]
    fn decode_strips_generated_id() {
        let mut doc = doc! { "Key": "ATL", "TeamID": 2_i64 };
        doc.insert("_id", mongodb::bson::oid::ObjectId::new());

        let decoded = decode_document(doc);
        assert!(!decoded.contains_key("_id"));
        assert_eq!(decoded["Key"], json!("ATL"));
        assert_eq!(decoded["TeamID"], json!(2));
    }
}
