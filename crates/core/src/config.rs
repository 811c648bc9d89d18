use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::RosterError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Key lookup used while building config. `env_opt` in production, a map in tests.
type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Read a profiled var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_opt(lookup: Lookup<'_>, profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = lookup(&prefixed).filter(|s| !s.is_empty()) {
            return Some(v);
        }
    }
    lookup(key).filter(|s| !s.is_empty())
}

fn profiled_or(lookup: Lookup<'_>, profile: &str, key: &str, default: &str) -> String {
    profiled_opt(lookup, profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_u64(lookup: Lookup<'_>, profile: &str, key: &str, default: u64) -> u64 {
    profiled_opt(lookup, profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub mongo: MongoConfig,
    pub sportsdata: SportsDataConfig,
    pub sleeper: SleeperConfig,
    pub http: HttpConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `ROSTER_PROFILE`. When set (e.g. `STAGING`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_opt("ROSTER_PROFILE").unwrap_or_default();
        Self::from_lookup(&profile, &env_opt)
    }

    /// Build config for a named profile from an arbitrary key lookup.
    pub fn from_lookup(profile: &str, lookup: Lookup<'_>) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            mongo: MongoConfig::from_lookup(lookup, p),
            sportsdata: SportsDataConfig::from_lookup(lookup, p),
            sleeper: SleeperConfig::from_lookup(lookup, p),
            http: HttpConfig::from_lookup(lookup, p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Reject base URLs that cannot be parsed before any request is made.
    pub fn validate(&self) -> Result<(), RosterError> {
        for (name, base) in [
            ("SPORTSDATA_BASE_URL", &self.sportsdata.base_url),
            ("SLEEPER_BASE_URL", &self.sleeper.base_url),
        ] {
            url::Url::parse(base)
                .map_err(|e| RosterError::Config(format!("{name}={base} is not a valid URL: {e}")))?;
        }
        if self.mongo.database.is_empty() {
            return Err(RosterError::Config("MONGO_DATABASE must not be empty".into()));
        }
        if self.http.timeout_secs == 0 {
            return Err(RosterError::Config("HTTP_TIMEOUT_SECS must be at least 1".into()));
        }
        Ok(())
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  mongo:       uri={}, db={}", self.mongo.redacted_uri(), self.mongo.database);
        tracing::info!(
            "  sportsdata:  base_url={}, api_key={}",
            self.sportsdata.base_url,
            if self.sportsdata.api_key.is_some() { "(set)" } else { "(none)" }
        );
        tracing::info!("  sleeper:     base_url={}", self.sleeper.base_url);
        tracing::info!("  http:        timeout={}s", self.http.timeout_secs);
    }
}

// ── MongoDB ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

impl MongoConfig {
    fn from_lookup(lookup: Lookup<'_>, p: &str) -> Self {
        Self {
            uri: profiled_or(lookup, p, "MONGO_URI", "mongodb://mongodb:27017/nfl"),
            database: profiled_or(lookup, p, "MONGO_DATABASE", "nfl"),
        }
    }

    /// Connection string with any `user:password@` credentials masked.
    pub fn redacted_uri(&self) -> String {
        match (self.uri.find("://"), self.uri.rfind('@')) {
            (Some(scheme_end), Some(at)) if at > scheme_end => {
                format!("{}***{}", &self.uri[..scheme_end + 3], &self.uri[at..])
            }
            _ => self.uri.clone(),
        }
    }
}

// ── SportsDataIO ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SportsDataConfig {
    pub base_url: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl SportsDataConfig {
    fn from_lookup(lookup: Lookup<'_>, p: &str) -> Self {
        Self {
            base_url: profiled_or(lookup, p, "SPORTSDATA_BASE_URL", "https://api.sportsdata.io/api/nfl"),
            api_key: profiled_opt(lookup, p, "NFL_API_KEY"),
        }
    }
}

// ── Sleeper ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SleeperConfig {
    pub base_url: String,
}

impl SleeperConfig {
    fn from_lookup(lookup: Lookup<'_>, p: &str) -> Self {
        Self {
            base_url: profiled_or(lookup, p, "SLEEPER_BASE_URL", "https://api.sleeper.app/v1/nfl"),
        }
    }
}

// ── HTTP client ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

impl HttpConfig {
    fn from_lookup(lookup: Lookup<'_>, p: &str) -> Self {
        Self {
            timeout_secs: profiled_u64(lookup, p, "HTTP_TIMEOUT_SECS", 30),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
