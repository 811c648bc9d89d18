//! Single-attempt JSON GET client.
//!
//! Every request goes to `base_url + path` with the source's static headers
//! attached. Non-2xx responses, unreadable bodies and bodies that are not a
//! list or mapping of objects all become [`FetchError`]s; nothing is retried.

use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use roster_core::{Config, Payload};
use serde_json::Value;

use crate::error::FetchError;
use crate::traits::Source;

/// Header SportsDataIO expects the subscription key in.
pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

const USER_AGENT: &str = concat!("roster-sync/", env!("CARGO_PKG_VERSION"));

/// Everything an [`HttpSource`] needs to know about one provider.
#[derive(Debug, Clone)]
pub struct SourceSettings {
    /// Name used in logs.
    pub name: String,
    pub base_url: String,
    /// Static headers sent on every request.
    pub headers: Vec<(String, String)>,
    pub timeout: Duration,
}

impl SourceSettings {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            headers: Vec::new(),
            timeout,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// SportsDataIO: subscription key header when a key is configured.
    pub fn sportsdata(config: &Config) -> Self {
        let settings = Self::new("sportsdata", &config.sportsdata.base_url, config.http.timeout());
        match config.sportsdata.api_key {
            Some(ref key) => settings.with_header(SUBSCRIPTION_KEY_HEADER, key.as_str()),
            None => {
                tracing::warn!("NFL_API_KEY not set; sportsdata requests will be unauthenticated");
                settings
            }
        }
    }

    /// Sleeper: public API, no auth headers.
    pub fn sleeper(config: &Config) -> Self {
        Self::new("sleeper", &config.sleeper.base_url, config.http.timeout())
    }
}

/// Fetches JSON payloads over HTTP with a shared `reqwest::Client`.
#[derive(Debug)]
pub struct HttpSource {
    name: String,
    base_url: String,
    client: reqwest::Client,
}

impl HttpSource {
    /// Build the client. Header names and values are validated here so a bad
    /// credential fails before any request is made.
    pub fn new(settings: SourceSettings) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::with_capacity(settings.headers.len());
        for (name, value) in &settings.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                FetchError::InvalidHeader {
                    source_name: settings.name.clone(),
                    name: name.clone(),
                    reason: e.to_string(),
                }
            })?;
            let mut header_value = HeaderValue::from_str(value).map_err(|e| {
                FetchError::InvalidHeader {
                    source_name: settings.name.clone(),
                    name: name.clone(),
                    reason: e.to_string(),
                }
            })?;
            header_value.set_sensitive(true);
            headers.insert(header_name, header_value);
        }

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(settings.timeout)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            name: settings.name,
            base_url: settings.base_url,
            client,
        })
    }

    pub fn url_for(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }
}

#[async_trait::async_trait]
impl Source for HttpSource {
    async fn fetch(&self, path: &str) -> Result<Payload, FetchError> {
        let url = self.url_for(path);
        tracing::debug!(source = %self.name, %url, "fetching endpoint");
        let start = Instant::now();

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                endpoint: path.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                endpoint: path.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|source| FetchError::Request {
            endpoint: path.to_string(),
            source,
        })?;

        let value: Value = serde_json::from_slice(&body).map_err(|e| FetchError::Decode {
            endpoint: path.to_string(),
            reason: e.to_string(),
        })?;
        let payload = Payload::from_json(value).map_err(|e| FetchError::Decode {
            endpoint: path.to_string(),
            reason: e.to_string(),
        })?;

        tracing::info!(
            source = %self.name,
            endpoint = path,
            records = payload.len(),
            shape = payload.shape(),
            bytes = body.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "endpoint fetched"
        );

        Ok(payload)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// `base_url + path`, collapsing a doubled or missing slash at the seam.
fn join_url(base: &str, path: &str) -> String {
    if path.is_empty() {
        return base.to_string();
    }
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}
