use crate::errors::CounterError;
use crate::models::{CounterKey, CounterResponse, Endpoint};
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.countapi.xyz";

/// Thin client for a CountAPI compatible counter service.
#[derive(Debug, Clone)]
pub struct CounterClient {
    http: reqwest::Client,
    base_url: String,
}

impl CounterClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http(reqwest::Client::new(), base_url)
    }

    pub fn with_http(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn url(&self, endpoint: Endpoint, namespace: &str, key: &CounterKey) -> String {
        format!(
            "{}/{}/{}/{}",
            self.base_url,
            endpoint.as_str(),
            urlencoding::encode(namespace),
            urlencoding::encode(key.as_str()),
        )
    }

    /// One best-effort request. The status code is not inspected; any body
    /// that decodes as a counter response is accepted.
    pub async fn fetch(
        &self,
        endpoint: Endpoint,
        namespace: &str,
        key: &CounterKey,
    ) -> Result<CounterResponse, CounterError> {
        let url = self.url(endpoint, namespace, key);
        debug!("requesting {url}");

        let body = self
            .http
            .get(&url)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .await?
            .bytes()
            .await?;

        Ok(serde_json::from_slice(&body)?)
    }
}

impl Default for CounterClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
