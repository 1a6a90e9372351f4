//! VVS departure feed HTTP client.
//!
//! The feed is served by a small proxy endpoint that answers
//! `?type=departures&station=<id>` with a JSON array of departures.
//! The client is injected behind the [`Transport`] trait so the fetch
//! pipeline can run against a mock in tests.

use std::future::Future;

use super::error::FetchError;
use super::types::RawDeparture;

/// Default URL of the departure proxy endpoint.
const DEFAULT_BASE_URL: &str = "http://localhost/vvs.php";

/// A source of raw departure boards.
///
/// Implemented by [`VvsClient`] for the real endpoint and by
/// [`MockVvsClient`](super::MockVvsClient) for tests.
pub trait Transport: Send + Sync {
    /// Fetch the current departure board for a station.
    fn departures(
        &self,
        station: &str,
    ) -> impl Future<Output = Result<Vec<RawDeparture>, FetchError>> + Send;
}

/// Configuration for the VVS client.
#[derive(Debug, Clone)]
pub struct VvsConfig {
    /// URL of the departure proxy endpoint.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl VvsConfig {
    /// Create a config with the default endpoint URL.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom endpoint URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for VvsConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// HTTP client for the VVS departure feed.
#[derive(Debug, Clone)]
pub struct VvsClient {
    http: reqwest::Client,
    base_url: String,
}

impl VvsClient {
    /// Create a new client with the given configuration.
    pub fn new(config: VvsConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    async fn request_departures(&self, station: &str) -> Result<Vec<RawDeparture>, FetchError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("type", "departures"), ("station", station)])
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let reason = response.text().await.unwrap_or_default();
            return Err(FetchError::Api {
                status: status.as_u16().to_string(),
                reason,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| FetchError::Json {
            message: e.to_string(),
        })
    }
}

impl Transport for VvsClient {
    fn departures(
        &self,
        station: &str,
    ) -> impl Future<Output = Result<Vec<RawDeparture>, FetchError>> + Send {
        self.request_departures(station)
    }
}
