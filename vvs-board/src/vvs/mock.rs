//! Mock VVS client for testing without a live endpoint.
//!
//! Serves canned departure boards keyed by station, or a canned failure,
//! through the same [`Transport`] interface as the real client.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::client::Transport;
use super::error::FetchError;
use super::types::RawDeparture;

/// Mock client serving pre-loaded boards.
#[derive(Clone, Default)]
pub struct MockVvsClient {
    boards: Arc<RwLock<HashMap<String, Vec<RawDeparture>>>>,
    /// When set, every request fails with `Api { status, reason }`.
    failure: Arc<RwLock<Option<(String, String)>>>,
}

impl MockVvsClient {
    /// Create an empty mock client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the board served for a station.
    pub async fn set_board(&self, station: impl Into<String>, board: Vec<RawDeparture>) {
        self.boards.write().await.insert(station.into(), board);
    }

    /// Make every subsequent request fail with the given status and reason.
    pub async fn fail_with(&self, status: impl Into<String>, reason: impl Into<String>) {
        *self.failure.write().await = Some((status.into(), reason.into()));
    }

    /// Clear a previously configured failure.
    pub async fn clear_failure(&self) {
        *self.failure.write().await = None;
    }

    async fn lookup(&self, station: &str) -> Result<Vec<RawDeparture>, FetchError> {
        if let Some((status, reason)) = self.failure.read().await.clone() {
            return Err(FetchError::Api { status, reason });
        }

        let boards = self.boards.read().await;
        boards
            .get(station)
            .cloned()
            .ok_or_else(|| FetchError::Api {
                status: "404".to_string(),
                reason: format!("no mock board for station {station}"),
            })
    }
}

impl Transport for MockVvsClient {
    fn departures(
        &self,
        station: &str,
    ) -> impl Future<Output = Result<Vec<RawDeparture>, FetchError>> + Send {
        self.lookup(station)
    }
}
