//! Error types for the transport boundary and configuration.

/// Errors from fetching the departure feed.
///
/// The `Display` output of every variant is the consumer-facing message,
/// shaped `<status>: <reason>` to match what the endpoint reports.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint returned an error status.
    #[error("{status}: {reason}")]
    Api { status: String, reason: String },

    /// Response body was not a valid departure board.
    #[error("parse error: {message}")]
    Json { message: String },
}

/// Setup-time configuration errors.
///
/// Reported once when a widget instance is created; they halt that
/// instance only and are never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// No station was configured.
    #[error("station not set")]
    MissingStation,
}
