//! VVS departure feed DTOs.
//!
//! These types map directly to the JSON returned by the departure
//! endpoint: one record per line of service currently listed at the
//! station. Unknown fields are ignored so the feed can grow without
//! breaking deserialization.

use serde::Deserialize;

/// Scheduled departure timestamp as the feed delivers it.
///
/// The `month` field is **one-based** (January = 1). The minutes
/// arithmetic in the normalizer is written against this convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DepartureTime {
    pub year: i32,

    /// One-based month (1-12).
    pub month: u32,

    pub day: u32,

    /// Hour of day (0-23).
    pub hour: u32,

    /// Minute of hour (0-59).
    pub minute: u32,
}

/// One raw departure record from the feed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDeparture {
    /// Line designator, e.g. "42", "S1", "U6". Alphanumeric.
    pub number: String,

    /// Free-text destination of the service.
    pub direction: String,

    /// Signed delay in minutes. Negative means running early.
    pub delay: i64,

    /// Scheduled departure timestamp.
    pub departure_time: DepartureTime,

    /// Human-readable name of the stop the feed was queried for.
    pub stop_name: String,
}
