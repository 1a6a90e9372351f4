//! One fetch round: request, normalize, filter.

use chrono::{Local, NaiveDateTime};
use tracing::debug;

use crate::filter::FilterSettings;
use crate::normalize::{NormalizedDeparture, normalize_all};
use crate::vvs::{FetchError, RawDeparture, Transport};

/// Fetch and prepare the departure board for one round.
///
/// Issues a single request, normalizes every returned record against one
/// wall-clock "now" captured when the response arrives, then runs the
/// filter pipeline. An empty result is a valid outcome meaning "no
/// matching departures"; only a transport failure is an error, and it is
/// never a partial one.
pub async fn fetch_schedule<T: Transport>(
    transport: &T,
    station: &str,
    settings: &FilterSettings,
) -> Result<Vec<NormalizedDeparture>, FetchError> {
    let raws = transport.departures(station).await?;
    let now = Local::now().naive_local();
    Ok(prepare(raws, settings, now))
}

/// Like [`fetch_schedule`] but with an explicit "now", for deterministic
/// tests.
pub async fn fetch_schedule_at<T: Transport>(
    transport: &T,
    station: &str,
    settings: &FilterSettings,
    now: NaiveDateTime,
) -> Result<Vec<NormalizedDeparture>, FetchError> {
    let raws = transport.departures(station).await?;
    Ok(prepare(raws, settings, now))
}

fn prepare(
    raws: Vec<RawDeparture>,
    settings: &FilterSettings,
    now: NaiveDateTime,
) -> Vec<NormalizedDeparture> {
    debug!(count = raws.len(), "normalizing departure board");
    let normalized = normalize_all(raws, now);
    settings.apply(normalized)
}
