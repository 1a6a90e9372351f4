//! Recurring polling of the departure board.
//!
//! The poller runs one fetch round shortly after start and then forever
//! at a jittered interval, handing each outcome to a [`BoardConsumer`].
//! It is owned by the caller as a [`Poller`] handle; dropping or stopping
//! the handle ends polling.
//!
//! Rounds are allowed to overlap when the transport is slow. Every round
//! carries a sequence number and a completion that is no longer the
//! latest dispatched round is discarded, so a late response never
//! overwrites fresher data.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use rand::Rng;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::filter::FilterSettings;
use crate::normalize::NormalizedDeparture;
use crate::schedule::fetch_schedule;
use crate::vvs::{ConfigError, Transport};

/// Base delay before the first round, on top of the first-fire jitter.
const FIRST_FIRE_BASE: Duration = Duration::from_millis(250);

const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_secs(90);
const DEFAULT_UPDATE_JITTER: Duration = Duration::from_secs(5);
const DEFAULT_FIRST_FIRE_JITTER: Duration = Duration::from_millis(2500);

/// Receiver of poll round outcomes.
///
/// Implementations render the board however they like; the poller only
/// guarantees that `on_loading` precedes the round's delivery and is not
/// repeated while a loading indicator is already outstanding.
pub trait BoardConsumer: Send + Sync + 'static {
    /// A round is about to start fetching.
    fn on_loading(&self);

    /// A round finished with a (possibly empty) filtered board.
    fn on_departures(&self, departures: Vec<NormalizedDeparture>);

    /// A round failed at the transport; `message` is `"<status>: <reason>"`.
    fn on_error(&self, message: String);
}

/// Configuration for one poller instance.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Station identifier to poll. Must be non-empty.
    pub station: String,

    /// Filter settings applied to every round.
    pub settings: FilterSettings,

    /// Nominal interval between rounds.
    pub update_interval: Duration,

    /// Upper bound of the random offset added to the interval.
    pub update_jitter: Duration,

    /// Upper bound of the random offset added to the first fire.
    pub first_fire_jitter: Duration,
}

impl PollConfig {
    /// Create a config for a station with default timings and filters.
    pub fn new(station: impl Into<String>) -> Self {
        Self {
            station: station.into(),
            settings: FilterSettings::default(),
            update_interval: DEFAULT_UPDATE_INTERVAL,
            update_jitter: DEFAULT_UPDATE_JITTER,
            first_fire_jitter: DEFAULT_FIRST_FIRE_JITTER,
        }
    }

    /// Set the filter settings applied to every round.
    pub fn with_settings(mut self, settings: FilterSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Set the nominal update interval.
    pub fn with_update_interval(mut self, interval: Duration) -> Self {
        self.update_interval = interval;
        self
    }

    /// Set the update jitter bound.
    pub fn with_update_jitter(mut self, jitter: Duration) -> Self {
        self.update_jitter = jitter;
        self
    }

    /// Set the first-fire jitter bound.
    pub fn with_first_fire_jitter(mut self, jitter: Duration) -> Self {
        self.first_fire_jitter = jitter;
        self
    }
}

struct Shared<T, C> {
    transport: T,
    consumer: C,
    station: String,
    settings: FilterSettings,
    /// Sequence number of the most recently dispatched round.
    latest_round: AtomicU64,
    /// Whether a loading indicator is currently outstanding.
    loading_shown: AtomicBool,
    stopped: Arc<AtomicBool>,
}

/// Owned handle to a running poller.
///
/// Polling stops when the handle is stopped or dropped; the caller that
/// owns the widget's lifetime decides when that happens.
pub struct Poller {
    ticker: JoinHandle<()>,
    stopped: Arc<AtomicBool>,
}

impl Poller {
    /// Validate the config and start polling.
    ///
    /// A missing station is a hard configuration error reported here,
    /// once; it is not a retryable fetch error.
    pub fn spawn<T, C>(transport: T, config: PollConfig, consumer: C) -> Result<Poller, ConfigError>
    where
        T: Transport + 'static,
        C: BoardConsumer,
    {
        if config.station.trim().is_empty() {
            return Err(ConfigError::MissingStation);
        }

        let stopped = Arc::new(AtomicBool::new(false));
        let shared = Arc::new(Shared {
            transport,
            consumer,
            station: config.station,
            settings: config.settings,
            latest_round: AtomicU64::new(0),
            loading_shown: AtomicBool::new(false),
            stopped: Arc::clone(&stopped),
        });

        // Jitter is sampled once at setup, not re-sampled per tick.
        let first_delay = FIRST_FIRE_BASE + jitter(config.first_fire_jitter);
        let period = config.update_interval + jitter(config.update_jitter);

        let ticker = tokio::spawn(run(shared, first_delay, period));

        Ok(Poller { ticker, stopped })
    }

    /// Stop polling. In-flight rounds are discarded, not delivered.
    pub fn stop(self) {
        // Drop does the work.
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stopped.store(true, Ordering::SeqCst);
        self.ticker.abort();
    }
}

async fn run<T, C>(shared: Arc<Shared<T, C>>, first_delay: Duration, period: Duration)
where
    T: Transport + 'static,
    C: BoardConsumer,
{
    tokio::time::sleep(first_delay).await;

    let mut round = 0u64;
    loop {
        round += 1;
        dispatch(Arc::clone(&shared), round);
        tokio::time::sleep(period).await;
    }
}

/// Start one round. The fetch runs as its own task so a slow response
/// never delays the ticker.
fn dispatch<T, C>(shared: Arc<Shared<T, C>>, round: u64)
where
    T: Transport + 'static,
    C: BoardConsumer,
{
    shared.latest_round.store(round, Ordering::SeqCst);

    if !shared.loading_shown.swap(true, Ordering::SeqCst) {
        shared.consumer.on_loading();
    }

    tokio::spawn(async move {
        let result = fetch_schedule(&shared.transport, &shared.station, &shared.settings).await;

        if shared.stopped.load(Ordering::SeqCst) {
            return;
        }
        if shared.latest_round.load(Ordering::SeqCst) != round {
            debug!(round, "discarding stale round");
            return;
        }

        shared.loading_shown.store(false, Ordering::SeqCst);
        match result {
            Ok(board) => {
                debug!(round, entries = board.len(), "delivering departure board");
                shared.consumer.on_departures(board);
            }
            Err(e) => {
                warn!(round, error = %e, "fetch round failed");
                shared.consumer.on_error(e.to_string());
            }
        }
    });
}

/// Uniform random offset in `[0, bound)`, zero for a zero bound.
fn jitter(bound: Duration) -> Duration {
    let millis = bound.as_millis() as u64;
    if millis == 0 {
        Duration::ZERO
    } else {
        Duration::from_millis(rand::rng().random_range(0..millis))
    }
}
