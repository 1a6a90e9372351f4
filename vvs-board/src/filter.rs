//! Departure board filtering.
//!
//! A fixed-order predicate pipeline over normalized departures: time
//! window, direction pattern, line pattern, then the entry cap. Patterns
//! are compiled once at settings construction; an invalid pattern fails
//! there and never mid-filter.

use regex::Regex;

use crate::normalize::NormalizedDeparture;

/// Error constructing filter settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// A direction or line pattern failed to compile.
    #[error("invalid filter pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Filter settings for one fetch round.
///
/// Built from defaults with builder-style overrides, immutable once a
/// round starts.
#[derive(Debug, Clone)]
pub struct FilterSettings {
    /// Cap on the number of returned entries. `None` disables the cap.
    pub max_entries: Option<usize>,

    /// Inclusive lower bound on `departure_in_minutes`.
    pub min_departure: i64,

    /// Inclusive upper bound on `departure_in_minutes`.
    pub max_departure: i64,

    /// Keep only departures whose direction matches (substring match).
    pub filter_direction: Option<Regex>,

    /// Keep only departures whose line number matches (substring match).
    pub filter_line: Option<Regex>,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            max_entries: Some(20),
            min_departure: 3,
            max_departure: 120,
            filter_direction: None,
            filter_line: None,
        }
    }
}

impl FilterSettings {
    /// Create settings with the built-in defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or disable the entry cap.
    pub fn with_max_entries(mut self, max: Option<usize>) -> Self {
        self.max_entries = max;
        self
    }

    /// Set the inclusive departure window in minutes.
    pub fn with_departure_window(mut self, min: i64, max: i64) -> Self {
        self.min_departure = min;
        self.max_departure = max;
        self
    }

    /// Keep only departures whose direction matches the pattern.
    pub fn with_direction_filter(mut self, pattern: &str) -> Result<Self, SettingsError> {
        self.filter_direction = Some(Regex::new(pattern)?);
        Ok(self)
    }

    /// Keep only departures whose line number matches the pattern.
    pub fn with_line_filter(mut self, pattern: &str) -> Result<Self, SettingsError> {
        self.filter_line = Some(Regex::new(pattern)?);
        Ok(self)
    }

    /// Run the pipeline over a normalized board.
    ///
    /// Surviving records keep their input order; the entry cap is applied
    /// last, to the already-filtered sequence.
    pub fn apply(&self, records: Vec<NormalizedDeparture>) -> Vec<NormalizedDeparture> {
        let mut kept: Vec<NormalizedDeparture> = records
            .into_iter()
            .filter(|r| {
                r.departure_in_minutes >= self.min_departure
                    && r.departure_in_minutes <= self.max_departure
            })
            .filter(|r| {
                self.filter_direction
                    .as_ref()
                    .is_none_or(|re| re.is_match(r.direction()))
            })
            .filter(|r| {
                self.filter_line
                    .as_ref()
                    .is_none_or(|re| re.is_match(r.number()))
            })
            .collect();

        if let Some(cap) = self.max_entries {
            kept.truncate(cap);
        }

        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::vvs::{DepartureTime, RawDeparture};
    use chrono::{NaiveDate, NaiveDateTime};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    /// A departure `minutes` from now on the given line towards `direction`.
    fn dep(number: &str, direction: &str, minutes: u32) -> NormalizedDeparture {
        let raw = RawDeparture {
            number: number.to_string(),
            direction: direction.to_string(),
            delay: 0,
            departure_time: DepartureTime {
                year: 2024,
                month: 3,
                day: 1,
                hour: 10 + (minutes / 60),
                minute: minutes % 60,
            },
            stop_name: "Hauptbahnhof".to_string(),
        };
        normalize(raw, now())
    }

    #[test]
    fn defaults() {
        let settings = FilterSettings::default();

        assert_eq!(settings.max_entries, Some(20));
        assert_eq!(settings.min_departure, 3);
        assert_eq!(settings.max_departure, 120);
        assert!(settings.filter_direction.is_none());
        assert!(settings.filter_line.is_none());
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let settings = FilterSettings::new().with_departure_window(3, 120);
        let board = vec![
            dep("S1", "Herrenberg", 2),   // below min
            dep("S1", "Herrenberg", 3),   // exactly min
            dep("S1", "Herrenberg", 120), // exactly max
            dep("S1", "Herrenberg", 121), // above max
        ];

        let kept = settings.apply(board);

        let minutes: Vec<i64> = kept.iter().map(|d| d.departure_in_minutes).collect();
        assert_eq!(minutes, vec![3, 120]);
    }

    #[test]
    fn direction_filter_is_substring_match() {
        let settings = FilterSettings::new()
            .with_direction_filter("Herrenberg")
            .unwrap();
        let board = vec![
            dep("S1", "Herrenberg", 10),
            dep("S2", "Filderstadt", 12),
            dep("S1", "Herrenberg Bhf", 14),
        ];

        let kept = settings.apply(board);

        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|d| d.direction().contains("Herrenberg")));
    }

    #[test]
    fn line_filter() {
        let settings = FilterSettings::new().with_line_filter("^S").unwrap();
        let board = vec![
            dep("S1", "Herrenberg", 10),
            dep("U6", "Gerlingen", 12),
            dep("42", "Schoettle", 14),
            dep("S4", "Backnang", 16),
        ];

        let kept = settings.apply(board);

        let numbers: Vec<&str> = kept.iter().map(|d| d.number()).collect();
        assert_eq!(numbers, vec!["S1", "S4"]);
    }

    #[test]
    fn cap_applies_after_other_filters() {
        // 30 matching records plus a non-matching one in front: the cap
        // must keep the first 20 *matching* records, in input order.
        let mut board = vec![dep("U6", "Gerlingen", 10)];
        for i in 0..30 {
            board.push(dep("S1", &format!("Stop {i}"), 10 + i));
        }

        let settings = FilterSettings::new()
            .with_max_entries(Some(20))
            .with_line_filter("^S1$")
            .unwrap();
        let kept = settings.apply(board);

        assert_eq!(kept.len(), 20);
        for (i, d) in kept.iter().enumerate() {
            assert_eq!(d.direction(), format!("Stop {i}"));
        }
    }

    #[test]
    fn cap_disabled() {
        let board: Vec<_> = (0..30).map(|i| dep("S1", "Herrenberg", 10 + i)).collect();
        let settings = FilterSettings::new().with_max_entries(None);

        assert_eq!(settings.apply(board).len(), 30);
    }

    #[test]
    fn filtering_is_idempotent() {
        let settings = FilterSettings::new()
            .with_max_entries(Some(3))
            .with_direction_filter("berg")
            .unwrap();
        let board = vec![
            dep("S1", "Herrenberg", 5),
            dep("U6", "Gerlingen", 7),
            dep("S2", "Bietigheim", 2),
            dep("S1", "Herrenberg", 9),
            dep("S6", "Leonberg", 11),
            dep("S6", "Leonberg", 13),
        ];

        let once = settings.apply(board);
        let twice = settings.apply(once.clone());

        assert_eq!(once, twice);
    }

    #[test]
    fn invalid_pattern_fails_at_construction() {
        let err = FilterSettings::new().with_direction_filter("(unclosed");
        assert!(matches!(err, Err(SettingsError::InvalidPattern(_))));

        let err = FilterSettings::new().with_line_filter("[bad");
        assert!(matches!(err, Err(SettingsError::InvalidPattern(_))));
    }

    #[test]
    fn order_is_stable() {
        let settings = FilterSettings::new();
        let board = vec![
            dep("S1", "Herrenberg", 50),
            dep("U6", "Gerlingen", 5),
            dep("42", "Schoettle", 30),
        ];

        let kept = settings.apply(board);

        let numbers: Vec<&str> = kept.iter().map(|d| d.number()).collect();
        assert_eq!(numbers, vec!["S1", "U6", "42"]);
    }
}
