//! Trailing-window filtering of readings.

use std::convert::Infallible;
use std::str::FromStr;

use chrono::{Duration, Local, NaiveDateTime};

use crate::reading::Reading;

/// A display window: everything, or the trailing N days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    /// No filtering.
    #[default]
    All,
    /// Readings from the last N days, measured back from the moment of the
    /// query rather than from midnight.
    Days(u32),
}

impl Period {
    /// Earliest timestamp included by this period, relative to `now`.
    #[must_use]
    pub fn cutoff(self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            Self::All => None,
            Self::Days(days) => now.checked_sub_signed(Duration::days(i64::from(days))),
        }
    }

    /// Whether a timestamp falls inside this period.
    #[must_use]
    pub fn contains(self, datetime: NaiveDateTime, now: NaiveDateTime) -> bool {
        self.cutoff(now).map_or(true, |cutoff| datetime >= cutoff)
    }
}

/// Unrecognized values fall back to [`Period::All`].
impl FromStr for Period {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.trim().parse::<u32>().map_or(Self::All, Self::Days))
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Days(days) => write!(f, "{days}"),
        }
    }
}

/// Select the readings inside `period`, measured back from `now`.
///
/// Input order is preserved.
#[must_use]
pub fn filter_at(readings: &[Reading], period: Period, now: NaiveDateTime) -> Vec<&Reading> {
    readings
        .iter()
        .filter(|reading| period.contains(reading.datetime, now))
        .collect()
}

/// Select the readings inside `period`, measured back from the local clock.
#[must_use]
pub fn filter(readings: &[Reading], period: Period) -> Vec<&Reading> {
    filter_at(readings, period, Local::now().naive_local())
}
