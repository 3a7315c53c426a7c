//! Calendar-day windows
//!
//! All windowing is pure `NaiveDate` arithmetic over inclusive ranges.
//! Entries are keyed by calendar day, so there is no timezone to mix up and
//! no instant-to-day conversion anywhere in the crate.

use std::fmt;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Inclusive range of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a range from inclusive endpoints.
    ///
    /// # Errors
    ///
    /// Returns `Error::DateOutOfRange` if `end` precedes `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(Error::DateOutOfRange(format!(
                "range end {end} precedes start {start}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Range covering the `n` days ending at `end` inclusive.
    ///
    /// # Errors
    ///
    /// Returns `Error::DateOutOfRange` for a zero length or when the start
    /// would fall outside the representable calendar.
    pub fn last_n_days(end: NaiveDate, n: u32) -> Result<Self> {
        if n == 0 {
            return Err(Error::DateOutOfRange(
                "window length must be >= 1 day".to_string(),
            ));
        }
        let start = end
            .checked_sub_days(Days::new(u64::from(n - 1)))
            .ok_or_else(|| Error::DateOutOfRange(format!("{n} days before {end}")))?;
        Ok(Self { start, end })
    }

    /// First day of the range.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the range.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether a day falls inside the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of calendar days covered.
    #[must_use]
    pub fn len_days(&self) -> u32 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            ((self.end - self.start).num_days() + 1) as u32
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Baseline and during windows for an experiment
///
/// `during` covers the plan itself; `baseline` is the equal-length block
/// immediately before it. Equal length, adjacent, never overlapping, by
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentWindows {
    /// Equal-length block immediately before the plan start
    pub baseline: DateRange,
    /// The plan's own days
    pub during: DateRange,
}

impl ExperimentWindows {
    /// Build both windows from a plan's start day and duration.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPlan` for a zero duration and
    /// `Error::DateOutOfRange` when either window leaves the representable
    /// calendar.
    pub fn for_plan(start: NaiveDate, duration_days: u32) -> Result<Self> {
        if duration_days == 0 {
            return Err(Error::InvalidPlan(
                "duration must be >= 1 day".to_string(),
            ));
        }

        let span = u64::from(duration_days);
        let during_end = start
            .checked_add_days(Days::new(span - 1))
            .ok_or_else(|| Error::DateOutOfRange(format!("{duration_days} days after {start}")))?;
        let baseline_start = start
            .checked_sub_days(Days::new(span))
            .ok_or_else(|| Error::DateOutOfRange(format!("{duration_days} days before {start}")))?;
        let baseline_end = start
            .checked_sub_days(Days::new(1))
            .ok_or_else(|| Error::DateOutOfRange(format!("day before {start}")))?;

        Ok(Self {
            baseline: DateRange::new(baseline_start, baseline_end)?,
            during: DateRange::new(start, during_end)?,
        })
    }
}
