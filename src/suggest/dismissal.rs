//! Dismissal ledger - cool-downs for dismissed suggestions
//!
//! A small TTL map keyed by suggestion id. Expiry is a calendar-day
//! comparison at read time; nothing ticks in the background. The ledger is
//! owned by the caller's store and handed in per scan, like the entry
//! snapshot itself.

use chrono::NaiveDate;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Dismissed suggestion ids with the day each was dismissed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DismissalLedger {
    dismissed: FxHashMap<String, NaiveDate>,
}

impl DismissalLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a dismissal, pruning entries that already aged out
    ///
    /// Re-dismissing an id restarts its cool-down.
    pub fn dismiss(&mut self, id: impl Into<String>, on: NaiveDate, ttl_days: u32) {
        self.dismissed
            .retain(|_, dismissed_on| within_cooldown(*dismissed_on, on, ttl_days));
        self.dismissed.insert(id.into(), on);
    }

    /// Whether a suggestion is still inside its cool-down
    #[must_use]
    pub fn is_suppressed(&self, id: &str, today: NaiveDate, ttl_days: u32) -> bool {
        self.dismissed
            .get(id)
            .is_some_and(|dismissed_on| within_cooldown(*dismissed_on, today, ttl_days))
    }

    /// Number of dismissals currently recorded (expired ones included until
    /// the next write).
    #[must_use]
    pub fn len(&self) -> usize {
        self.dismissed.len()
    }

    /// Whether the ledger holds no dismissals.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dismissed.is_empty()
    }
}

/// Day-granularity cool-down check; day `ttl_days` after dismissal is open
fn within_cooldown(dismissed_on: NaiveDate, today: NaiveDate, ttl_days: u32) -> bool {
    (today - dismissed_on).num_days() < i64::from(ttl_days)
}
