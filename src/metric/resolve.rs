//! Metric resolver - one entry, one key, one number (or nothing)
//!
//! The single code path that turns a stored observation into a value on the
//! 0-10 analysis scale. Every statistic downstream goes through here, so
//! absence is represented once and uniformly: a day without the metric is
//! `None`, never a zero that would drag averages down.

use crate::entry::{DailyEntry, Mood};
use crate::metric::MetricKey;

/// Analysis value for a low mood
pub const MOOD_LOW_VALUE: f32 = 2.0;
/// Analysis value for an okay mood
pub const MOOD_OKAY_VALUE: f32 = 5.0;
/// Analysis value for a good mood
pub const MOOD_GOOD_VALUE: f32 = 8.0;

/// Top of the analysis scale
const SCALE_MAX: f32 = 10.0;
/// Divisor applied to legacy 0-100 magnitudes
const LEGACY_DIVISOR: f32 = 10.0;

/// Resolve a metric for one entry onto the 0-10 scale
///
/// Mood maps to fixed values (2, 5, 8): symmetric around the midpoint and
/// clear of the extremes, so a mood swing cannot dominate the day-over-day
/// delta the way a 0-to-10 jump would. Stored magnitudes above 10 are read
/// as the legacy 0-100 scale and rescaled. Negative, NaN, or infinite
/// stored values resolve to `None`; a broken write is treated as absent,
/// not as a signal.
#[must_use]
pub fn resolve(entry: &DailyEntry, key: &MetricKey) -> Option<f32> {
    match key {
        MetricKey::Mood => entry.mood().map(|m| match m {
            Mood::Low => MOOD_LOW_VALUE,
            Mood::Okay => MOOD_OKAY_VALUE,
            Mood::Good => MOOD_GOOD_VALUE,
        }),
        MetricKey::Builtin(sym) => entry.symptom(*sym).and_then(normalize),
        MetricKey::Custom(id) => entry.custom(id).and_then(normalize),
    }
}

/// Map a raw stored magnitude onto [0, 10], or reject it
fn normalize(raw: f32) -> Option<f32> {
    if !raw.is_finite() || raw < 0.0 {
        return None;
    }
    if raw > SCALE_MAX {
        return Some((raw / LEGACY_DIVISOR).clamp(0.0, SCALE_MAX));
    }
    Some(raw)
}
