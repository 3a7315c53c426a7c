//! Cycle phase view - optional grouping of a metric by cycle phase
//!
//! Phase estimation sits behind [`PhaseEstimator`] so a caller with a
//! richer model (wearable data, logged ovulation tests) can supply its
//! own. The built-in [`CalendarPhaseEstimator`] counts days since the most
//! recent logged cycle start and applies fixed calendar buckets.
//!
//! This is a display view only. Correlation gating treats hormonal metrics
//! by kind; it never consults phase estimates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entry::DailyEntry;
use crate::metric::{resolve, MetricKey};
use crate::stats;

/// Menstrual cycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePhase {
    /// Days 0-4 since cycle start
    Menstrual,
    /// Days 5-12
    Follicular,
    /// Days 13-15
    Ovulatory,
    /// Days 16-27
    Luteal,
}

impl CyclePhase {
    /// All phases in calendar order
    pub const ALL: [Self; 4] = [
        Self::Menstrual,
        Self::Follicular,
        Self::Ovulatory,
        Self::Luteal,
    ];

    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Menstrual => "Menstrual",
            Self::Follicular => "Follicular",
            Self::Ovulatory => "Ovulatory",
            Self::Luteal => "Luteal",
        }
    }
}

/// External seam for cycle phase estimation
pub trait PhaseEstimator {
    /// Estimate the phase a given day falls in, `None` when unknowable.
    fn phase_on(&self, entries: &[DailyEntry], date: NaiveDate) -> Option<CyclePhase>;
}

/// Calendar-bucket phase estimator
///
/// Counts days since the most recent `cycle_start` marker on or before the
/// queried day. Days 0-4 map to Menstrual, 5-12 Follicular, 13-15
/// Ovulatory, 16-27 Luteal. Past day 27, or with no marker logged, the
/// phase is unknown rather than guessed.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalendarPhaseEstimator;

impl PhaseEstimator for CalendarPhaseEstimator {
    fn phase_on(&self, entries: &[DailyEntry], date: NaiveDate) -> Option<CyclePhase> {
        let start = entries
            .iter()
            .rev()
            .find(|e| e.cycle_start() && e.date() <= date)?;
        match (date - start.date()).num_days() {
            0..=4 => Some(CyclePhase::Menstrual),
            5..=12 => Some(CyclePhase::Follicular),
            13..=15 => Some(CyclePhase::Ovulatory),
            16..=27 => Some(CyclePhase::Luteal),
            _ => None,
        }
    }
}

/// One metric's average within one phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseAverage {
    /// The phase the days fell in
    pub phase: CyclePhase,
    /// Mean resolved value across those days
    pub avg: f32,
    /// Number of resolved points
    pub count: usize,
}

/// Average one metric's resolved values by estimated phase.
///
/// Phases appear in calendar order; phases with no resolved points are
/// omitted rather than reported as zero.
#[must_use]
pub fn phase_averages(
    entries: &[DailyEntry],
    metric: &MetricKey,
    estimator: &dyn PhaseEstimator,
) -> Vec<PhaseAverage> {
    let mut buckets: Vec<(CyclePhase, Vec<f32>)> =
        CyclePhase::ALL.iter().map(|p| (*p, Vec::new())).collect();

    for entry in entries {
        let Some(value) = resolve(entry, metric) else {
            continue;
        };
        let Some(phase) = estimator.phase_on(entries, entry.date()) else {
            continue;
        };
        if let Some((_, values)) = buckets.iter_mut().find(|(p, _)| *p == phase) {
            values.push(value);
        }
    }

    buckets
        .into_iter()
        .filter_map(|(phase, values)| {
            stats::mean(&values).map(|avg| PhaseAverage {
                phase,
                avg,
                count: values.len(),
            })
        })
        .collect()
}
