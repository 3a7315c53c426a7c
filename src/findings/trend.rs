//! Per-metric trend detection over the analysis window
//!
//! Fits a least-squares slope of value against day offset for each selected
//! metric and keeps the steepest one. Day offsets, not sample indexes: a
//! value logged after a three-day gap sits three days along the x axis, so
//! sparse histories do not exaggerate their own slopes.

use crate::config::Thresholds;
use crate::entry::DailyEntry;
use crate::metric::{resolve, MetricKey};
use crate::stats;
use crate::window::DateRange;

/// Slope fit for one metric
#[derive(Debug, Clone, PartialEq)]
pub struct TrendFit {
    /// Metric the slope belongs to
    pub metric: MetricKey,
    /// Least-squares slope in scale units per day
    pub slope: f32,
    /// Resolved points the fit used
    pub points: usize,
}

impl TrendFit {
    /// Whether the series is rising
    #[must_use]
    pub fn is_rising(&self) -> bool {
        self.slope > 0.0
    }
}

/// Fit a slope for one metric across the window
///
/// Returns `None` below the minimum point count or when the x spread is
/// degenerate.
#[must_use]
pub fn fit_metric(
    entries: &[DailyEntry],
    window: &DateRange,
    metric: &MetricKey,
    thresholds: &Thresholds,
) -> Option<TrendFit> {
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for entry in entries.iter().filter(|e| window.contains(e.date())) {
        if let Some(value) = resolve(entry, metric) {
            #[allow(clippy::cast_precision_loss)]
            xs.push((entry.date() - window.start()).num_days() as f32);
            ys.push(value);
        }
    }

    if xs.len() < thresholds.trend_min_points {
        return None;
    }

    let slope = stats::slope(&xs, &ys)?;
    Some(TrendFit {
        metric: metric.clone(),
        slope,
        points: xs.len(),
    })
}

/// Steepest reportable trend across the selected metrics
///
/// Slopes below `trend_min_slope` in magnitude are never reported; a
/// near-flat fit says nothing worth a finding. Ties keep the earlier metric
/// in selection order.
#[must_use]
pub fn best_trend(
    entries: &[DailyEntry],
    window: &DateRange,
    selected: &[MetricKey],
    thresholds: &Thresholds,
) -> Option<TrendFit> {
    let mut best: Option<TrendFit> = None;
    for metric in selected {
        let Some(fit) = fit_metric(entries, window, metric, thresholds) else {
            continue;
        };
        if fit.slope.abs() < thresholds.trend_min_slope {
            continue;
        }
        let steeper = best
            .as_ref()
            .map_or(true, |b| fit.slope.abs() > b.slope.abs());
        if steeper {
            best = Some(fit);
        }
    }
    best
}
