//! Experiment Comparator - baseline vs. during averages per metric
//!
//! Entries partition into the two windows by date membership, never by
//! index, so gaps and unsorted edits cannot shift a day across the
//! boundary. Each metric is judged on its own: one noisy metric never
//! blocks the others from showing a verdict.
//!
//! The [`ComparisonDigest`] is the freezing point. It is computed once,
//! when the user rates the plan, and stored verbatim in the outcome.
//! Recomputing from live data after that would let edits to historical
//! entries rewrite a stated conclusion.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::plan::ExperimentPlan;
use crate::config::Thresholds;
use crate::entry::{logged_days, DailyEntry};
use crate::error::Result;
use crate::metric::{resolve, MetricCatalog, MetricKey};
use crate::stats;
use crate::window::{DateRange, ExperimentWindows};

/// Resolved sample of one metric inside one window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowStats {
    avg: Option<f32>,
    count: usize,
}

impl WindowStats {
    /// Get the window average, `None` when no points resolved.
    #[must_use]
    pub const fn avg(&self) -> Option<f32> {
        self.avg
    }

    /// Get the number of resolved points.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }
}

/// Baseline vs. during verdict for one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricComparison {
    metric: MetricKey,
    baseline: WindowStats,
    during: WindowStats,
    delta: Option<f32>,
    has_enough_data: bool,
}

impl MetricComparison {
    /// Get the metric under comparison.
    #[must_use]
    pub const fn metric(&self) -> &MetricKey {
        &self.metric
    }

    /// Get the baseline window sample.
    #[must_use]
    pub const fn baseline(&self) -> WindowStats {
        self.baseline
    }

    /// Get the during window sample.
    #[must_use]
    pub const fn during(&self) -> WindowStats {
        self.during
    }

    /// Get `during avg − baseline avg`, `None` if either average is absent.
    #[must_use]
    pub const fn delta(&self) -> Option<f32> {
        self.delta
    }

    /// Whether both windows reached the per-window point minimum.
    #[must_use]
    pub const fn has_enough_data(&self) -> bool {
        self.has_enough_data
    }
}

/// Full comparison of a plan's windows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    windows: ExperimentWindows,
    metrics: Vec<MetricComparison>,
    enough_data: bool,
    baseline_logged_days: usize,
    during_logged_days: usize,
}

impl ComparisonResult {
    /// Get the baseline and during windows.
    #[must_use]
    pub const fn windows(&self) -> ExperimentWindows {
        self.windows
    }

    /// Get the per-metric verdicts, in the plan's metric order.
    #[must_use]
    pub fn metrics(&self) -> &[MetricComparison] {
        &self.metrics
    }

    /// Whether any metric individually reached its point minimum.
    #[must_use]
    pub const fn enough_data(&self) -> bool {
        self.enough_data
    }

    /// Get the days with any observation in the baseline window.
    #[must_use]
    pub const fn baseline_logged_days(&self) -> usize {
        self.baseline_logged_days
    }

    /// Get the days with any observation in the during window.
    #[must_use]
    pub const fn during_logged_days(&self) -> usize {
        self.during_logged_days
    }
}

/// Compare a plan's baseline and during windows over the given history.
///
/// # Errors
///
/// Returns `Error::DateOutOfRange` if the plan's windows cannot be
/// constructed. Sparse or empty windows are not errors; they surface as
/// `None` averages and a false `enough_data`.
pub fn compare(
    entries: &[DailyEntry],
    plan: &ExperimentPlan,
    thresholds: &Thresholds,
) -> Result<ComparisonResult> {
    let windows = plan.windows()?;

    let metrics: Vec<MetricComparison> = plan
        .metrics()
        .iter()
        .map(|metric| {
            let baseline = window_stats(entries, &windows.baseline, metric);
            let during = window_stats(entries, &windows.during, metric);
            let delta = match (during.avg, baseline.avg) {
                (Some(d), Some(b)) => Some(d - b),
                _ => None,
            };
            let has_enough_data = baseline.count >= thresholds.compare_min_points
                && during.count >= thresholds.compare_min_points;
            MetricComparison {
                metric: metric.clone(),
                baseline,
                during,
                delta,
                has_enough_data,
            }
        })
        .collect();

    let enough_data = metrics.iter().any(MetricComparison::has_enough_data);
    debug!(
        "Comparison for plan {}: {} metrics, enough_data={enough_data}",
        plan.id(),
        metrics.len()
    );

    Ok(ComparisonResult {
        windows,
        metrics,
        enough_data,
        baseline_logged_days: logged_days(entries, &windows.baseline),
        during_logged_days: logged_days(entries, &windows.during),
    })
}

/// Resolve one metric across the entries falling inside a window
fn window_stats(entries: &[DailyEntry], window: &DateRange, metric: &MetricKey) -> WindowStats {
    let values: Vec<f32> = entries
        .iter()
        .filter(|e| window.contains(e.date()))
        .filter_map(|e| resolve(e, metric))
        .collect();
    WindowStats {
        avg: stats::mean(&values),
        count: values.len(),
    }
}

/// Immutable snapshot of a comparison, captured at rating time
///
/// Holds the full result plus a derived plain-language summary. Both are
/// stored verbatim; neither is ever recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonDigest {
    result: ComparisonResult,
    summary: String,
}

impl ComparisonDigest {
    /// Freeze a comparison into a digest.
    ///
    /// The summary names the metric with the largest absolute delta among
    /// those with enough data, and the runner-up when one exists.
    #[must_use]
    pub fn freeze(result: ComparisonResult, catalog: &MetricCatalog) -> Self {
        let summary = summarize(&result, catalog);
        Self { result, summary }
    }

    /// Get the frozen comparison.
    #[must_use]
    pub const fn result(&self) -> &ComparisonResult {
        &self.result
    }

    /// Get the frozen plain-language summary.
    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }
}

#[cfg(test)]
impl ComparisonDigest {
    /// Minimal digest for lifecycle tests that never read its contents.
    pub(crate) fn empty_for_tests() -> Self {
        let windows = ExperimentWindows::for_plan(
            chrono::NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
            7,
        )
        .unwrap();
        Self {
            result: ComparisonResult {
                windows,
                metrics: Vec::new(),
                enough_data: false,
                baseline_logged_days: 0,
                during_logged_days: 0,
            },
            summary: String::new(),
        }
    }
}

fn summarize(result: &ComparisonResult, catalog: &MetricCatalog) -> String {
    let mut qualifying: Vec<(f32, f32, f32, &MetricComparison)> = result
        .metrics
        .iter()
        .filter(|m| m.has_enough_data)
        .filter_map(|m| match (m.delta, m.during.avg, m.baseline.avg) {
            (Some(delta), Some(during), Some(baseline)) => Some((delta, during, baseline, m)),
            _ => None,
        })
        .collect();

    if qualifying.is_empty() {
        return "Not enough logged days in both windows to support a conclusion.".to_string();
    }

    qualifying.sort_by(|a, b| {
        b.0.abs()
            .partial_cmp(&a.0.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let (delta, during, baseline, top) = &qualifying[0];
    let mut summary = format!(
        "{} averaged {during:.1} during the trial, compared with {baseline:.1} beforehand ({delta:+.1}).",
        top.metric.label(catalog)
    );
    if let Some((second_delta, _, _, second)) = qualifying.get(1) {
        summary.push_str(&format!(
            " {} shifted by {second_delta:+.1} over the same period.",
            second.metric.label(catalog)
        ));
    }
    summary
}
