//! Human-facing findings in fixed priority order
//!
//! A finding is one ranked statement the presentation layer can show as-is:
//! a trend, a day-over-day jump, the best surviving correlation, or an
//! engagement nudge. Priority order is fixed (trend, yesterday delta,
//! correlation, nudge) and never re-sorted by score, so the page reads the
//! same way every day and a claim never jumps position because a score
//! moved by one point.
//!
//! Statistical findings are capped at `max_findings`; the nudge is appended
//! after the cap because it is engagement framing, not a claim about data.

mod trend;

pub use trend::{best_trend, fit_metric, TrendFit};

use serde::{Deserialize, Serialize};

use crate::config::Thresholds;
use crate::correlation::{self, CorrelationCandidate, CorrelationFn};
use crate::entry::DailyEntry;
use crate::metric::{resolve, MetricCatalog, MetricKey};
use crate::window::DateRange;

/// Category tag on a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// Directional movement over time, whether a window slope or a
    /// day-over-day jump
    Trend,
    /// Two metrics moving together or oppositely
    Correlation,
    /// Non-statistical observation, currently the engagement nudge
    Pattern,
}

/// One ranked, human-facing statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Category tag
    pub kind: FindingKind,
    /// Short headline
    pub title: String,
    /// One or two supporting sentences
    pub body: String,
    /// Metrics the statement is about, in statement order
    pub metrics: Vec<MetricKey>,
}

/// Largest day-over-day change across the two most recent entries
#[derive(Debug, Clone, PartialEq)]
pub struct DayDelta {
    /// Metric that moved the most
    pub metric: MetricKey,
    /// Resolved value on the earlier of the two entries
    pub previous: f32,
    /// Resolved value on the most recent entry
    pub latest: f32,
}

impl DayDelta {
    /// Signed change, latest minus previous
    #[must_use]
    pub fn change(&self) -> f32 {
        self.latest - self.previous
    }
}

/// Rank findings over the window for the selected metrics
///
/// `entries` is the full date-sorted history: the trend and correlation
/// findings restrict themselves to `window`, while the yesterday delta
/// always reads the two most recent entries wherever they fall.
#[must_use]
pub fn rank(
    entries: &[DailyEntry],
    window: &DateRange,
    selected: &[MetricKey],
    catalog: &MetricCatalog,
    corr: CorrelationFn,
    thresholds: &Thresholds,
) -> Vec<Finding> {
    let mut findings = Vec::new();

    if let Some(fit) = best_trend(entries, window, selected, thresholds) {
        findings.push(trend_finding(&fit, catalog));
    }

    if let Some(delta) = largest_day_over_day(entries, selected, thresholds) {
        findings.push(delta_finding(&delta, catalog));
    }

    let candidates = correlation::scan(entries, window, selected, catalog, corr, thresholds);
    if let Some(best) = candidates.first() {
        findings.push(correlation_finding(best, catalog));
    }

    findings.truncate(thresholds.max_findings);

    if selected.len() < thresholds.nudge_below_selected {
        findings.push(nudge_finding(selected.len()));
    }

    findings
}

/// Largest day-over-day movement among selected metrics
///
/// Compares the two most recent entries regardless of the analysis window.
/// Changes below `delta_min_change` are not reported; ties keep the earlier
/// metric in selection order.
#[must_use]
pub fn largest_day_over_day(
    entries: &[DailyEntry],
    selected: &[MetricKey],
    thresholds: &Thresholds,
) -> Option<DayDelta> {
    let [.., before, latest] = entries else {
        return None;
    };

    let mut best: Option<DayDelta> = None;
    for metric in selected {
        let (Some(previous), Some(current)) = (resolve(before, metric), resolve(latest, metric))
        else {
            continue;
        };
        let delta = DayDelta {
            metric: metric.clone(),
            previous,
            latest: current,
        };
        if delta.change().abs() < thresholds.delta_min_change {
            continue;
        }
        let larger = best
            .as_ref()
            .map_or(true, |b| delta.change().abs() > b.change().abs());
        if larger {
            best = Some(delta);
        }
    }
    best
}

fn trend_finding(fit: &TrendFit, catalog: &MetricCatalog) -> Finding {
    let label = fit.metric.label(catalog);
    let (direction, movement) = if fit.is_rising() {
        ("up", "rising")
    } else {
        ("down", "falling")
    };
    Finding {
        kind: FindingKind::Trend,
        title: format!("{label} is trending {direction}"),
        body: format!(
            "Across {} logged days in this window, {label} has been steadily {movement}.",
            fit.points
        ),
        metrics: vec![fit.metric.clone()],
    }
}

fn delta_finding(delta: &DayDelta, catalog: &MetricCatalog) -> Finding {
    let label = delta.metric.label(catalog);
    let verb = if delta.change() > 0.0 { "jumped" } else { "dropped" };
    Finding {
        kind: FindingKind::Trend,
        title: format!("{label} {verb} since yesterday"),
        body: format!(
            "{label} moved from {:.1} to {:.1} between your two most recent entries.",
            delta.previous, delta.latest
        ),
        metrics: vec![delta.metric.clone()],
    }
}

fn correlation_finding(candidate: &CorrelationCandidate, catalog: &MetricCatalog) -> Finding {
    let label_a = candidate.a.label(catalog);
    let label_b = candidate.b.label(catalog);
    let (phrase, movement) = if candidate.r > 0.0 {
        ("may move together", "rise and fall together")
    } else {
        ("may move oppositely", "move in opposite directions")
    };
    let mut body = format!(
        "On the {} days where both were logged, {label_a} and {label_b} tended to {movement}. \
         That is a pattern worth watching, not a cause.",
        candidate.n
    );
    if candidate.involves_hormonal() {
        body.push_str(
            " Hormone-linked symptoms shift with your cycle and much else, \
             so weigh this one cautiously.",
        );
    }
    Finding {
        kind: FindingKind::Correlation,
        title: format!("{label_a} and {label_b} {phrase}"),
        body,
        metrics: vec![candidate.a.clone(), candidate.b.clone()],
    }
}

fn nudge_finding(selected_count: usize) -> Finding {
    let noun = if selected_count == 1 { "metric" } else { "metrics" };
    Finding {
        kind: FindingKind::Pattern,
        title: "Track one more thing".to_string(),
        body: format!(
            "You are tracking {selected_count} {noun} right now. \
             Adding one more gives trends and pairings more to work with."
        ),
        metrics: Vec::new(),
    }
}
