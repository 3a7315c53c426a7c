//! Pairwise correlation scan with gating and quality scoring
//!
//! The scan walks unordered pairs of the user's selected metrics, restricts
//! each pair to days where both resolve, and only then lets the injected
//! coefficient primitive run. Candidates are transient: recomputed per
//! request from the entry slice, never cached or persisted, so edits to
//! history are always reflected on the next call.
//!
//! The coefficient itself is supplied by the caller as a [`CorrelationFn`].
//! This crate decides when a coefficient may be computed and whether it may
//! be shown; it deliberately does not own the formula.

mod gate;
mod score;

pub use gate::{admit_pair, GateContext, GateReject};
pub use score::{base_score, confidence, extended_score, Confidence};

use tracing::debug;

use crate::config::Thresholds;
use crate::entry::{history_span_days, logged_days, DailyEntry};
use crate::metric::{resolve, MetricCatalog, MetricKey, MetricKind};
use crate::window::DateRange;

/// Injected correlation-coefficient primitive
///
/// Called with two equal-length paired series; returns `None` when the
/// coefficient is undefined for the input (zero spread, too short).
pub type CorrelationFn = fn(&[f32], &[f32]) -> Option<f32>;

/// A correlation that survived the gate and the display floor
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CorrelationCandidate {
    /// First metric, in selection order
    pub a: MetricKey,
    /// Second metric, in selection order
    pub b: MetricKey,
    /// Signed coefficient from the injected primitive
    pub r: f32,
    /// Paired observations the coefficient was computed over
    pub n: usize,
    /// Kind of `a` at evaluation time
    pub kind_a: MetricKind,
    /// Kind of `b` at evaluation time
    pub kind_b: MetricKind,
    /// Extended quality score, 0-100
    pub quality: u8,
    /// Coarse confidence tier
    pub confidence: Confidence,
}

impl CorrelationCandidate {
    /// Whether either side is a hormonal metric (hedged wording applies)
    #[must_use]
    pub const fn involves_hormonal(&self) -> bool {
        matches!(self.kind_a, MetricKind::Hormonal) || matches!(self.kind_b, MetricKind::Hormonal)
    }
}

/// Paired series for two metrics, restricted to days where both resolve
#[must_use]
pub fn paired_series(
    entries: &[DailyEntry],
    window: &DateRange,
    a: &MetricKey,
    b: &MetricKey,
) -> (Vec<f32>, Vec<f32>) {
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for entry in entries.iter().filter(|e| window.contains(e.date())) {
        if let (Some(x), Some(y)) = (resolve(entry, a), resolve(entry, b)) {
            xs.push(x);
            ys.push(y);
        }
    }
    (xs, ys)
}

/// Scan selected metrics for displayable correlations
///
/// `entries` is the full date-sorted history; the paired series are
/// restricted to `window`, while the hormonal span requirement looks at the
/// whole history. At most `max_pair_metrics` selected metrics participate.
/// Results are ordered by quality descending, ties kept in selection order,
/// so identical inputs always produce the identical list.
#[must_use]
pub fn scan(
    entries: &[DailyEntry],
    window: &DateRange,
    selected: &[MetricKey],
    catalog: &MetricCatalog,
    corr: CorrelationFn,
    thresholds: &Thresholds,
) -> Vec<CorrelationCandidate> {
    let pool = &selected[..selected.len().min(thresholds.max_pair_metrics)];
    let ctx = GateContext {
        logged_days: logged_days(entries, window),
        history_span_days: history_span_days(entries),
    };

    let mut candidates = Vec::new();
    for (i, a) in pool.iter().enumerate() {
        for b in &pool[i + 1..] {
            if a == b {
                continue;
            }
            if let Some(candidate) = evaluate_pair(entries, window, a, b, catalog, corr, ctx, thresholds) {
                candidates.push(candidate);
            }
        }
    }

    candidates.sort_by(|x, y| y.quality.cmp(&x.quality));
    candidates
}

/// Gate, compute, and score one pair; `None` means suppressed
#[allow(clippy::too_many_arguments)]
fn evaluate_pair(
    entries: &[DailyEntry],
    window: &DateRange,
    a: &MetricKey,
    b: &MetricKey,
    catalog: &MetricCatalog,
    corr: CorrelationFn,
    ctx: GateContext,
    thresholds: &Thresholds,
) -> Option<CorrelationCandidate> {
    let kind_a = catalog.kind_of(a);
    let kind_b = catalog.kind_of(b);
    let (xs, ys) = paired_series(entries, window, a, b);
    let n = xs.len();

    if let Err(reason) = admit_pair(kind_a, kind_b, &xs, &ys, ctx, thresholds) {
        debug!("Rejected pair {} / {}: {}", a, b, reason);
        return None;
    }

    let Some(r) = corr(&xs, &ys).filter(|r| r.is_finite()) else {
        debug!(
            "Rejected pair {} / {}: {}",
            a,
            b,
            GateReject::UndefinedCoefficient
        );
        return None;
    };

    if r.abs() < thresholds.r_floor {
        debug!(
            "Rejected pair {} / {}: {}",
            a,
            b,
            GateReject::WeakCoefficient { r }
        );
        return None;
    }

    let quality = extended_score(r, n, kind_a, kind_b, thresholds);
    if quality < thresholds.display_floor {
        debug!(
            "Suppressed pair {} / {}: quality {} below display floor {}",
            a, b, quality, thresholds.display_floor
        );
        return None;
    }

    Some(CorrelationCandidate {
        a: a.clone(),
        b: b.clone(),
        r,
        n,
        kind_a,
        kind_b,
        quality,
        confidence: confidence(r, n, thresholds),
    })
}
