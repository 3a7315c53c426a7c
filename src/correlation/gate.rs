//! Admission gate for correlation candidates
//!
//! A pair must clear every check before the coefficient is even computed:
//! kind exclusion first, then overlap minimums that scale with how much
//! history exists, then per-series variance over the overlap days. The |r|
//! floor is applied by the scanner after the injected primitive runs. Each
//! rejection carries its reason so a suppressed pair can be explained, not
//! just absent.

use std::fmt;

use crate::config::Thresholds;
use crate::metric::MetricKind;
use crate::stats;

/// Why a candidate pair was rejected
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateReject {
    /// Both metrics are body signals (physiological or hormonal); reporting
    /// co-movement between them reads as diagnosis and is always suppressed
    BodyPair,
    /// A series is too flat to carry correlation signal
    LowVariance {
        /// Sample variance of the flatter series
        variance: f32,
    },
    /// Too few paired observations for the current history phase
    InsufficientOverlap {
        /// Paired observations present
        got: usize,
        /// Minimum the phase requires
        needed: usize,
    },
    /// Hormonal pair evaluated before enough calendar history exists
    HormonalSpan {
        /// Calendar days of history present
        got: u32,
        /// Minimum span required
        needed: u32,
    },
    /// Early-phase pairs must involve a behaviour or state metric
    EarlyKindMix,
    /// The primitive returned no coefficient (degenerate input)
    UndefinedCoefficient,
    /// |r| fell below the absolute floor
    WeakCoefficient {
        /// Coefficient produced by the primitive
        r: f32,
    },
}

impl fmt::Display for GateReject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BodyPair => write!(f, "body-signal pair"),
            Self::LowVariance { variance } => write!(f, "variance {variance:.3} below floor"),
            Self::InsufficientOverlap { got, needed } => {
                write!(f, "overlap {got} below minimum {needed}")
            }
            Self::HormonalSpan { got, needed } => {
                write!(f, "history span {got}d below hormonal minimum {needed}d")
            }
            Self::EarlyKindMix => write!(f, "early window requires a behaviour or state metric"),
            Self::UndefinedCoefficient => write!(f, "coefficient undefined"),
            Self::WeakCoefficient { r } => write!(f, "|r| {:.2} below floor", r.abs()),
        }
    }
}

/// History context the overlap minimums depend on
#[derive(Debug, Clone, Copy)]
pub struct GateContext {
    /// Days with any logged observation inside the analysis window
    pub logged_days: usize,
    /// Calendar span of the full history, first entry to last
    pub history_span_days: u32,
}

/// Check a pair against every pre-coefficient gate
///
/// `xs`/`ys` are the overlap-restricted paired series: only days where both
/// metrics resolve. Variance is checked on these, not on each metric's full
/// series, since the coefficient only ever sees the overlap.
///
/// # Errors
///
/// Returns the first `GateReject` encountered, in fixed check order.
pub fn admit_pair(
    kind_a: MetricKind,
    kind_b: MetricKind,
    xs: &[f32],
    ys: &[f32],
    ctx: GateContext,
    thresholds: &Thresholds,
) -> Result<(), GateReject> {
    if kind_a.is_body() && kind_b.is_body() {
        return Err(GateReject::BodyPair);
    }

    let n = xs.len().min(ys.len());
    let needed = overlap_minimum(kind_a, kind_b, ctx, thresholds)?;
    if n < needed {
        return Err(GateReject::InsufficientOverlap { got: n, needed });
    }

    for series in [xs, ys] {
        let variance = stats::sample_variance(series).unwrap_or(0.0);
        if variance < thresholds.variance_floor {
            return Err(GateReject::LowVariance { variance });
        }
    }

    Ok(())
}

/// Overlap minimum for the pair's kind mix and history phase
fn overlap_minimum(
    kind_a: MetricKind,
    kind_b: MetricKind,
    ctx: GateContext,
    thresholds: &Thresholds,
) -> Result<usize, GateReject> {
    if kind_a == MetricKind::Hormonal || kind_b == MetricKind::Hormonal {
        if ctx.history_span_days < thresholds.hormonal_min_span_days {
            return Err(GateReject::HormonalSpan {
                got: ctx.history_span_days,
                needed: thresholds.hormonal_min_span_days,
            });
        }
        return Ok(thresholds.hormonal_min_overlap);
    }

    if ctx.logged_days < thresholds.early_window_days {
        let actionable = matches!(kind_a, MetricKind::Behaviour | MetricKind::State)
            || matches!(kind_b, MetricKind::Behaviour | MetricKind::State);
        if !actionable {
            return Err(GateReject::EarlyKindMix);
        }
        return Ok(thresholds.early_min_overlap);
    }

    Ok(thresholds.deep_min_overlap)
}
