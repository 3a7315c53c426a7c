//! Correlation quality scoring
//!
//! Two independent signals per pair: a 0-100 quality score that blends
//! coefficient strength with sample support, and a coarse confidence tier.
//! The extended score layers kind-pairing adjustments on top of the base
//! blend, then applies the small-sample cap and weak-coefficient penalty
//! last so no bonus can lift an under-supported pair past them.

use serde::{Deserialize, Serialize};

use crate::config::Thresholds;
use crate::metric::MetricKind;

/// Coarse confidence tier for a correlation claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// Weak or thinly supported
    Low,
    /// Moderate coefficient with reasonable support
    Medium,
    /// Strong coefficient with solid support
    High,
}

impl Confidence {
    /// Display label for report payloads
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "weak",
            Self::Medium => "moderate",
            Self::High => "strong",
        }
    }
}

/// Base quality score from |r| and paired-observation count
///
/// Strength ramps linearly across the coefficient band worth talking about;
/// support saturates at two weeks of paired days. The blend is rounded to
/// an integer score so two runs over the same data can never flicker
/// between adjacent ranks.
#[must_use]
pub fn base_score(r: f32, n: usize, thresholds: &Thresholds) -> u8 {
    let strength = ((r.abs() - thresholds.strength_floor) / thresholds.strength_span)
        .clamp(0.0, 1.0);
    #[allow(clippy::cast_precision_loss)]
    let support = (n as f32 / thresholds.support_saturation).min(1.0);
    let blended =
        100.0 * (thresholds.strength_weight * strength + thresholds.support_weight * support);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        blended.round().clamp(0.0, 100.0) as u8
    }
}

/// Confidence tier from |r| and paired-observation count
#[must_use]
pub fn confidence(r: f32, n: usize, thresholds: &Thresholds) -> Confidence {
    let r_abs = r.abs();
    if r_abs >= thresholds.high_confidence_r && n >= thresholds.high_confidence_n {
        Confidence::High
    } else if r_abs >= thresholds.medium_confidence_r && n >= thresholds.medium_confidence_n {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

/// Extended quality score with kind-pairing adjustments
///
/// Adjustment order is fixed: pairing bonus/penalties first, the
/// small-sample cap second, the weak-coefficient penalty third, final
/// clamp last. The weak-|r| penalty is redundant behind the gate but keeps
/// this function total over any candidate it is handed.
#[must_use]
pub fn extended_score(
    r: f32,
    n: usize,
    kind_a: MetricKind,
    kind_b: MetricKind,
    thresholds: &Thresholds,
) -> u8 {
    let mut score = i32::from(base_score(r, n, thresholds));

    if is_behaviour_state(kind_a, kind_b) {
        score += thresholds.behaviour_state_bonus;
    }
    if kind_a.is_body() && kind_b.is_body() {
        score -= thresholds.body_pair_penalty;
    }
    if is_behaviour_body(kind_a, kind_b) {
        score -= thresholds.behaviour_body_penalty;
    }

    if n < thresholds.small_n_floor {
        score = score.min(thresholds.small_n_cap);
    }

    if r.abs() < thresholds.r_floor {
        score -= thresholds.weak_r_penalty;
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        score.clamp(0, 100) as u8
    }
}

/// Exactly one behaviour and one state metric
const fn is_behaviour_state(a: MetricKind, b: MetricKind) -> bool {
    matches!(
        (a, b),
        (MetricKind::Behaviour, MetricKind::State) | (MetricKind::State, MetricKind::Behaviour)
    )
}

/// One behaviour metric against a body signal
const fn is_behaviour_body(a: MetricKind, b: MetricKind) -> bool {
    (matches!(a, MetricKind::Behaviour) && b.is_body())
        || (matches!(b, MetricKind::Behaviour) && a.is_body())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_score_saturated() {
        let t = Thresholds::default();
        // strength and support both saturate
        assert_eq!(base_score(0.8, 14, &t), 100);
        assert_eq!(base_score(-0.8, 20, &t), 100);
    }

    #[test]
    fn test_base_score_known_blend() {
        let t = Thresholds::default();
        // strength = (0.5-0.35)/0.45 = 1/3, support = 7/14 = 0.5
        // base = round(100 * (0.65/3 + 0.175)) = round(39.17) = 39
        assert_eq!(base_score(0.5, 7, &t), 39);
    }

    #[test]
    fn test_base_score_below_strength_floor() {
        let t = Thresholds::default();
        // strength clamps to 0, only support contributes
        assert_eq!(base_score(0.2, 14, &t), 35);
        assert_eq!(base_score(0.0, 0, &t), 0);
    }

    #[test]
    fn test_confidence_tiers() {
        let t = Thresholds::default();
        assert_eq!(confidence(0.7, 12, &t), Confidence::High);
        assert_eq!(confidence(0.7, 11, &t), Confidence::Medium);
        assert_eq!(confidence(0.5, 8, &t), Confidence::Medium);
        assert_eq!(confidence(0.5, 7, &t), Confidence::Low);
        assert_eq!(confidence(0.45, 20, &t), Confidence::Low);
        // Sign never matters
        assert_eq!(confidence(-0.7, 12, &t), Confidence::High);
    }

    #[test]
    fn test_behaviour_state_bonus() {
        let t = Thresholds::default();
        let base = extended_score(0.6, 10, MetricKind::State, MetricKind::State, &t);
        let boosted = extended_score(0.6, 10, MetricKind::Behaviour, MetricKind::State, &t);
        assert_eq!(i32::from(boosted) - i32::from(base), 10);
    }

    #[test]
    fn test_body_pair_penalty() {
        let t = Thresholds::default();
        let neutral = extended_score(0.6, 10, MetricKind::State, MetricKind::State, &t);
        let body = extended_score(0.6, 10, MetricKind::Physio, MetricKind::Hormonal, &t);
        assert_eq!(i32::from(neutral) - i32::from(body), 15);
    }

    #[test]
    fn test_behaviour_body_penalty() {
        let t = Thresholds::default();
        let neutral = extended_score(0.6, 10, MetricKind::State, MetricKind::State, &t);
        let mixed = extended_score(0.6, 10, MetricKind::Behaviour, MetricKind::Physio, &t);
        assert_eq!(i32::from(neutral) - i32::from(mixed), 10);
    }

    #[test]
    fn test_small_sample_cap_beats_bonuses() {
        let t = Thresholds::default();
        // Saturated strength with a bonus, but only 4 paired days
        let score = extended_score(0.9, 4, MetricKind::Behaviour, MetricKind::State, &t);
        assert!(score <= 55);
    }

    #[test]
    fn test_weak_coefficient_penalty_applies_after_cap() {
        let t = Thresholds::default();
        let capped = extended_score(0.45, 4, MetricKind::Behaviour, MetricKind::State, &t);
        let weak = extended_score(0.3, 4, MetricKind::Behaviour, MetricKind::State, &t);
        assert!(weak < capped);
    }

    #[test]
    fn test_extended_score_is_clamped() {
        let t = Thresholds::default();
        let top = extended_score(1.0, 30, MetricKind::Behaviour, MetricKind::State, &t);
        assert!(top <= 100);
        let bottom = extended_score(0.0, 0, MetricKind::Physio, MetricKind::Hormonal, &t);
        assert_eq!(bottom, 0);
    }

    #[test]
    fn test_score_symmetric_in_kind_order() {
        let t = Thresholds::default();
        for (a, b) in [
            (MetricKind::Behaviour, MetricKind::State),
            (MetricKind::Behaviour, MetricKind::Physio),
            (MetricKind::Physio, MetricKind::Hormonal),
            (MetricKind::Other, MetricKind::State),
        ] {
            assert_eq!(
                extended_score(0.55, 9, a, b, &t),
                extended_score(0.55, 9, b, a, &t)
            );
        }
    }
}
