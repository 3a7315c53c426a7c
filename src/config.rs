//! Threshold configuration for insight generation
//!
//! Every heuristic the engine applies lives here as a named field: variance
//! floors, overlap minimums, score weights and penalties, display cut-offs,
//! dismissal TTLs. Nothing in the analysis code compares against a literal
//! that is not declared in this struct (Genchi Genbutsu: go see the actual
//! threshold, not a buried constant).

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Tunable thresholds for gating, scoring, ranking, and suggestions
///
/// `Default` carries the audited constants the engine ships with. The
/// `strict()` and `permissive()` presets move every gate in the same
/// direction so callers do not have to reason about field interactions.
///
/// # Example
/// ```
/// use pauta::Thresholds;
///
/// let t = Thresholds::default();
/// assert_eq!(t.variance_floor, 0.15);
/// assert!(t.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thresholds {
    // --- Correlation gate ---
    /// Minimum sample variance for each series in a candidate pair
    ///
    /// Flat-lined series (someone logging 5 every day) correlate spuriously
    /// with everything. Variance is computed over the overlap-restricted
    /// sub-series with the n-1 denominator.
    pub variance_floor: f32,

    /// Minimum |r| for a pair to survive the gate
    pub r_floor: f32,

    /// Minimum calendar span (days) of logged history before a pair
    /// involving a hormonal metric may be evaluated
    ///
    /// Hormonal metrics need at least two weeks of context before any claim
    /// about them is defensible.
    pub hormonal_min_span_days: u32,

    /// Minimum paired observations for a pair involving a hormonal metric
    pub hormonal_min_overlap: usize,

    /// Logged-day count below which a window is treated as "early"
    pub early_window_days: usize,

    /// Minimum paired observations in an early window (behaviour or state
    /// metrics only)
    pub early_min_overlap: usize,

    /// Minimum paired observations once past the early window
    pub deep_min_overlap: usize,

    /// Maximum selected metrics considered per pair scan
    pub max_pair_metrics: usize,

    // --- Quality score ---
    /// |r| at which strength begins to count (scores 0 below this)
    pub strength_floor: f32,

    /// |r| span over which strength ramps from 0 to 1
    pub strength_span: f32,

    /// Paired-observation count at which support saturates to 1
    pub support_saturation: f32,

    /// Weight of the strength term in the base score
    pub strength_weight: f32,

    /// Weight of the support term in the base score
    pub support_weight: f32,

    /// Bonus when the pair is exactly one behaviour and one state metric
    ///
    /// Behaviour-vs-state pairs are the actionable ones: the user can change
    /// the behaviour and watch the state.
    pub behaviour_state_bonus: i32,

    /// Penalty when both metrics are physiological or hormonal
    pub body_pair_penalty: i32,

    /// Penalty when one metric is behavioural and the other physiological
    /// or hormonal
    pub behaviour_body_penalty: i32,

    /// Paired-observation count below which the score is capped
    pub small_n_floor: usize,

    /// Score cap applied when the pair has fewer than `small_n_floor` points
    pub small_n_cap: i32,

    /// Penalty when |r| is below `r_floor`
    pub weak_r_penalty: i32,

    /// Minimum extended score for a pair to be displayed at all
    pub display_floor: u8,

    // --- Confidence tiers ---
    /// |r| floor for high confidence
    pub high_confidence_r: f32,

    /// Paired-observation floor for high confidence
    pub high_confidence_n: usize,

    /// |r| floor for medium confidence
    pub medium_confidence_r: f32,

    /// Paired-observation floor for medium confidence
    pub medium_confidence_n: usize,

    // --- Findings ---
    /// Maximum findings returned per request
    pub max_findings: usize,

    /// Minimum resolved points before a trend slope is fitted
    pub trend_min_points: usize,

    /// Minimum |slope| (units per day) for a trend to be reported
    pub trend_min_slope: f32,

    /// Minimum |day-over-day change| for a delta finding
    pub delta_min_change: f32,

    /// Selected-metric count below which the engagement nudge fires
    pub nudge_below_selected: usize,

    // --- Experiment comparison ---
    /// Minimum resolved points in each window before a metric's comparison
    /// counts as having enough data
    ///
    /// Two points per window is the floor below which a single unusual day
    /// owns the average outright.
    pub compare_min_points: usize,

    // --- Suggestions ---
    /// Calendar days scanned backwards from "today" by the suggestion engine
    pub suggest_window_days: u32,

    /// Minimum logged days in the scan window before any rule fires
    pub suggest_min_logged_days: usize,

    /// Minimum resolved points for a rule's metric within the scan window
    pub suggest_min_points: usize,

    /// Days a dismissed suggestion stays suppressed
    pub dismissal_ttl_days: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            variance_floor: 0.15,
            r_floor: 0.4,
            hormonal_min_span_days: 14,
            hormonal_min_overlap: 10,
            early_window_days: 7,
            early_min_overlap: 4,
            deep_min_overlap: 6,
            max_pair_metrics: 6,
            strength_floor: 0.35,
            strength_span: 0.45,
            support_saturation: 14.0,
            strength_weight: 0.65,
            support_weight: 0.35,
            behaviour_state_bonus: 10,
            body_pair_penalty: 15,
            behaviour_body_penalty: 10,
            small_n_floor: 6,
            small_n_cap: 55,
            weak_r_penalty: 12,
            display_floor: 35,
            high_confidence_r: 0.65,
            high_confidence_n: 12,
            medium_confidence_r: 0.50,
            medium_confidence_n: 8,
            max_findings: 8,
            trend_min_points: 3,
            trend_min_slope: 0.05,
            delta_min_change: 2.0,
            nudge_below_selected: 3,
            compare_min_points: 2,
            suggest_window_days: 21,
            suggest_min_logged_days: 7,
            suggest_min_points: 5,
            dismissal_ttl_days: 7,
        }
    }
}

impl Thresholds {
    /// Strict preset: every gate tightened, fewer claims survive
    ///
    /// Use when false positives are worse than silence.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            variance_floor: 0.25,
            r_floor: 0.5,
            hormonal_min_overlap: 14,
            early_min_overlap: 6,
            deep_min_overlap: 8,
            display_floor: 45,
            trend_min_slope: 0.1,
            compare_min_points: 3,
            suggest_min_logged_days: 10,
            ..Self::default()
        }
    }

    /// Permissive preset: gates loosened for sparse early histories
    ///
    /// Use in onboarding flows where some signal beats none.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            variance_floor: 0.10,
            hormonal_min_overlap: 8,
            early_min_overlap: 3,
            deep_min_overlap: 4,
            display_floor: 25,
            suggest_min_logged_days: 5,
            suggest_min_points: 4,
            ..Self::default()
        }
    }

    /// Validate field ranges
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` naming the first field out of range.
    pub fn validate(&self) -> Result<()> {
        if self.variance_floor < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "variance_floor must be non-negative, got {}",
                self.variance_floor
            )));
        }

        if !(0.0..=1.0).contains(&self.r_floor) {
            return Err(Error::InvalidConfig(format!(
                "r_floor must be in [0, 1], got {}",
                self.r_floor
            )));
        }

        if self.strength_span <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "strength_span must be positive, got {}",
                self.strength_span
            )));
        }

        if self.support_saturation < 1.0 {
            return Err(Error::InvalidConfig(format!(
                "support_saturation must be >= 1, got {}",
                self.support_saturation
            )));
        }

        if self.strength_weight < 0.0 || self.support_weight < 0.0 {
            return Err(Error::InvalidConfig(
                "score weights must be non-negative".to_string(),
            ));
        }

        let weight_sum = self.strength_weight + self.support_weight;
        if (weight_sum - 1.0).abs() > 1e-4 {
            return Err(Error::InvalidConfig(format!(
                "score weights must sum to 1, got {weight_sum}"
            )));
        }

        if self.display_floor > 100 {
            return Err(Error::InvalidConfig(format!(
                "display_floor must be <= 100, got {}",
                self.display_floor
            )));
        }

        if !(0..=100).contains(&self.small_n_cap) {
            return Err(Error::InvalidConfig(format!(
                "small_n_cap must be in [0, 100], got {}",
                self.small_n_cap
            )));
        }

        if self.medium_confidence_r > self.high_confidence_r {
            return Err(Error::InvalidConfig(
                "medium_confidence_r must not exceed high_confidence_r".to_string(),
            ));
        }

        if self.medium_confidence_n > self.high_confidence_n {
            return Err(Error::InvalidConfig(
                "medium_confidence_n must not exceed high_confidence_n".to_string(),
            ));
        }

        if self.trend_min_points < 2 {
            return Err(Error::InvalidConfig(format!(
                "trend_min_points must be >= 2 to fit a slope, got {}",
                self.trend_min_points
            )));
        }

        if self.max_pair_metrics < 2 {
            return Err(Error::InvalidConfig(format!(
                "max_pair_metrics must be >= 2 to form a pair, got {}",
                self.max_pair_metrics
            )));
        }

        if self.max_findings == 0 {
            return Err(Error::InvalidConfig(
                "max_findings must be >= 1".to_string(),
            ));
        }

        if self.compare_min_points == 0 {
            return Err(Error::InvalidConfig(
                "compare_min_points must be >= 1".to_string(),
            ));
        }

        if self.suggest_window_days == 0 {
            return Err(Error::InvalidConfig(
                "suggest_window_days must be >= 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let t = Thresholds::default();
        assert_eq!(t.variance_floor, 0.15);
        assert_eq!(t.r_floor, 0.4);
        assert_eq!(t.hormonal_min_span_days, 14);
        assert_eq!(t.hormonal_min_overlap, 10);
        assert_eq!(t.display_floor, 35);
        assert_eq!(t.max_findings, 8);
        assert_eq!(t.compare_min_points, 2);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_strict_preset() {
        let t = Thresholds::strict();
        assert_eq!(t.r_floor, 0.5);
        assert_eq!(t.display_floor, 45);
        assert!(t.variance_floor > Thresholds::default().variance_floor);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_permissive_preset() {
        let t = Thresholds::permissive();
        assert_eq!(t.display_floor, 25);
        assert!(t.deep_min_overlap < Thresholds::default().deep_min_overlap);
        assert!(t.validate().is_ok());
    }

    #[test]
    #[allow(clippy::field_reassign_with_default)]
    fn test_invalid_r_floor() {
        let mut t = Thresholds::default();
        t.r_floor = 1.5;
        assert!(t.validate().is_err());
    }

    #[test]
    #[allow(clippy::field_reassign_with_default)]
    fn test_invalid_weights() {
        let mut t = Thresholds::default();
        t.strength_weight = 0.9;
        assert!(t.validate().is_err());
    }

    #[test]
    #[allow(clippy::field_reassign_with_default)]
    fn test_invalid_trend_min_points() {
        let mut t = Thresholds::default();
        t.trend_min_points = 1;
        assert!(t.validate().is_err());
    }

    #[test]
    #[allow(clippy::field_reassign_with_default)]
    fn test_confidence_tier_ordering() {
        let mut t = Thresholds::default();
        t.medium_confidence_r = 0.9;
        assert!(t.validate().is_err());
    }
}
