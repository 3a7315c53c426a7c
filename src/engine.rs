//! Engine facade - one configured entry point for all insight requests
//!
//! The engine owns nothing mutable. It bundles the metric catalogue, the
//! thresholds, and the injected correlation primitive, and every method is
//! a pure function of the entries passed in. Plan and dismissal state stay
//! in their store types; the caller owns those and the entry history.
//!
//! Callers supply entries date-sorted (oldest first). That contract is
//! asserted in debug builds rather than re-sorted here, since re-sorting
//! would hide a storage-layer bug.

use chrono::NaiveDate;

use crate::config::Thresholds;
use crate::correlation::{self, CorrelationCandidate, CorrelationFn};
use crate::cycle::{phase_averages, PhaseAverage, PhaseEstimator};
use crate::entry::DailyEntry;
use crate::error::Result;
use crate::experiment::{self, ComparisonDigest, ComparisonResult, ExperimentPlan};
use crate::findings::{self, Finding};
use crate::metric::{MetricCatalog, MetricKey, TrackingProfile};
use crate::report::InsightReport;
use crate::suggest::{self, DismissalLedger, Suggestion};
use crate::window::DateRange;

/// Configured insight engine
///
/// # Example
/// ```
/// use pauta::{InsightEngine, MetricCatalog};
///
/// fn pearson(xs: &[f32], ys: &[f32]) -> Option<f32> {
///     let n = xs.len();
///     if n < 2 || n != ys.len() {
///         return None;
///     }
///     let nf = n as f32;
///     let mx = xs.iter().sum::<f32>() / nf;
///     let my = ys.iter().sum::<f32>() / nf;
///     let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
///     for (x, y) in xs.iter().zip(ys) {
///         sxy += (x - mx) * (y - my);
///         sxx += (x - mx) * (x - mx);
///         syy += (y - my) * (y - my);
///     }
///     let denom = (sxx * syy).sqrt();
///     if denom < f32::EPSILON {
///         return None;
///     }
///     Some(sxy / denom)
/// }
///
/// let engine = InsightEngine::new(MetricCatalog::new(), pearson);
/// assert_eq!(engine.thresholds().max_findings, 8);
/// ```
#[derive(Debug, Clone)]
pub struct InsightEngine {
    catalog: MetricCatalog,
    thresholds: Thresholds,
    corr: CorrelationFn,
}

impl InsightEngine {
    /// Create an engine with the default thresholds.
    ///
    /// `corr` is the correlation primitive (typically Pearson's r over the
    /// paired overlap series); the engine gates, scores, and ranks, but
    /// never computes the coefficient itself.
    #[must_use]
    pub fn new(catalog: MetricCatalog, corr: CorrelationFn) -> Self {
        Self {
            catalog,
            thresholds: Thresholds::default(),
            corr,
        }
    }

    /// Create an engine with custom thresholds.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if any threshold is out of range.
    pub fn with_thresholds(
        catalog: MetricCatalog,
        thresholds: Thresholds,
        corr: CorrelationFn,
    ) -> Result<Self> {
        thresholds.validate()?;
        Ok(Self {
            catalog,
            thresholds,
            corr,
        })
    }

    /// Get the metric catalogue.
    #[must_use]
    pub const fn catalog(&self) -> &MetricCatalog {
        &self.catalog
    }

    /// Get the active thresholds.
    #[must_use]
    pub const fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Ranked findings for the window, fixed priority order.
    #[must_use]
    pub fn findings(
        &self,
        entries: &[DailyEntry],
        window: &DateRange,
        selected: &[MetricKey],
    ) -> Vec<Finding> {
        debug_assert_date_sorted(entries);
        findings::rank(
            entries,
            window,
            selected,
            &self.catalog,
            self.corr,
            &self.thresholds,
        )
    }

    /// Gated correlation candidates for the window, best quality first.
    #[must_use]
    pub fn correlations(
        &self,
        entries: &[DailyEntry],
        window: &DateRange,
        selected: &[MetricKey],
    ) -> Vec<CorrelationCandidate> {
        debug_assert_date_sorted(entries);
        correlation::scan(
            entries,
            window,
            selected,
            &self.catalog,
            self.corr,
            &self.thresholds,
        )
    }

    /// Micro-experiment suggestions from the recent scan window.
    #[must_use]
    pub fn suggestions(
        &self,
        entries: &[DailyEntry],
        today: NaiveDate,
        profile: &TrackingProfile,
        ledger: &DismissalLedger,
    ) -> Vec<Suggestion> {
        debug_assert_date_sorted(entries);
        suggest::scan(entries, today, profile, ledger, &self.thresholds)
    }

    /// Baseline vs. during comparison for a plan.
    ///
    /// # Errors
    ///
    /// Returns `Error::DateOutOfRange` if the plan's windows cannot be
    /// constructed.
    pub fn compare(
        &self,
        entries: &[DailyEntry],
        plan: &ExperimentPlan,
    ) -> Result<ComparisonResult> {
        debug_assert_date_sorted(entries);
        experiment::compare(entries, plan, &self.thresholds)
    }

    /// Comparison frozen into a digest, ready to attach to an outcome.
    ///
    /// # Errors
    ///
    /// Returns `Error::DateOutOfRange` if the plan's windows cannot be
    /// constructed.
    pub fn digest(
        &self,
        entries: &[DailyEntry],
        plan: &ExperimentPlan,
    ) -> Result<ComparisonDigest> {
        let result = self.compare(entries, plan)?;
        Ok(ComparisonDigest::freeze(result, &self.catalog))
    }

    /// Serializable snapshot of the window's findings and correlations.
    #[must_use]
    pub fn report(
        &self,
        entries: &[DailyEntry],
        window: &DateRange,
        timeframe_label: &str,
        selected: &[MetricKey],
    ) -> InsightReport {
        debug_assert_date_sorted(entries);
        let in_window = entries
            .iter()
            .filter(|e| window.contains(e.date()))
            .count();
        let findings = self.findings(entries, window, selected);
        let correlations = self.correlations(entries, window, selected);
        InsightReport::compose(
            timeframe_label,
            in_window,
            selected,
            &findings,
            &correlations,
            &self.catalog,
        )
    }

    /// One metric's averages grouped by estimated cycle phase.
    #[must_use]
    pub fn phase_averages(
        &self,
        entries: &[DailyEntry],
        metric: &MetricKey,
        estimator: &dyn PhaseEstimator,
    ) -> Vec<PhaseAverage> {
        debug_assert_date_sorted(entries);
        phase_averages(entries, metric, estimator)
    }
}

fn debug_assert_date_sorted(entries: &[DailyEntry]) {
    debug_assert!(
        entries.windows(2).all(|w| w[0].date() <= w[1].date()),
        "entries must be date-sorted, oldest first"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::FlagKey;
    use crate::metric::SymptomKey;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn pearson(xs: &[f32], ys: &[f32]) -> Option<f32> {
        let n = xs.len();
        if n < 2 || n != ys.len() {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let nf = n as f32;
        let mx = xs.iter().sum::<f32>() / nf;
        let my = ys.iter().sum::<f32>() / nf;
        let mut sxy = 0.0;
        let mut sxx = 0.0;
        let mut syy = 0.0;
        for (x, y) in xs.iter().zip(ys) {
            sxy += (x - mx) * (y - my);
            sxx += (x - mx) * (x - mx);
            syy += (y - my) * (y - my);
        }
        let denom = (sxx * syy).sqrt();
        if denom < f32::EPSILON {
            return None;
        }
        Some(sxy / denom)
    }

    fn rising_stress() -> Vec<DailyEntry> {
        (0..10u32)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let v = (i as f32).mul_add(0.8, 1.0);
                DailyEntry::builder(day(1 + i))
                    .symptom(SymptomKey::Stress, v)
                    .build()
            })
            .collect()
    }

    #[test]
    fn test_engine_findings_delegate() {
        let engine = InsightEngine::new(MetricCatalog::new(), pearson);
        let entries = rising_stress();
        let window = DateRange::new(day(1), day(10)).unwrap();
        let findings = engine.findings(
            &entries,
            &window,
            &[MetricKey::Builtin(SymptomKey::Stress)],
        );
        assert!(findings[0].title.contains("trending up"));
    }

    #[test]
    #[allow(clippy::field_reassign_with_default)]
    fn test_engine_rejects_invalid_thresholds() {
        let mut thresholds = Thresholds::default();
        thresholds.r_floor = 2.0;
        let result = InsightEngine::with_thresholds(MetricCatalog::new(), thresholds, pearson);
        assert!(result.is_err());
    }

    #[test]
    fn test_engine_accepts_presets() {
        let strict =
            InsightEngine::with_thresholds(MetricCatalog::new(), Thresholds::strict(), pearson);
        assert!(strict.is_ok());
        let permissive = InsightEngine::with_thresholds(
            MetricCatalog::new(),
            Thresholds::permissive(),
            pearson,
        );
        assert!(permissive.is_ok());
    }

    #[test]
    fn test_engine_report_counts_window_entries() {
        let engine = InsightEngine::new(MetricCatalog::new(), pearson);
        let entries = rising_stress();
        // Window covering only the last 4 days
        let window = DateRange::new(day(7), day(10)).unwrap();
        let report = engine.report(
            &entries,
            &window,
            "Last 4 days",
            &[MetricKey::Builtin(SymptomKey::Stress)],
        );
        assert_eq!(report.entries(), 4);
        assert_eq!(report.timeframe_label(), "Last 4 days");
    }

    #[test]
    fn test_engine_digest_round_trip() {
        let engine = InsightEngine::new(MetricCatalog::new(), pearson);
        let entries: Vec<DailyEntry> = (3..=16u32)
            .map(|d| {
                let stress = if d < 10 { 6.0 } else { 4.0 };
                DailyEntry::builder(day(d))
                    .symptom(SymptomKey::Stress, stress)
                    .build()
            })
            .collect();
        let plan = ExperimentPlan::builder("plan-1", "Evening walks", day(10), 7)
            .metric(MetricKey::Builtin(SymptomKey::Stress))
            .change_flag(FlagKey::Exercise)
            .build()
            .unwrap();

        let digest = engine.digest(&entries, &plan).unwrap();
        assert!(digest.result().enough_data());
        assert!(digest.summary().contains("Stress"));
    }
}
