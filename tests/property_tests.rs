//! Comprehensive property-based tests for pauta
//!
//! Following the trueno/aprender pattern:
//! - Test mathematical invariants
//! - Test data integrity properties
//! - Run with ProptestConfig::with_cases(100)
//! - Must complete in <30 seconds for pre-commit hook

use chrono::{Days, NaiveDate};
use pauta::correlation::{base_score, confidence, extended_score, scan};
use pauta::entry::{DailyEntry, Mood};
use pauta::experiment::{compare, ExperimentPlan};
use pauta::findings::rank;
use pauta::metric::{MetricCatalog, MetricKey, MetricKind, SymptomKey};
use pauta::stats;
use pauta::suggest::DismissalLedger;
use pauta::window::{DateRange, ExperimentWindows};
use pauta::Thresholds;
use proptest::prelude::*;

// ============================================================================
// Property Test Generators (Strategies)
// ============================================================================

fn base_day(i: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap() + Days::new(i as u64)
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

/// Generate any metric kind
fn arb_kind() -> impl Strategy<Value = MetricKind> {
    prop_oneof![
        Just(MetricKind::Physio),
        Just(MetricKind::Hormonal),
        Just(MetricKind::Behaviour),
        Just(MetricKind::State),
        Just(MetricKind::Other),
    ]
}

/// Generate a mood grade
fn arb_mood() -> impl Strategy<Value = Mood> {
    prop_oneof![Just(Mood::Low), Just(Mood::Okay), Just(Mood::Good)]
}

/// Sparse 21-day history where stress and sleep are each logged or skipped
/// independently per day
fn arb_mixed_history() -> impl Strategy<Value = Vec<DailyEntry>> {
    proptest::collection::vec(
        (
            proptest::option::of(0.0f32..=10.0),
            proptest::option::of(0.0f32..=10.0),
        ),
        21,
    )
    .prop_map(|days| {
        days.into_iter()
            .enumerate()
            .filter_map(|(i, (stress, sleep))| {
                if stress.is_none() && sleep.is_none() {
                    return None;
                }
                let mut builder = DailyEntry::builder(base_day(i));
                if let Some(v) = stress {
                    builder = builder.symptom(SymptomKey::Stress, v);
                }
                if let Some(v) = sleep {
                    builder = builder.symptom(SymptomKey::SleepQuality, v);
                }
                Some(builder.build())
            })
            .collect()
    })
}

/// Sparse 30-day history logging only body signals (headache and cramps)
fn arb_body_history() -> impl Strategy<Value = Vec<DailyEntry>> {
    proptest::collection::vec(
        (
            proptest::option::of(0.0f32..=10.0),
            proptest::option::of(0.0f32..=10.0),
        ),
        30,
    )
    .prop_map(|days| {
        days.into_iter()
            .enumerate()
            .filter_map(|(i, (headache, cramps))| {
                if headache.is_none() && cramps.is_none() {
                    return None;
                }
                let mut builder = DailyEntry::builder(base_day(i));
                if let Some(v) = headache {
                    builder = builder.symptom(SymptomKey::Headache, v);
                }
                if let Some(v) = cramps {
                    builder = builder.symptom(SymptomKey::Cramps, v);
                }
                Some(builder.build())
            })
            .collect()
    })
}

/// Sparse 15-day mood history covering both experiment windows and some
/// days before either
fn arb_mood_history() -> impl Strategy<Value = Vec<DailyEntry>> {
    proptest::collection::vec(proptest::option::of(arb_mood()), 15).prop_map(|days| {
        days.into_iter()
            .enumerate()
            .filter_map(|(i, mood)| mood.map(|m| DailyEntry::builder(base_day(i)).mood(m).build()))
            .collect()
    })
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // ========================================================================
    // Scoring Properties
    // ========================================================================

    /// Property: quality scores never leave the 0..=100 scale
    #[test]
    fn prop_scores_bounded(
        r in -1.0f32..=1.0,
        n in 0usize..40,
        kind_a in arb_kind(),
        kind_b in arb_kind()
    ) {
        let t = Thresholds::default();
        prop_assert!(base_score(r, n, &t) <= 100);
        prop_assert!(extended_score(r, n, kind_a, kind_b, &t) <= 100);
    }

    /// Property: swapping the pair changes neither quality nor confidence
    #[test]
    fn prop_extended_score_symmetric(
        r in -1.0f32..=1.0,
        n in 0usize..40,
        kind_a in arb_kind(),
        kind_b in arb_kind()
    ) {
        let t = Thresholds::default();
        prop_assert_eq!(
            extended_score(r, n, kind_a, kind_b, &t),
            extended_score(r, n, kind_b, kind_a, &t)
        );
    }

    /// Property: the coefficient's sign carries direction, not quality
    #[test]
    fn prop_score_sign_invariant(r in 0.0f32..=1.0, n in 0usize..40) {
        let t = Thresholds::default();
        prop_assert_eq!(base_score(r, n, &t), base_score(-r, n, &t));
        prop_assert_eq!(confidence(r, n, &t), confidence(-r, n, &t));
    }

    /// Property: a stronger coefficient never lowers the base score
    #[test]
    fn prop_score_monotonic_in_r(
        r1 in 0.0f32..=1.0,
        r2 in 0.0f32..=1.0,
        n in 0usize..40
    ) {
        let t = Thresholds::default();
        let (lo, hi) = if r1 <= r2 { (r1, r2) } else { (r2, r1) };
        prop_assert!(base_score(hi, n, &t) >= base_score(lo, n, &t));
    }

    /// Property: more paired observations never lower the score
    #[test]
    fn prop_score_monotonic_in_n(
        r in -1.0f32..=1.0,
        n1 in 0usize..40,
        n2 in 0usize..40,
        kind_a in arb_kind(),
        kind_b in arb_kind()
    ) {
        let t = Thresholds::default();
        let (lo, hi) = if n1 <= n2 { (n1, n2) } else { (n2, n1) };
        prop_assert!(base_score(r, hi, &t) >= base_score(r, lo, &t));
        prop_assert!(
            extended_score(r, hi, kind_a, kind_b, &t)
                >= extended_score(r, lo, kind_a, kind_b, &t)
        );
    }

    /// Property: confidence always maps onto a known display label
    #[test]
    fn prop_confidence_labels_closed_set(r in -1.0f32..=1.0, n in 0usize..40) {
        let t = Thresholds::default();
        let c = confidence(r, n, &t);
        prop_assert!(matches!(c.label(), "weak" | "moderate" | "strong"));
    }

    // ========================================================================
    // Gate Properties
    // ========================================================================

    /// Property: two body signals never correlate, whatever the data
    #[test]
    fn prop_body_pairs_never_emitted(history in arb_body_history()) {
        let window = DateRange::new(base_day(0), base_day(29)).unwrap();
        let selected = [
            MetricKey::Builtin(SymptomKey::Headache),
            MetricKey::Builtin(SymptomKey::Cramps),
        ];
        let catalog = MetricCatalog::new();
        let t = Thresholds::default();

        let candidates = scan(&history, &window, &selected, &catalog, pearson, &t);
        prop_assert!(candidates.is_empty());
    }

    /// Property: every emitted candidate clears the published floors
    #[test]
    fn prop_scan_output_honors_floors(history in arb_mixed_history()) {
        let window = DateRange::new(base_day(0), base_day(20)).unwrap();
        let selected = [
            MetricKey::Builtin(SymptomKey::Stress),
            MetricKey::Builtin(SymptomKey::SleepQuality),
        ];
        let catalog = MetricCatalog::new();
        let t = Thresholds::default();

        for candidate in scan(&history, &window, &selected, &catalog, pearson, &t) {
            prop_assert!(candidate.r.abs() >= t.r_floor);
            prop_assert!(candidate.quality >= t.display_floor);
            prop_assert!(candidate.quality <= 100);
            prop_assert!(candidate.n >= 2);
        }
    }

    // ========================================================================
    // Window Properties
    // ========================================================================

    /// Property: during starts at the plan start; baseline ends the day
    /// before; both span the full duration
    #[test]
    fn prop_experiment_windows_partition(offset in 0u64..3650, duration in 1u32..=60) {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + Days::new(offset);
        let windows = ExperimentWindows::for_plan(start, duration).unwrap();

        prop_assert_eq!(windows.during.start(), start);
        prop_assert_eq!(windows.during.len_days(), duration);
        prop_assert_eq!(windows.baseline.len_days(), duration);
        prop_assert!(windows.baseline.end() < windows.during.start());
        prop_assert_eq!(windows.baseline.end() + Days::new(1), start);
    }

    // ========================================================================
    // Comparison Properties
    // ========================================================================

    /// Property: the enough-data verdict follows the per-window point floor
    #[test]
    fn prop_compare_enough_data_floor(history in arb_mood_history()) {
        let plan = ExperimentPlan::builder("prop-plan", "Window floor", base_day(10), 5)
            .metric(MetricKey::Mood)
            .build()
            .unwrap();
        let windows = plan.windows().unwrap();
        let t = Thresholds::default();

        let result = compare(&history, &plan, &t).unwrap();

        let baseline_days = history
            .iter()
            .filter(|e| windows.baseline.contains(e.date()))
            .count();
        let during_days = history
            .iter()
            .filter(|e| windows.during.contains(e.date()))
            .count();
        prop_assert_eq!(result.baseline_logged_days(), baseline_days);
        prop_assert_eq!(result.during_logged_days(), during_days);

        let comparison = &result.metrics()[0];
        prop_assert_eq!(
            comparison.has_enough_data(),
            comparison.baseline().count() >= t.compare_min_points
                && comparison.during().count() >= t.compare_min_points
        );
        prop_assert_eq!(
            result.enough_data(),
            result.metrics().iter().any(|m| m.has_enough_data())
        );
    }

    // ========================================================================
    // Suggestion Properties
    // ========================================================================

    /// Property: a dismissal suppresses for exactly ttl days
    #[test]
    fn prop_dismissal_cooldown_is_exact(offset in 0u64..30, ttl in 1u32..14) {
        let dismissed_on = base_day(0);
        let today = dismissed_on + Days::new(offset);
        let mut ledger = DismissalLedger::new();
        ledger.dismiss("swap-rule", dismissed_on, ttl);

        prop_assert_eq!(
            ledger.is_suppressed("swap-rule", today, ttl),
            offset < u64::from(ttl)
        );
    }

    // ========================================================================
    // Findings Properties
    // ========================================================================

    /// Property: findings only ever name selected metrics
    #[test]
    fn prop_findings_name_only_selected_metrics(history in arb_mixed_history()) {
        let window = DateRange::new(base_day(0), base_day(20)).unwrap();
        let selected = [
            MetricKey::Builtin(SymptomKey::Stress),
            MetricKey::Builtin(SymptomKey::SleepQuality),
        ];
        let catalog = MetricCatalog::new();
        let t = Thresholds::default();

        let findings = rank(&history, &window, &selected, &catalog, pearson, &t);
        for finding in &findings {
            for metric in &finding.metrics {
                prop_assert!(selected.contains(metric));
            }
        }
    }

    // ========================================================================
    // Statistics Properties
    // ========================================================================

    /// Property: the mean stays inside the sample's bounds
    #[test]
    fn prop_mean_within_sample_bounds(
        series in proptest::collection::vec(-100.0f32..=100.0, 1..50)
    ) {
        let mean = stats::mean(&series).unwrap();
        let min = series.iter().copied().fold(f32::INFINITY, f32::min);
        let max = series.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        prop_assert!(mean >= min - 1e-3);
        prop_assert!(mean <= max + 1e-3);
    }

    /// Property: sample variance is never negative
    #[test]
    fn prop_variance_non_negative(
        series in proptest::collection::vec(-100.0f32..=100.0, 2..50)
    ) {
        let variance = stats::sample_variance(&series).unwrap();
        prop_assert!(variance >= 0.0);
    }

    /// Property: stddev squares back to variance
    #[test]
    fn prop_stddev_squares_to_variance(
        series in proptest::collection::vec(-50.0f32..=50.0, 2..40)
    ) {
        let variance = stats::sample_variance(&series).unwrap();
        let stddev = stats::sample_stddev(&series).unwrap();
        prop_assert!((stddev * stddev - variance).abs() <= variance.max(1.0) * 1e-4);
    }
}

// ============================================================================
// QuickCheck Scorer Laws
// ============================================================================

quickcheck::quickcheck! {
    fn qc_base_score_bounded(r_mil: i16, n: u8) -> bool {
        let t = Thresholds::default();
        let r = f32::from(r_mil.rem_euclid(2001) - 1000) / 1000.0;
        base_score(r, usize::from(n), &t) <= 100
    }

    fn qc_extended_score_kind_swap_symmetric(r_mil: i16, n: u8) -> bool {
        let t = Thresholds::default();
        let r = f32::from(r_mil.rem_euclid(2001) - 1000) / 1000.0;
        let kinds = [
            MetricKind::Physio,
            MetricKind::Hormonal,
            MetricKind::Behaviour,
            MetricKind::State,
            MetricKind::Other,
        ];
        kinds.iter().all(|&a| {
            kinds.iter().all(|&b| {
                extended_score(r, usize::from(n), a, b, &t)
                    == extended_score(r, usize::from(n), b, a, &t)
            })
        })
    }

    fn qc_confidence_sign_invariant(r_mil: i16, n: u8) -> bool {
        let t = Thresholds::default();
        let r = f32::from(r_mil.rem_euclid(2001) - 1000) / 1000.0;
        confidence(r, usize::from(n), &t) == confidence(-r, usize::from(n), &t)
    }
}
