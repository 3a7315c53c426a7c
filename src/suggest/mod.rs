//! Pattern-triggered micro-experiment suggestions ("try next")
//!
//! Five fixed rules scan the recent weeks for shapes worth acting on:
//! volatile sleep, elevated stress, frequent caffeine or alcohol, recurring
//! headaches. Each rule is keyed to one metric and one behavioural flag and
//! fires only when both are enabled, the metric has enough recent points,
//! and the rule's statistical condition holds. Rules evaluate in a fixed
//! order and suggestions deduplicate by tracked-metric set, so the same
//! history always proposes the same trials.
//!
//! The scan window is independent of whatever window the UI is displaying.

mod dismissal;

pub use dismissal::DismissalLedger;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Thresholds;
use crate::entry::{logged_days, DailyEntry, FlagKey};
use crate::metric::{resolve, MetricKey, SymptomKey, TrackingProfile};
use crate::stats;
use crate::window::DateRange;

/// Default micro-experiment length in days
pub const DEFAULT_TRIAL_DAYS: u32 = 3;

/// Sample stddev of sleep quality at which sleep counts as volatile
const SLEEP_VOLATILITY_STDDEV: f32 = 2.0;
/// Mean stress level treated as elevated
const STRESS_ELEVATED_MEAN: f32 = 6.5;
/// Days with caffeine logged before the timing rule fires
const CAFFEINE_MIN_DAYS: usize = 3;
/// Mean headache intensity treated as recurring
const HEADACHE_ELEVATED_MEAN: f32 = 3.5;
/// Days with alcohol logged before the break rule fires
const ALCOHOL_MIN_DAYS: usize = 2;

/// A proposed micro-experiment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Stable rule identifier, also the dismissal key
    pub id: String,
    /// Short imperative headline
    pub title: String,
    /// Behavioural flag the trial changes
    pub target_flag: FlagKey,
    /// Metrics to track during the trial, at most two
    pub metrics: Vec<MetricKey>,
    /// Proposed trial length in days
    pub duration_days: u32,
    /// One or two plain-language reasons this fired
    pub rationale: Vec<String>,
}

/// The fixed rule set, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleId {
    SleepConsistency,
    StressBuffer,
    CaffeineTiming,
    HydrationSupport,
    AlcoholFreeWindow,
}

impl RuleId {
    const ALL: [Self; 5] = [
        Self::SleepConsistency,
        Self::StressBuffer,
        Self::CaffeineTiming,
        Self::HydrationSupport,
        Self::AlcoholFreeWindow,
    ];

    const fn id(self) -> &'static str {
        match self {
            Self::SleepConsistency => "sleep-consistency",
            Self::StressBuffer => "stress-buffer",
            Self::CaffeineTiming => "caffeine-timing",
            Self::HydrationSupport => "hydration-support",
            Self::AlcoholFreeWindow => "alcohol-free-window",
        }
    }

    const fn title(self) -> &'static str {
        match self {
            Self::SleepConsistency => "Steady your sleep schedule",
            Self::StressBuffer => "Build in a daily stress buffer",
            Self::CaffeineTiming => "Test your caffeine cut-off",
            Self::HydrationSupport => "Lean on hydration for a few days",
            Self::AlcoholFreeWindow => "Try an alcohol-free window",
        }
    }

    const fn target_flag(self) -> FlagKey {
        match self {
            Self::SleepConsistency => FlagKey::LateNight,
            Self::StressBuffer => FlagKey::Meditation,
            Self::CaffeineTiming => FlagKey::Caffeine,
            Self::HydrationSupport => FlagKey::Hydration,
            Self::AlcoholFreeWindow => FlagKey::Alcohol,
        }
    }

    /// The metric whose recent shape the rule inspects
    fn keyed_metric(self) -> MetricKey {
        match self {
            Self::SleepConsistency | Self::CaffeineTiming => {
                MetricKey::Builtin(SymptomKey::SleepQuality)
            }
            Self::StressBuffer => MetricKey::Builtin(SymptomKey::Stress),
            Self::HydrationSupport => MetricKey::Builtin(SymptomKey::Headache),
            Self::AlcoholFreeWindow => MetricKey::Mood,
        }
    }

    /// Metrics to track during the proposed trial, at most two
    fn tracked(self) -> Vec<MetricKey> {
        match self {
            Self::SleepConsistency => vec![
                MetricKey::Builtin(SymptomKey::SleepQuality),
                MetricKey::Builtin(SymptomKey::Energy),
            ],
            Self::StressBuffer => vec![
                MetricKey::Builtin(SymptomKey::Stress),
                MetricKey::Builtin(SymptomKey::SleepQuality),
            ],
            Self::CaffeineTiming => vec![MetricKey::Builtin(SymptomKey::SleepQuality)],
            Self::HydrationSupport => vec![
                MetricKey::Builtin(SymptomKey::Headache),
                MetricKey::Builtin(SymptomKey::Energy),
            ],
            Self::AlcoholFreeWindow => {
                vec![MetricKey::Mood, MetricKey::Builtin(SymptomKey::SleepQuality)]
            }
        }
    }

    fn rationale(self) -> Vec<String> {
        let lines: &[&str] = match self {
            Self::SleepConsistency => &[
                "Your sleep quality has been swinging widely from day to day.",
                "A consistent bedtime for a few days can show whether late nights drive the swings.",
            ],
            Self::StressBuffer => &[
                "Your average stress has been running high lately.",
                "A short daily wind-down is the simplest lever to test against it.",
            ],
            Self::CaffeineTiming => &[
                "Caffeine showed up on several recent days.",
                "Moving your last cup earlier is a quick way to see whether it touches your sleep.",
            ],
            Self::HydrationSupport => &[
                "Headaches have been registering more than usual.",
                "Hitting your water goal daily is an easy first experiment against them.",
            ],
            Self::AlcoholFreeWindow => &[
                "Alcohol appeared on a couple of recent days.",
                "A short break can show whether it moves your mood.",
            ],
        };
        lines.iter().map(ToString::to_string).collect()
    }

    /// Rule-specific statistical condition over the scan window
    fn condition_holds(
        self,
        entries: &[DailyEntry],
        window: &DateRange,
        keyed_values: &[f32],
    ) -> bool {
        match self {
            Self::SleepConsistency => stats::sample_stddev(keyed_values)
                .is_some_and(|sd| sd >= SLEEP_VOLATILITY_STDDEV),
            Self::StressBuffer => {
                stats::mean(keyed_values).is_some_and(|m| m >= STRESS_ELEVATED_MEAN)
            }
            Self::CaffeineTiming => {
                flag_days(entries, window, FlagKey::Caffeine) >= CAFFEINE_MIN_DAYS
            }
            Self::HydrationSupport => {
                stats::mean(keyed_values).is_some_and(|m| m >= HEADACHE_ELEVATED_MEAN)
            }
            Self::AlcoholFreeWindow => {
                flag_days(entries, window, FlagKey::Alcohol) >= ALCOHOL_MIN_DAYS
            }
        }
    }

    /// Evaluate the rule; `None` means it stayed quiet
    fn evaluate(
        self,
        entries: &[DailyEntry],
        window: &DateRange,
        profile: &TrackingProfile,
        thresholds: &Thresholds,
    ) -> Option<Suggestion> {
        let metric = self.keyed_metric();
        if !profile.is_metric_enabled(&metric) || !profile.is_flag_enabled(self.target_flag()) {
            debug!("Rule {} skipped: metric or flag not enabled", self.id());
            return None;
        }

        let values: Vec<f32> = entries
            .iter()
            .filter(|e| window.contains(e.date()))
            .filter_map(|e| resolve(e, &metric))
            .collect();
        if values.len() < thresholds.suggest_min_points {
            debug!(
                "Rule {} skipped: {} points below minimum {}",
                self.id(),
                values.len(),
                thresholds.suggest_min_points
            );
            return None;
        }

        if !self.condition_holds(entries, window, &values) {
            debug!("Rule {} quiet: condition not met", self.id());
            return None;
        }

        Some(Suggestion {
            id: self.id().to_string(),
            title: self.title().to_string(),
            target_flag: self.target_flag(),
            metrics: self.tracked(),
            duration_days: DEFAULT_TRIAL_DAYS,
            rationale: self.rationale(),
        })
    }
}

/// Days inside the window with the flag set
fn flag_days(entries: &[DailyEntry], window: &DateRange, flag: FlagKey) -> usize {
    entries
        .iter()
        .filter(|e| window.contains(e.date()) && e.has_flag(flag))
        .count()
}

/// Scan recent history for micro-experiment suggestions
///
/// Looks at the `suggest_window_days` ending at `today`, requires
/// `suggest_min_logged_days` before any rule may fire, deduplicates fired
/// rules by tracked-metric set, and drops anything still inside its
/// dismissal cool-down.
#[must_use]
pub fn scan(
    entries: &[DailyEntry],
    today: NaiveDate,
    profile: &TrackingProfile,
    ledger: &DismissalLedger,
    thresholds: &Thresholds,
) -> Vec<Suggestion> {
    let Ok(window) = DateRange::last_n_days(today, thresholds.suggest_window_days) else {
        return Vec::new();
    };

    let logged = logged_days(entries, &window);
    if logged < thresholds.suggest_min_logged_days {
        debug!(
            "Suggestion scan quiet: {logged} logged days below minimum {}",
            thresholds.suggest_min_logged_days
        );
        return Vec::new();
    }

    let mut seen_metric_sets: Vec<Vec<MetricKey>> = Vec::new();
    let mut suggestions = Vec::new();
    for rule in RuleId::ALL {
        let Some(suggestion) = rule.evaluate(entries, &window, profile, thresholds) else {
            continue;
        };
        if ledger.is_suppressed(&suggestion.id, today, thresholds.dismissal_ttl_days) {
            debug!("Rule {} suppressed by dismissal cool-down", suggestion.id);
            continue;
        }
        let mut metric_set = suggestion.metrics.clone();
        metric_set.sort();
        if seen_metric_sets.contains(&metric_set) {
            debug!("Rule {} deduplicated by tracked-metric set", suggestion.id);
            continue;
        }
        seen_metric_sets.push(metric_set);
        suggestions.push(suggestion);
    }
    suggestions
}
