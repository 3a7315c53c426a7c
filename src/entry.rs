//! Daily Entry - one self-report record per calendar day
//!
//! Entries are append/update-only and owned by the caller's entry store;
//! the engine only ever reads date-sorted slices of them. Days are
//! `chrono::NaiveDate` keys, so window arithmetic is pure calendar math
//! with no timezone involved.

use chrono::NaiveDate;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::metric::SymptomKey;
use crate::window::DateRange;

/// Tri-level mood rating
///
/// Coarse on purpose: a three-way rating survives noisy self-report far
/// better than a ten-point scale the user calibrates differently each week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    /// Below baseline
    Low,
    /// At baseline
    Okay,
    /// Above baseline
    Good,
}

/// Boolean behavioural/event flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagKey {
    /// Exercised that day
    Exercise,
    /// Consumed alcohol
    Alcohol,
    /// Consumed caffeine
    Caffeine,
    /// Went to bed late
    LateNight,
    /// Meditated
    Meditation,
    /// Met hydration goal
    Hydration,
}

impl FlagKey {
    /// Stable wire identifier
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exercise => "exercise",
            Self::Alcohol => "alcohol",
            Self::Caffeine => "caffeine",
            Self::LateNight => "late_night",
            Self::Meditation => "meditation",
            Self::Hydration => "hydration",
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Exercise => "Exercise",
            Self::Alcohol => "Alcohol",
            Self::Caffeine => "Caffeine",
            Self::LateNight => "Late night",
            Self::Meditation => "Meditation",
            Self::Hydration => "Hydration",
        }
    }
}

impl std::fmt::Display for FlagKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One self-report record for one calendar day
///
/// Symptom intensities are stored on the 0-10 scale; magnitudes above 10
/// are legacy 0-100 values and are rescaled at resolution time, never
/// rewritten in storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyEntry {
    date: NaiveDate,
    mood: Option<Mood>,
    symptoms: FxHashMap<SymptomKey, f32>,
    custom: FxHashMap<String, f32>,
    flags: FxHashSet<FlagKey>,
    cycle_start: bool,
}

impl DailyEntry {
    /// Create an empty entry for a day.
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            mood: None,
            symptoms: FxHashMap::default(),
            custom: FxHashMap::default(),
            flags: FxHashSet::default(),
            cycle_start: false,
        }
    }

    /// Create a builder for constructing an entry with optional fields.
    #[must_use]
    pub fn builder(date: NaiveDate) -> DailyEntryBuilder {
        DailyEntryBuilder::new(date)
    }

    /// Get the calendar day this entry belongs to.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Get the mood rating, if one was logged.
    #[must_use]
    pub const fn mood(&self) -> Option<Mood> {
        self.mood
    }

    /// Get a stored symptom intensity as recorded (no legacy rescaling).
    #[must_use]
    pub fn symptom(&self, key: SymptomKey) -> Option<f32> {
        self.symptoms.get(&key).copied()
    }

    /// Get a stored custom metric magnitude as recorded.
    #[must_use]
    pub fn custom(&self, id: &str) -> Option<f32> {
        self.custom.get(id).copied()
    }

    /// Whether a behavioural flag was set for the day.
    #[must_use]
    pub fn has_flag(&self, flag: FlagKey) -> bool {
        self.flags.contains(&flag)
    }

    /// Whether the user marked this day as a cycle start.
    #[must_use]
    pub const fn cycle_start(&self) -> bool {
        self.cycle_start
    }

    /// All stored symptom intensities.
    #[must_use]
    pub const fn symptoms(&self) -> &FxHashMap<SymptomKey, f32> {
        &self.symptoms
    }

    /// All stored custom magnitudes.
    #[must_use]
    pub const fn custom_values(&self) -> &FxHashMap<String, f32> {
        &self.custom
    }

    /// All flags set for the day.
    #[must_use]
    pub const fn flags(&self) -> &FxHashSet<FlagKey> {
        &self.flags
    }

    /// Whether the entry carries no observations at all
    ///
    /// An empty entry does not count as a logged day for window minimums.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mood.is_none()
            && self.symptoms.is_empty()
            && self.custom.is_empty()
            && self.flags.is_empty()
            && !self.cycle_start
    }
}

/// Days inside a window carrying any observation
///
/// Empty entries (a day the user opened but never filled in) do not count
/// toward the logged-day minimums that gate correlations and suggestions.
#[must_use]
pub fn logged_days(entries: &[DailyEntry], window: &DateRange) -> usize {
    entries
        .iter()
        .filter(|e| window.contains(e.date()) && !e.is_empty())
        .count()
}

/// Calendar span of a date-sorted history in days, first entry to last
#[must_use]
pub fn history_span_days(entries: &[DailyEntry]) -> u32 {
    match (entries.first(), entries.last()) {
        (Some(first), Some(last)) => {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                (last.date() - first.date()).num_days().max(0) as u32
            }
        }
        _ => 0,
    }
}

/// Builder for `DailyEntry`.
#[derive(Debug)]
pub struct DailyEntryBuilder {
    entry: DailyEntry,
}

impl DailyEntryBuilder {
    /// Create a new builder for a day.
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self {
            entry: DailyEntry::new(date),
        }
    }

    /// Set the mood rating.
    #[must_use]
    pub const fn mood(mut self, mood: Mood) -> Self {
        self.entry.mood = Some(mood);
        self
    }

    /// Record a symptom intensity.
    #[must_use]
    pub fn symptom(mut self, key: SymptomKey, value: f32) -> Self {
        self.entry.symptoms.insert(key, value);
        self
    }

    /// Record a custom metric magnitude.
    #[must_use]
    pub fn custom(mut self, id: impl Into<String>, value: f32) -> Self {
        self.entry.custom.insert(id.into(), value);
        self
    }

    /// Set a behavioural flag.
    #[must_use]
    pub fn flag(mut self, flag: FlagKey) -> Self {
        self.entry.flags.insert(flag);
        self
    }

    /// Mark the day as a cycle start.
    #[must_use]
    pub const fn cycle_start(mut self, marker: bool) -> Self {
        self.entry.cycle_start = marker;
        self
    }

    /// Build the `DailyEntry`.
    #[must_use]
    pub fn build(self) -> DailyEntry {
        self.entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_entry_builder() {
        let entry = DailyEntry::builder(day(2024, 3, 1))
            .mood(Mood::Good)
            .symptom(SymptomKey::Stress, 4.0)
            .custom("pain_level", 3.0)
            .flag(FlagKey::Exercise)
            .build();

        assert_eq!(entry.date(), day(2024, 3, 1));
        assert_eq!(entry.mood(), Some(Mood::Good));
        assert_eq!(entry.symptom(SymptomKey::Stress), Some(4.0));
        assert_eq!(entry.custom("pain_level"), Some(3.0));
        assert!(entry.has_flag(FlagKey::Exercise));
        assert!(!entry.has_flag(FlagKey::Alcohol));
        assert!(!entry.cycle_start());
    }

    #[test]
    fn test_empty_entry_is_not_a_logged_day() {
        let entry = DailyEntry::new(day(2024, 3, 2));
        assert!(entry.is_empty());

        let with_flag = DailyEntry::builder(day(2024, 3, 2))
            .flag(FlagKey::Caffeine)
            .build();
        assert!(!with_flag.is_empty());
    }

    #[test]
    fn test_cycle_start_marker_counts_as_data() {
        let entry = DailyEntry::builder(day(2024, 3, 3)).cycle_start(true).build();
        assert!(!entry.is_empty());
        assert!(entry.cycle_start());
    }

    #[test]
    fn test_flag_wire_ids_are_stable() {
        assert_eq!(FlagKey::LateNight.as_str(), "late_night");
        assert_eq!(FlagKey::Exercise.to_string(), "exercise");
    }

    #[test]
    fn test_entry_serde_round_trip() {
        let entry = DailyEntry::builder(day(2024, 3, 4))
            .mood(Mood::Low)
            .symptom(SymptomKey::Headache, 6.0)
            .flag(FlagKey::LateNight)
            .build();

        let json = serde_json::to_string(&entry).unwrap();
        let back: DailyEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, back);
    }

    #[test]
    fn test_logged_days_skips_empty_entries() {
        let entries = vec![
            DailyEntry::builder(day(2024, 3, 1)).mood(Mood::Okay).build(),
            DailyEntry::new(day(2024, 3, 2)),
            DailyEntry::builder(day(2024, 3, 3))
                .symptom(SymptomKey::Energy, 4.0)
                .build(),
            DailyEntry::builder(day(2024, 3, 9)).mood(Mood::Good).build(),
        ];
        let window = DateRange::new(day(2024, 3, 1), day(2024, 3, 5)).unwrap();
        assert_eq!(logged_days(&entries, &window), 2);
    }

    #[test]
    fn test_history_span_days() {
        let entries = vec![
            DailyEntry::builder(day(2024, 3, 1)).mood(Mood::Okay).build(),
            DailyEntry::builder(day(2024, 3, 15)).mood(Mood::Low).build(),
        ];
        assert_eq!(history_span_days(&entries), 14);
        assert_eq!(history_span_days(&[]), 0);
        assert_eq!(history_span_days(&entries[..1]), 0);
    }
}
