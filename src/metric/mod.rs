//! Metric identity, kinds, and the user's tracking catalogue
//!
//! Every trackable signal is addressed by a [`MetricKey`]: an explicit
//! tagged variant, never a sniffed string prefix. The wire form rendered by
//! `Display` and parsed by `FromStr` is the only serialized representation,
//! so stored keys stay valid across releases.
//!
//! Kinds drive the correlation gate and scorer: a metric has exactly one
//! [`MetricKind`] at evaluation time. Built-ins carry theirs in a fixed
//! table; custom metrics carry theirs in the user's [`MetricCatalog`],
//! defaulting to `Other` when unregistered.

mod resolve;

pub use resolve::{resolve, MOOD_GOOD_VALUE, MOOD_LOW_VALUE, MOOD_OKAY_VALUE};

use std::fmt;
use std::str::FromStr;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::entry::FlagKey;
use crate::error::Error;

/// Category a metric belongs to at evaluation time
///
/// Kind pairings decide gate admission and score adjustments: behaviour vs
/// state pairs are boosted (actionable), body-signal pairs are suppressed
/// (medically sensitive, correlation is not diagnosis).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Physiological symptom (headache, bloating)
    Physio,
    /// Hormonal-cycle-linked symptom (cramps, hot flashes)
    Hormonal,
    /// Deliberate behaviour (exercise, meditation)
    Behaviour,
    /// Mental/cognitive state (mood, stress, focus)
    State,
    /// Anything else, including unregistered customs
    Other,
}

impl MetricKind {
    /// Whether this kind is a body signal (physiological or hormonal)
    #[must_use]
    pub const fn is_body(self) -> bool {
        matches!(self, Self::Physio | Self::Hormonal)
    }
}

/// Built-in symptom catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymptomKey {
    /// Sleep quality (higher is better)
    SleepQuality,
    /// Energy level
    Energy,
    /// Stress level
    Stress,
    /// Anxiety level
    Anxiety,
    /// Difficulty concentrating
    BrainFog,
    /// Headache intensity
    Headache,
    /// Bloating intensity
    Bloating,
    /// Joint pain intensity
    JointPain,
    /// Hot flash intensity
    HotFlashes,
    /// Night sweat intensity
    NightSweats,
    /// Cramp intensity
    Cramps,
}

impl SymptomKey {
    /// All built-in symptoms in stable catalogue order
    pub const ALL: [Self; 11] = [
        Self::SleepQuality,
        Self::Energy,
        Self::Stress,
        Self::Anxiety,
        Self::BrainFog,
        Self::Headache,
        Self::Bloating,
        Self::JointPain,
        Self::HotFlashes,
        Self::NightSweats,
        Self::Cramps,
    ];

    /// Stable wire identifier
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SleepQuality => "sleep_quality",
            Self::Energy => "energy",
            Self::Stress => "stress",
            Self::Anxiety => "anxiety",
            Self::BrainFog => "brain_fog",
            Self::Headache => "headache",
            Self::Bloating => "bloating",
            Self::JointPain => "joint_pain",
            Self::HotFlashes => "hot_flashes",
            Self::NightSweats => "night_sweats",
            Self::Cramps => "cramps",
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SleepQuality => "Sleep quality",
            Self::Energy => "Energy",
            Self::Stress => "Stress",
            Self::Anxiety => "Anxiety",
            Self::BrainFog => "Brain fog",
            Self::Headache => "Headache",
            Self::Bloating => "Bloating",
            Self::JointPain => "Joint pain",
            Self::HotFlashes => "Hot flashes",
            Self::NightSweats => "Night sweats",
            Self::Cramps => "Cramps",
        }
    }

    /// Fixed kind assignment for the built-in catalogue
    #[must_use]
    pub const fn kind(self) -> MetricKind {
        match self {
            Self::SleepQuality | Self::Energy | Self::Stress | Self::Anxiety | Self::BrainFog => {
                MetricKind::State
            }
            Self::Headache | Self::Bloating | Self::JointPain => MetricKind::Physio,
            Self::HotFlashes | Self::NightSweats | Self::Cramps => MetricKind::Hormonal,
        }
    }
}

impl fmt::Display for SymptomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SymptomKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| Error::ParseKey(s.to_string()))
    }
}

/// Address of a trackable metric
///
/// Wire form: `mood`, the symptom's snake_case id, or `custom:<id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetricKey {
    /// The tri-level mood rating
    Mood,
    /// A built-in symptom
    Builtin(SymptomKey),
    /// A user-defined metric, addressed by its catalogue id
    Custom(String),
}

impl MetricKey {
    /// Human-readable label, consulting the catalogue for customs
    #[must_use]
    pub fn label(&self, catalog: &MetricCatalog) -> String {
        match self {
            Self::Mood => "Mood".to_string(),
            Self::Builtin(key) => key.label().to_string(),
            Self::Custom(id) => catalog
                .custom_def(id)
                .map_or_else(|| id.clone(), |def| def.label().to_string()),
        }
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mood => f.write_str("mood"),
            Self::Builtin(key) => f.write_str(key.as_str()),
            Self::Custom(id) => write!(f, "custom:{id}"),
        }
    }
}

impl FromStr for MetricKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "mood" {
            return Ok(Self::Mood);
        }
        if let Some(id) = s.strip_prefix("custom:") {
            if id.is_empty() {
                return Err(Error::ParseKey(s.to_string()));
            }
            return Ok(Self::Custom(id.to_string()));
        }
        SymptomKey::from_str(s).map(Self::Builtin)
    }
}

impl Serialize for MetricKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for MetricKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Definition of a user-created custom metric
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomMetricDef {
    id: String,
    label: String,
    kind: MetricKind,
}

impl CustomMetricDef {
    /// Create a custom metric definition.
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: MetricKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
        }
    }

    /// Get the catalogue id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the display label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Get the assigned kind.
    #[must_use]
    pub const fn kind(&self) -> MetricKind {
        self.kind
    }
}

/// The user's metric catalogue: custom definitions keyed by id
///
/// Built-ins need no registration; the catalogue only answers questions the
/// static tables cannot, the kind and label of custom metrics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricCatalog {
    custom: FxHashMap<String, CustomMetricDef>,
}

impl MetricCatalog {
    /// Create an empty catalogue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a custom metric definition, replacing any previous one
    /// under the same id.
    pub fn register(&mut self, def: CustomMetricDef) {
        self.custom.insert(def.id().to_string(), def);
    }

    /// Look up a custom definition by id.
    #[must_use]
    pub fn custom_def(&self, id: &str) -> Option<&CustomMetricDef> {
        self.custom.get(id)
    }

    /// Kind of any metric at evaluation time
    ///
    /// Unregistered customs are `Other`: they still resolve and correlate,
    /// they just earn no kind-pairing adjustments.
    #[must_use]
    pub fn kind_of(&self, key: &MetricKey) -> MetricKind {
        match key {
            MetricKey::Mood => MetricKind::State,
            MetricKey::Builtin(sym) => sym.kind(),
            MetricKey::Custom(id) => self
                .custom_def(id)
                .map_or(MetricKind::Other, CustomMetricDef::kind),
        }
    }
}

/// Which metrics and flags the user has enabled for tracking
///
/// Metric order is the caller's selection order and is preserved: the pair
/// scan and findings iterate it as given, which keeps output deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackingProfile {
    metrics: Vec<MetricKey>,
    flags: FxHashSet<FlagKey>,
}

impl TrackingProfile {
    /// Create an empty profile.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable a metric, keeping selection order and ignoring duplicates.
    pub fn enable_metric(&mut self, key: MetricKey) {
        if !self.metrics.contains(&key) {
            self.metrics.push(key);
        }
    }

    /// Enable a behavioural flag.
    pub fn enable_flag(&mut self, flag: FlagKey) {
        self.flags.insert(flag);
    }

    /// Enabled metrics in selection order.
    #[must_use]
    pub fn metrics(&self) -> &[MetricKey] {
        &self.metrics
    }

    /// Whether a metric is enabled.
    #[must_use]
    pub fn is_metric_enabled(&self, key: &MetricKey) -> bool {
        self.metrics.contains(key)
    }

    /// Whether a flag is enabled.
    #[must_use]
    pub fn is_flag_enabled(&self, flag: FlagKey) -> bool {
        self.flags.contains(&flag)
    }
}
