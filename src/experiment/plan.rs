//! Experiment Plan - a user-declared behaviour trial
//!
//! A plan names the change under test, the days it covers, and the metrics
//! to watch. It mutates daily only by virtue of new entries accumulating in
//! its window; the record itself changes exactly once, when the user rates
//! it and the outcome freezes in.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::compare::ComparisonDigest;
use crate::entry::FlagKey;
use crate::error::{Error, Result};
use crate::metric::MetricKey;
use crate::window::ExperimentWindows;

/// Metric cap for user-authored plans
const MAX_CUSTOM_PLAN_METRICS: usize = 5;
/// Metric cap for plans accepted from a suggestion
const MAX_SUGGESTED_PLAN_METRICS: usize = 6;

/// How a plan came to exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanOrigin {
    /// Authored directly by the user
    Custom,
    /// Accepted from a suggestion
    Suggested,
}

impl PlanOrigin {
    /// Most metrics a plan of this origin may track
    #[must_use]
    pub const fn max_metrics(self) -> usize {
        match self {
            Self::Custom => MAX_CUSTOM_PLAN_METRICS,
            Self::Suggested => MAX_SUGGESTED_PLAN_METRICS,
        }
    }
}

/// The user's verdict on a finished plan
///
/// Carries the frozen comparison digest: once rated, the stated conclusion
/// never changes, no matter what happens to the underlying entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanOutcome {
    rating: u8,
    note: Option<String>,
    completed_at: DateTime<Utc>,
    digest: ComparisonDigest,
}

impl PlanOutcome {
    /// Create an outcome with the current timestamp.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPlan` if the rating falls outside 1-5.
    pub fn new(rating: u8, note: Option<String>, digest: ComparisonDigest) -> Result<Self> {
        if !(1..=5).contains(&rating) {
            return Err(Error::InvalidPlan(format!(
                "rating must be between 1 and 5, got {rating}"
            )));
        }
        Ok(Self {
            rating,
            note,
            completed_at: Utc::now(),
            digest,
        })
    }

    /// Set a custom completion timestamp (useful for deserialization/testing).
    #[must_use]
    pub const fn with_completed_at(mut self, completed_at: DateTime<Utc>) -> Self {
        self.completed_at = completed_at;
        self
    }

    /// Get the 1-5 rating.
    #[must_use]
    pub const fn rating(&self) -> u8 {
        self.rating
    }

    /// Get the free-text note, if any.
    #[must_use]
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Get the completion timestamp.
    #[must_use]
    pub const fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    /// Get the frozen comparison digest.
    #[must_use]
    pub const fn digest(&self) -> &ComparisonDigest {
        &self.digest
    }
}

/// A declared behaviour trial over a fixed window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentPlan {
    id: String,
    title: String,
    start: NaiveDate,
    duration_days: u32,
    metrics: Vec<MetricKey>,
    change_flag: Option<FlagKey>,
    steps: Vec<String>,
    notes: Option<String>,
    origin: PlanOrigin,
    created_at: DateTime<Utc>,
    outcome: Option<PlanOutcome>,
}

impl ExperimentPlan {
    /// Create a builder for a user-authored plan.
    #[must_use]
    pub fn builder(
        id: impl Into<String>,
        title: impl Into<String>,
        start: NaiveDate,
        duration_days: u32,
    ) -> ExperimentPlanBuilder {
        ExperimentPlanBuilder::new(id, title, start, duration_days)
    }

    /// Create a plan by accepting a suggestion.
    ///
    /// The suggestion's tracked metrics, target flag, and proposed duration
    /// carry over; the rationale stays with the suggestion card.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPlan` or `Error::DateOutOfRange` under the
    /// same validation as [`ExperimentPlanBuilder::build`].
    pub fn from_suggestion(
        id: impl Into<String>,
        suggestion: &crate::suggest::Suggestion,
        start: NaiveDate,
    ) -> Result<Self> {
        let mut builder = ExperimentPlanBuilder::new(
            id,
            suggestion.title.clone(),
            start,
            suggestion.duration_days,
        )
        .origin(PlanOrigin::Suggested)
        .change_flag(suggestion.target_flag);
        for metric in &suggestion.metrics {
            builder = builder.metric(metric.clone());
        }
        builder.build()
    }

    /// Get the plan identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the plan title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Get the first day of the trial.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Get the trial length in days.
    #[must_use]
    pub const fn duration_days(&self) -> u32 {
        self.duration_days
    }

    /// Get the metrics under observation.
    #[must_use]
    pub fn metrics(&self) -> &[MetricKey] {
        &self.metrics
    }

    /// Get the behavioural flag under test, if one was named.
    #[must_use]
    pub const fn change_flag(&self) -> Option<FlagKey> {
        self.change_flag
    }

    /// Get the free-text steps.
    #[must_use]
    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    /// Get the free-text notes, if any.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Get how the plan came to exist.
    #[must_use]
    pub const fn origin(&self) -> PlanOrigin {
        self.origin
    }

    /// Get the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Get the outcome, once the plan has been rated.
    #[must_use]
    pub const fn outcome(&self) -> Option<&PlanOutcome> {
        self.outcome.as_ref()
    }

    /// Whether the plan carries an outcome.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.outcome.is_some()
    }

    /// Baseline and during windows derived from the plan's own dates.
    ///
    /// # Errors
    ///
    /// Returns `Error::DateOutOfRange` if either window leaves the
    /// representable calendar. Zero durations are rejected at build time.
    pub fn windows(&self) -> Result<ExperimentWindows> {
        ExperimentWindows::for_plan(self.start, self.duration_days)
    }

    /// Freeze an outcome into the plan.
    ///
    /// # Errors
    ///
    /// Returns `Error::PlanAlreadyCompleted` if the plan was rated before;
    /// outcomes are written exactly once.
    pub fn complete(&mut self, outcome: PlanOutcome) -> Result<()> {
        if self.outcome.is_some() {
            return Err(Error::PlanAlreadyCompleted(self.id.clone()));
        }
        self.outcome = Some(outcome);
        Ok(())
    }
}

/// Builder for `ExperimentPlan`.
#[derive(Debug)]
pub struct ExperimentPlanBuilder {
    id: String,
    title: String,
    start: NaiveDate,
    duration_days: u32,
    metrics: Vec<MetricKey>,
    change_flag: Option<FlagKey>,
    steps: Vec<String>,
    notes: Option<String>,
    origin: PlanOrigin,
    created_at: DateTime<Utc>,
}

impl ExperimentPlanBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        start: NaiveDate,
        duration_days: u32,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            start,
            duration_days,
            metrics: Vec::new(),
            change_flag: None,
            steps: Vec::new(),
            notes: None,
            origin: PlanOrigin::Custom,
            created_at: Utc::now(),
        }
    }

    /// Add a metric to observe.
    #[must_use]
    pub fn metric(mut self, metric: MetricKey) -> Self {
        self.metrics.push(metric);
        self
    }

    /// Name the behavioural flag under test.
    #[must_use]
    pub const fn change_flag(mut self, flag: FlagKey) -> Self {
        self.change_flag = Some(flag);
        self
    }

    /// Add a free-text step.
    #[must_use]
    pub fn step(mut self, step: impl Into<String>) -> Self {
        self.steps.push(step.into());
        self
    }

    /// Set free-text notes.
    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Set the plan origin.
    #[must_use]
    pub const fn origin(mut self, origin: PlanOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// Set a custom creation timestamp (useful for deserialization/testing).
    #[must_use]
    pub const fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Validate and build the `ExperimentPlan`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPlan` for a zero duration, an empty metric
    /// list, or more metrics than the origin's cap allows, and
    /// `Error::DateOutOfRange` if the windows cannot be constructed.
    pub fn build(self) -> Result<ExperimentPlan> {
        if self.metrics.is_empty() {
            return Err(Error::InvalidPlan(
                "a plan must observe at least one metric".to_string(),
            ));
        }
        let cap = self.origin.max_metrics();
        if self.metrics.len() > cap {
            return Err(Error::InvalidPlan(format!(
                "a plan may observe at most {cap} metrics, got {}",
                self.metrics.len()
            )));
        }
        // Rejects zero durations and calendar overflow up front
        ExperimentWindows::for_plan(self.start, self.duration_days)?;

        Ok(ExperimentPlan {
            id: self.id,
            title: self.title,
            start: self.start,
            duration_days: self.duration_days,
            metrics: self.metrics,
            change_flag: self.change_flag,
            steps: self.steps,
            notes: self.notes,
            origin: self.origin,
            created_at: self.created_at,
            outcome: None,
        })
    }
}
