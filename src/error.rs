//! Error types for pauta
//!
//! Toyota Way: Clear error messages with actionable guidance (Respect for People)
//!
//! Analytical paths never fail: empty series, zero variance, or an undefined
//! coefficient resolve to `None` or an empty result, not an error. The
//! variants here cover the configuration and plan-lifecycle edges, where the
//! caller made a decision the engine must not silently override.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// pauta error types
#[derive(Error, Debug)]
pub enum Error {
    /// A threshold field fails its range check
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A plan fails validation (duration, metric list)
    #[error("Invalid plan: {0}")]
    InvalidPlan(String),

    /// An unrated plan already occupies the active slot (Poka-Yoke: replacing
    /// it is a caller decision, never an implicit side effect)
    #[error("An active plan already exists: {current_id}\nComplete it or replace it explicitly before starting a new one")]
    ActivePlanExists {
        /// Identifier of the plan currently occupying the slot
        current_id: String,
    },

    /// Lookup of a plan id that is neither active nor archived
    #[error("Plan not found: {0}")]
    PlanNotFound(String),

    /// Attempt to rate a plan that already carries an outcome
    #[error("Plan already completed: {0}\nOutcomes are frozen at rating time and cannot be rewritten")]
    PlanAlreadyCompleted(String),

    /// Calendar arithmetic left the representable date range
    #[error("Date out of range: {0}")]
    DateOutOfRange(String),

    /// Metric key wire form failed to parse
    #[error("Unrecognized metric key: {0}")]
    ParseKey(String),

    /// Serialization error (frozen digests, report payloads)
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
