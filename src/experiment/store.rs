//! Plan Store - guarded lifecycle storage for experiment plans
//!
//! One plan may be active (unrated) at a time. That invariant lives here,
//! at the single `begin` write path, not in the UI: starting a plan while
//! another is active fails with `ActivePlanExists`, and displacing the
//! current plan is the separate, explicit [`PlanStore::replace`] call
//! (Poka-Yoke: the destructive path cannot be taken by accident).
//!
//! Completion moves the plan, outcome and frozen digest attached, into the
//! archive and clears the slot.

use std::sync::{PoisonError, RwLock};

use dashmap::DashMap;
use tracing::debug;

use super::plan::{ExperimentPlan, PlanOutcome};
use crate::error::{Error, Result};

/// Storage seam for plan lifecycle state
///
/// Implementations own the only mutable state in the crate: the active
/// slot and the completed archive. All methods take `&self` so a store can
/// sit behind a shared reference.
pub trait PlanStore {
    /// Activate a plan. Fails while an unrated plan occupies the slot.
    ///
    /// # Errors
    ///
    /// Returns `Error::ActivePlanExists` naming the current occupant, or
    /// `Error::InvalidPlan` if the plan already carries an outcome.
    fn begin(&self, plan: ExperimentPlan) -> Result<()>;

    /// Activate a plan, displacing the current one if present.
    ///
    /// The displaced plan is returned to the caller unrated and never
    /// archived; abandoning it was the caller's explicit decision.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPlan` if the plan already carries an outcome.
    fn replace(&self, plan: ExperimentPlan) -> Result<Option<ExperimentPlan>>;

    /// Get the active plan, if one exists.
    fn active(&self) -> Option<ExperimentPlan>;

    /// Rate the active plan, freezing the outcome in and archiving it.
    ///
    /// # Errors
    ///
    /// Returns `Error::PlanNotFound` for an id that is neither active nor
    /// archived, and `Error::PlanAlreadyCompleted` for one already rated.
    fn complete(&self, plan_id: &str, outcome: PlanOutcome) -> Result<ExperimentPlan>;

    /// Get a completed plan from the archive.
    fn completed(&self, plan_id: &str) -> Option<ExperimentPlan>;

    /// Number of completed plans in the archive.
    fn completed_count(&self) -> usize;
}

/// In-memory plan store
///
/// The active slot sits behind an `RwLock`; the archive is a concurrent
/// map keyed by plan id. A poisoned lock is recovered rather than
/// propagated, since every write path leaves the slot in a valid state.
#[derive(Debug, Default)]
pub struct MemoryPlanStore {
    slot: RwLock<Option<ExperimentPlan>>,
    archive: DashMap<String, ExperimentPlan>,
}

impl MemoryPlanStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PlanStore for MemoryPlanStore {
    fn begin(&self, plan: ExperimentPlan) -> Result<()> {
        if plan.is_completed() {
            return Err(Error::InvalidPlan(
                "a plan cannot begin with an outcome already attached".to_string(),
            ));
        }
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(current) = slot.as_ref() {
            return Err(Error::ActivePlanExists {
                current_id: current.id().to_string(),
            });
        }
        debug!("Plan {} active", plan.id());
        *slot = Some(plan);
        Ok(())
    }

    fn replace(&self, plan: ExperimentPlan) -> Result<Option<ExperimentPlan>> {
        if plan.is_completed() {
            return Err(Error::InvalidPlan(
                "a plan cannot begin with an outcome already attached".to_string(),
            ));
        }
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        let displaced = slot.replace(plan);
        if let Some(old) = displaced.as_ref() {
            debug!("Plan {} displaced unrated", old.id());
        }
        Ok(displaced)
    }

    fn active(&self) -> Option<ExperimentPlan> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn complete(&self, plan_id: &str, outcome: PlanOutcome) -> Result<ExperimentPlan> {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        match slot.take() {
            Some(mut plan) if plan.id() == plan_id => {
                if let Err(e) = plan.complete(outcome) {
                    *slot = Some(plan);
                    return Err(e);
                }
                debug!("Plan {plan_id} completed and archived");
                self.archive.insert(plan.id().to_string(), plan.clone());
                Ok(plan)
            }
            other => {
                let already_rated = self.archive.contains_key(plan_id);
                *slot = other;
                if already_rated {
                    Err(Error::PlanAlreadyCompleted(plan_id.to_string()))
                } else {
                    Err(Error::PlanNotFound(plan_id.to_string()))
                }
            }
        }
    }

    fn completed(&self, plan_id: &str) -> Option<ExperimentPlan> {
        self.archive.get(plan_id).map(|entry| entry.value().clone())
    }

    fn completed_count(&self) -> usize {
        self.archive.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiment::compare::ComparisonDigest;
    use crate::metric::MetricKey;
    use chrono::NaiveDate;

    fn sample_plan(id: &str) -> ExperimentPlan {
        ExperimentPlan::builder(id, "Earlier bedtime", NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(), 7)
            .metric(MetricKey::Mood)
            .build()
            .unwrap()
    }

    fn sample_outcome() -> PlanOutcome {
        PlanOutcome::new(4, None, ComparisonDigest::empty_for_tests()).unwrap()
    }

    #[test]
    fn test_store_starts_empty() {
        let store = MemoryPlanStore::new();
        assert!(store.active().is_none());
        assert_eq!(store.completed_count(), 0);
    }

    #[test]
    fn test_begin_and_active() {
        let store = MemoryPlanStore::new();
        store.begin(sample_plan("plan-1")).unwrap();
        assert_eq!(store.active().unwrap().id(), "plan-1");
    }

    #[test]
    fn test_begin_guards_active_slot() {
        let store = MemoryPlanStore::new();
        store.begin(sample_plan("plan-1")).unwrap();

        let err = store.begin(sample_plan("plan-2")).unwrap_err();
        match err {
            Error::ActivePlanExists { current_id } => assert_eq!(current_id, "plan-1"),
            other => panic!("expected ActivePlanExists, got {other:?}"),
        }
        // Slot untouched
        assert_eq!(store.active().unwrap().id(), "plan-1");
    }

    #[test]
    fn test_replace_returns_displaced() {
        let store = MemoryPlanStore::new();
        store.begin(sample_plan("plan-1")).unwrap();

        let displaced = store.replace(sample_plan("plan-2")).unwrap();
        assert_eq!(displaced.unwrap().id(), "plan-1");
        assert_eq!(store.active().unwrap().id(), "plan-2");
        // Displaced plans are abandoned, not archived
        assert_eq!(store.completed_count(), 0);
    }

    #[test]
    fn test_replace_into_empty_slot() {
        let store = MemoryPlanStore::new();
        let displaced = store.replace(sample_plan("plan-1")).unwrap();
        assert!(displaced.is_none());
        assert_eq!(store.active().unwrap().id(), "plan-1");
    }

    #[test]
    fn test_complete_moves_to_archive() {
        let store = MemoryPlanStore::new();
        store.begin(sample_plan("plan-1")).unwrap();

        let completed = store.complete("plan-1", sample_outcome()).unwrap();
        assert!(completed.is_completed());
        assert!(store.active().is_none());
        assert_eq!(store.completed_count(), 1);
        assert_eq!(store.completed("plan-1").unwrap().id(), "plan-1");
    }

    #[test]
    fn test_complete_unknown_plan() {
        let store = MemoryPlanStore::new();
        store.begin(sample_plan("plan-1")).unwrap();

        let err = store.complete("plan-9", sample_outcome()).unwrap_err();
        assert!(matches!(err, Error::PlanNotFound(_)));
        // Active plan survives the failed call
        assert_eq!(store.active().unwrap().id(), "plan-1");
    }

    #[test]
    fn test_complete_twice_is_rejected() {
        let store = MemoryPlanStore::new();
        store.begin(sample_plan("plan-1")).unwrap();
        store.complete("plan-1", sample_outcome()).unwrap();

        let err = store.complete("plan-1", sample_outcome()).unwrap_err();
        assert!(matches!(err, Error::PlanAlreadyCompleted(_)));
        assert_eq!(store.completed_count(), 1);
    }

    #[test]
    fn test_begin_rejects_completed_plan() {
        let store = MemoryPlanStore::new();
        let mut plan = sample_plan("plan-1");
        plan.complete(sample_outcome()).unwrap();
        assert!(store.begin(plan).is_err());
    }

    #[test]
    fn test_slot_free_after_completion() {
        let store = MemoryPlanStore::new();
        store.begin(sample_plan("plan-1")).unwrap();
        store.complete("plan-1", sample_outcome()).unwrap();
        // A new plan may begin once the slot is clear
        store.begin(sample_plan("plan-2")).unwrap();
        assert_eq!(store.active().unwrap().id(), "plan-2");
    }
}
