//! Micro-Experiments - declared behaviour trials with frozen verdicts
//!
//! A plan covers a fixed run of days; the equal-length block immediately
//! before it is the baseline. The comparator averages each tracked metric
//! over both windows and reports the delta, per metric, with its own
//! enough-data verdict.
//!
//! ## Lifecycle
//!
//! ```text
//! none ──begin──> active (unrated) ──complete──> completed (rated)
//!                    │    ▲                          [archived]
//!                    └────┘ replace (explicit displace)
//! ```
//!
//! One plan is active at a time; the store guards that transition. Rating
//! a plan freezes a [`ComparisonDigest`] into its outcome, so conclusions
//! stated to the user survive any later edits to historical entries.
//!
//! ## Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use pauta::config::Thresholds;
//! use pauta::entry::{DailyEntry, FlagKey};
//! use pauta::experiment::{compare, ExperimentPlan, MemoryPlanStore, PlanStore};
//! use pauta::metric::{MetricKey, SymptomKey};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
//! let plan = ExperimentPlan::builder("plan-001", "Earlier bedtime", start, 7)
//!     .metric(MetricKey::Builtin(SymptomKey::SleepQuality))
//!     .change_flag(FlagKey::LateNight)
//!     .build()
//!     .unwrap();
//!
//! let store = MemoryPlanStore::new();
//! store.begin(plan.clone()).unwrap();
//!
//! let entries: Vec<DailyEntry> = Vec::new();
//! let result = compare(&entries, &plan, &Thresholds::default()).unwrap();
//! assert!(!result.enough_data());
//! ```

mod compare;
mod plan;
mod store;

pub use compare::{compare, ComparisonDigest, ComparisonResult, MetricComparison, WindowStats};
pub use plan::{ExperimentPlan, ExperimentPlanBuilder, PlanOrigin, PlanOutcome};
pub use store::{MemoryPlanStore, PlanStore};

pub use crate::window::ExperimentWindows;
