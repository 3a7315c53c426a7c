//! # Pauta: Deterministic Insight Engine for Daily Self-Reports
//!
//! **Version**: 0.1.0
//!
//! Pauta turns noisy, sparse daily self-report data (mood, symptoms,
//! behaviour flags) into a small set of ranked, hedged findings, pattern-
//! triggered micro-experiment suggestions, and before/after verdicts for
//! user-declared experiments. Identical inputs always produce identical
//! outputs; no clocks, no randomness, no I/O.
//!
//! ## Design Principles (Toyota Way Aligned)
//!
//! - **Jidoka**: degenerate series stop at `None`: empty windows, zero
//!   variance, and undefined coefficients suppress a claim rather than
//!   fabricate one
//! - **Poka-Yoke safety**: one active plan, guarded at the store's single
//!   write path; rated outcomes freeze their comparison digest forever
//! - **Genchi Genbutsu**: every heuristic is a named [`Thresholds`] field,
//!   testable in isolation from the logic that applies it
//! - **Muda elimination**: one metric resolver feeds the gate, scorer,
//!   ranker, suggestion engine, and comparator
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use pauta::entry::DailyEntry;
//! use pauta::metric::{MetricKey, SymptomKey};
//! use pauta::window::DateRange;
//! use pauta::{InsightEngine, MetricCatalog};
//!
//! # fn pearson(xs: &[f32], ys: &[f32]) -> Option<f32> {
//! #     let n = xs.len();
//! #     if n < 2 || n != ys.len() { return None; }
//! #     let nf = n as f32;
//! #     let mx = xs.iter().sum::<f32>() / nf;
//! #     let my = ys.iter().sum::<f32>() / nf;
//! #     let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
//! #     for (x, y) in xs.iter().zip(ys) {
//! #         sxy += (x - mx) * (y - my);
//! #         sxx += (x - mx) * (x - mx);
//! #         syy += (y - my) * (y - my);
//! #     }
//! #     let denom = (sxx * syy).sqrt();
//! #     if denom < f32::EPSILON { return None; }
//! #     Some(sxy / denom)
//! # }
//! // Ten days of steadily rising stress
//! let entries: Vec<DailyEntry> = (0..10)
//!     .map(|i| {
//!         let date = NaiveDate::from_ymd_opt(2024, 3, 1 + i).unwrap();
//!         DailyEntry::builder(date)
//!             .symptom(SymptomKey::Stress, 1.0 + 0.8 * i as f32)
//!             .build()
//!     })
//!     .collect();
//!
//! // The correlation primitive is injected; the engine never computes r
//! let engine = InsightEngine::new(MetricCatalog::new(), pearson);
//! let window = DateRange::new(
//!     NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
//! )
//! .unwrap();
//!
//! let findings = engine.findings(
//!     &entries,
//!     &window,
//!     &[MetricKey::Builtin(SymptomKey::Stress)],
//! );
//! assert!(findings[0].title.contains("trending up"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod config;
pub mod correlation;
pub mod cycle;
pub mod engine;
pub mod entry;
pub mod error;
pub mod experiment;
pub mod findings;
pub mod metric;
pub mod report;
pub mod stats;
pub mod suggest;
pub mod window;

pub use config::Thresholds;
pub use engine::InsightEngine;
pub use error::{Error, Result};
pub use metric::MetricCatalog;
