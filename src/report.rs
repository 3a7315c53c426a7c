//! Insight report - serializable export payload
//!
//! A point-in-time snapshot of what the engine currently shows: the
//! findings as highlights plus the strongest gated correlations, with
//! every metric rendered as its display label. Field names serialize in
//! camelCase for the consuming clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::correlation::CorrelationCandidate;
use crate::findings::Finding;
use crate::metric::{MetricCatalog, MetricKey};

/// Correlations included before the report cuts off
const MAX_REPORT_CORRELATIONS: usize = 3;

/// One finding rendered for export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    /// Short headline
    pub title: String,
    /// One or two sentence explanation
    pub body: String,
}

/// One correlation rendered for export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationSummary {
    /// Display label of the first metric
    pub a: String,
    /// Display label of the second metric
    pub b: String,
    /// Confidence tier rendered as a word: weak, moderate, strong
    pub strength_label: String,
}

/// Serializable snapshot of the current insights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightReport {
    generated_at: DateTime<Utc>,
    timeframe_label: String,
    entries: usize,
    selected_metrics: Vec<String>,
    highlights: Vec<Highlight>,
    top_correlations: Vec<CorrelationSummary>,
}

impl InsightReport {
    /// Compose a report from current findings and gated correlations.
    ///
    /// `correlations` is expected in quality order (the scan's output
    /// order); only the first few survive the cut. Timestamped with the
    /// current time; override with [`Self::with_generated_at`] when a
    /// stable payload is needed.
    #[must_use]
    pub fn compose(
        timeframe_label: impl Into<String>,
        entries: usize,
        selected: &[MetricKey],
        findings: &[Finding],
        correlations: &[CorrelationCandidate],
        catalog: &MetricCatalog,
    ) -> Self {
        let highlights = findings
            .iter()
            .map(|f| Highlight {
                title: f.title.clone(),
                body: f.body.clone(),
            })
            .collect();

        let top_correlations = correlations
            .iter()
            .take(MAX_REPORT_CORRELATIONS)
            .map(|c| CorrelationSummary {
                a: c.a.label(catalog),
                b: c.b.label(catalog),
                strength_label: c.confidence.label().to_string(),
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            timeframe_label: timeframe_label.into(),
            entries,
            selected_metrics: selected.iter().map(|m| m.label(catalog)).collect(),
            highlights,
            top_correlations,
        }
    }

    /// Set a custom generation timestamp (useful for testing).
    #[must_use]
    pub const fn with_generated_at(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = generated_at;
        self
    }

    /// Get the generation timestamp.
    #[must_use]
    pub const fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// Get the human-readable timeframe label.
    #[must_use]
    pub fn timeframe_label(&self) -> &str {
        &self.timeframe_label
    }

    /// Get the number of entries in the reported window.
    #[must_use]
    pub const fn entries(&self) -> usize {
        self.entries
    }

    /// Get the display labels of the selected metrics.
    #[must_use]
    pub fn selected_metrics(&self) -> &[String] {
        &self.selected_metrics
    }

    /// Get the exported findings.
    #[must_use]
    pub fn highlights(&self) -> &[Highlight] {
        &self.highlights
    }

    /// Get the exported correlations, strongest first.
    #[must_use]
    pub fn top_correlations(&self) -> &[CorrelationSummary] {
        &self.top_correlations
    }
}
