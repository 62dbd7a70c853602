//! Report envelopes produced by the merge core and orchestrator.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::attribution::Attribution;
use crate::error::ConcordError;
use crate::observation::MergedPoint;
use crate::source::SourceId;

/// Whether a correlation result carries statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationStatus {
    /// Statistics were computed (individual ones may still be null on zero variance).
    Computed,
    /// Fewer paired points than the configured minimum; every statistic is null.
    InsufficientData,
}

/// Pairwise agreement report between two sources of one merge group.
///
/// Statistics are `None` when undefined: insufficient data, zero variance,
/// or (for the interval) fewer than four points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    /// Merge group slug.
    pub merge_group: String,
    /// Higher-ranked source of the pair.
    pub source_a: SourceId,
    /// Lower-ranked source of the pair.
    pub source_b: SourceId,
    /// Pearson product-moment correlation.
    pub pearson: Option<f64>,
    /// Spearman rank correlation.
    pub spearman: Option<f64>,
    /// Intraclass correlation (k = 2).
    pub icc: Option<f64>,
    /// Lin's concordance correlation coefficient.
    pub ccc: Option<f64>,
    /// Mean absolute error `mean(|a - b|)`.
    pub mae: Option<f64>,
    /// Root-mean-square error.
    pub rmse: Option<f64>,
    /// Signed mean bias `mean(a - b)`.
    pub mean_bias: Option<f64>,
    /// Two-tailed p-value for Pearson r.
    pub p_value: Option<f64>,
    /// Number of paired dates used.
    pub n: usize,
    /// Lower bound of the 95% interval for Pearson r.
    pub confidence_interval_lower: Option<f64>,
    /// Upper bound of the 95% interval for Pearson r.
    pub confidence_interval_upper: Option<f64>,
    /// First paired date, if any.
    pub first_date: Option<NaiveDate>,
    /// Last paired date, if any.
    pub last_date: Option<NaiveDate>,
    /// Whether statistics were produced.
    pub status: CorrelationStatus,
    /// When the result was computed; stamped by the orchestrator.
    pub computed_at: Option<DateTime<Utc>>,
}

impl CorrelationResult {
    /// True when the pair had fewer points than the configured minimum.
    #[must_use]
    pub fn is_insufficient(&self) -> bool {
        self.status == CorrelationStatus::InsufficientData
    }

    /// True if the result concerns the given unordered pair.
    #[must_use]
    pub fn is_pair(&self, a: &str, b: &str) -> bool {
        (self.source_a.as_str() == a && self.source_b.as_str() == b)
            || (self.source_a.as_str() == b && self.source_b.as_str() == a)
    }
}

/// Output of one merged-view computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedView {
    /// Merge group slug.
    pub merge_group: String,
    /// Merged series in ascending date order.
    pub points: Vec<MergedPoint>,
    /// Pairwise correlation report; empty when correlation is disabled.
    pub correlations: Vec<CorrelationResult>,
    /// Non-fatal issues encountered while building the view.
    pub warnings: Vec<ConcordError>,
    /// Which source supplied which date spans of the merged series.
    pub attribution: Attribution,
}

impl MergedView {
    /// Find the correlation result for an unordered source pair.
    #[must_use]
    pub fn correlation(&self, a: &str, b: &str) -> Option<&CorrelationResult> {
        self.correlations.iter().find(|r| r.is_pair(a, b))
    }

    /// Find the merged point for a date.
    #[must_use]
    pub fn point(&self, date: NaiveDate) -> Option<&MergedPoint> {
        self.points
            .binary_search_by(|p| p.date.cmp(&date))
            .ok()
            .and_then(|i| self.points.get(i))
    }
}
