//! Observation records flowing through the merge pipeline.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::FusionMethod;
use crate::source::SourceId;

/// One raw value reported by a source on a calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    /// Reporting source.
    pub source: SourceId,
    /// Caller-localized calendar date.
    pub date: NaiveDate,
    /// Value in the source's native unit.
    pub value: f64,
}

impl RawObservation {
    /// Construct a raw observation.
    pub fn new(source: impl Into<SourceId>, date: NaiveDate, value: f64) -> Self {
        Self {
            source: source.into(),
            date,
            value,
        }
    }
}

/// A raw observation converted into the group's canonical unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedObservation {
    /// Reporting source.
    pub source: SourceId,
    /// Calendar date.
    pub date: NaiveDate,
    /// Value in the canonical unit.
    pub canonical_value: f64,
    /// Value as reported.
    pub original_value: f64,
    /// Unit the value was reported in.
    pub original_unit: String,
    /// Priority of the source's mapping.
    pub priority: u32,
    /// Declared accuracy of the source's mapping, in percent.
    pub accuracy_pct: Option<f64>,
}

/// How a merged point's value was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeMethod {
    /// Only one observation existed on the date.
    SingleSource,
    /// The highest-priority observation was picked.
    Priority,
    /// Observations were blended.
    Fused(FusionMethod),
}

impl MergeMethod {
    /// Stable label (`single_source`, `priority`, or the fusion method name).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SingleSource => "single_source",
            Self::Priority => "priority",
            Self::Fused(m) => m.as_str(),
        }
    }
}

impl fmt::Display for MergeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the merged output series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedPoint {
    /// Calendar date.
    pub date: NaiveDate,
    /// Resolved value in the canonical unit.
    pub value: f64,
    /// Source whose value was chosen, or the highest-ranked contributor when fused.
    pub chosen_source: SourceId,
    /// Distinct sources present on the date, in priority order.
    pub contributing_sources: Vec<SourceId>,
    /// Resolution method.
    pub method: MergeMethod,
    /// Max minus min canonical value across observations; `None` for a single observation.
    pub spread: Option<f64>,
    /// True when `spread` exceeds the configured disagreement threshold.
    pub disagreement: bool,
}
