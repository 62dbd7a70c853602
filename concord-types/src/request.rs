//! Request types for fetching raw series from providers.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ConcordError;
use crate::observation::RawObservation;
use crate::source::SourceId;

/// Raw observations keyed by the source that reported them.
pub type RawSeries = BTreeMap<SourceId, Vec<RawObservation>>;

/// Which group and date range to fetch; bounds are inclusive and optional.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesRequest {
    /// Merge group slug.
    pub group: String,
    /// Inclusive lower bound.
    pub start: Option<NaiveDate>,
    /// Inclusive upper bound.
    pub end: Option<NaiveDate>,
}

impl SeriesRequest {
    /// Request the full history of a group.
    pub fn new(group: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            start: None,
            end: None,
        }
    }

    /// Request a bounded date range.
    ///
    /// # Errors
    /// Returns `ConcordError::InvalidArg` if `start` is after `end`.
    pub fn try_from_range(
        group: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Self, ConcordError> {
        let req = Self {
            group: group.into(),
            start: Some(start),
            end: Some(end),
        };
        req.validate()?;
        Ok(req)
    }

    /// Check the range bounds.
    ///
    /// # Errors
    /// Returns `ConcordError::InvalidArg` if `start` is after `end`.
    pub fn validate(&self) -> Result<(), ConcordError> {
        if let (Some(s), Some(e)) = (self.start, self.end)
            && s > e
        {
            return Err(ConcordError::InvalidArg(format!(
                "start {s} is after end {e}"
            )));
        }
        Ok(())
    }

    /// Whether `date` falls inside the requested range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|s| date >= s) && self.end.is_none_or(|e| date <= e)
    }
}
