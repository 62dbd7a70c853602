//! Attribution types for merged series spans.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::source::SourceId;

/// A run of consecutive merged dates `[start..=end]` chosen from one source.
///
/// Consecutive means adjacent in the merged series, which is sparse; calendar
/// gaps between merged dates do not split a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Inclusive start date.
    pub start: NaiveDate,
    /// Inclusive end date.
    pub end: NaiveDate,
}

/// Attribution of a merged series: which source supplied which date spans.
///
/// Useful for debugging resolution decisions and source coverage over time.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Attribution {
    /// Merge group slug the attribution refers to.
    pub merge_group: String,
    /// Collected spans annotated by source.
    pub spans: Vec<(SourceId, Span)>,
}

impl Attribution {
    /// Create a new attribution container for a group.
    #[must_use]
    pub const fn new(merge_group: String) -> Self {
        Self {
            merge_group,
            spans: vec![],
        }
    }

    /// Record a date chosen from `source`, extending the last span when it
    /// came from the same source.
    pub fn record(&mut self, source: &SourceId, date: NaiveDate) {
        if let Some((last_src, span)) = self.spans.last_mut()
            && last_src == source
        {
            span.end = date;
            return;
        }
        self.spans.push((
            source.clone(),
            Span {
                start: date,
                end: date,
            },
        ));
    }

    /// Spans contributed by one source.
    pub fn spans_for<'a>(&'a self, source: &'a str) -> impl Iterator<Item = Span> + 'a {
        self.spans
            .iter()
            .filter(move |(s, _)| s.as_str() == source)
            .map(|(_, span)| *span)
    }
}
