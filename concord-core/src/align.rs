use std::collections::BTreeMap;

use chrono::NaiveDate;
use concord_types::{ConcordError, NormalizedObservation, RawSeries, SourceId, SourceMapping};

use crate::normalize::normalize_observation;

/// Normalized observations grouped by date, plus non-fatal issues hit while aligning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aligned {
    /// Observations per date, ordered by priority, then source id, then input order.
    pub table: BTreeMap<NaiveDate, Vec<NormalizedObservation>>,
    /// `UnmappedSource` and non-finite value warnings.
    pub warnings: Vec<ConcordError>,
}

impl Aligned {
    /// Latest date present in the table.
    #[must_use]
    pub fn latest(&self) -> Option<NaiveDate> {
        self.table.keys().next_back().copied()
    }
}

/// Index mappings by source id.
#[must_use]
pub fn index_mappings(mappings: &[SourceMapping]) -> BTreeMap<SourceId, SourceMapping> {
    mappings
        .iter()
        .map(|m| (m.source.clone(), m.clone()))
        .collect()
}

/// Normalize every raw observation and group the results by calendar date.
///
/// - Sources without a mapping are dropped with one `UnmappedSource` warning each.
/// - Non-finite raw values are dropped with an `InvalidArg` warning.
/// - Several observations from one source on one date are all kept.
/// - Dates are compared exactly; no timezone handling happens here.
///
/// The source of each observation is the key it is filed under in `sources`.
///
/// # Errors
/// Returns `ConcordError::Configuration` if a mapping has an unusable conversion.
pub fn align(
    sources: &RawSeries,
    mappings: &BTreeMap<SourceId, SourceMapping>,
) -> Result<Aligned, ConcordError> {
    let group = mappings
        .values()
        .next()
        .map(|m| m.group.clone())
        .unwrap_or_default();

    let mut out = Aligned::default();
    for (source, observations) in sources {
        let Some(mapping) = mappings.get(source) else {
            if !observations.is_empty() {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    group = %group,
                    source = %source,
                    dropped = observations.len(),
                    "dropping observations from unmapped source"
                );
                out.warnings.push(ConcordError::UnmappedSource {
                    group: group.clone(),
                    source_id: source.to_string(),
                    dropped: observations.len(),
                });
            }
            continue;
        };
        for obs in observations {
            if !obs.value.is_finite() {
                #[cfg(feature = "tracing")]
                tracing::warn!(source = %source, date = %obs.date, "dropping non-finite observation");
                out.warnings.push(ConcordError::InvalidArg(format!(
                    "non-finite value from {source} on {}",
                    obs.date
                )));
                continue;
            }
            let normalized = normalize_observation(obs, mapping)?;
            out.table.entry(obs.date).or_default().push(normalized);
        }
    }

    // Stable sort keeps input order among a source's same-date duplicates.
    for day in out.table.values_mut() {
        day.sort_by(|a, b| (a.priority, &a.source).cmp(&(b.priority, &b.source)));
    }
    Ok(out)
}
