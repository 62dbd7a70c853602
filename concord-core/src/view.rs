use std::borrow::Cow;

use chrono::{Days, NaiveDate};
use concord_types::{
    Attribution, ConcordError, CorrelationResult, GroupDefinition, MergeGroup, MergedView,
    NormalizedObservation, RawSeries, ResolutionPolicy, SourceId, SourceMapping, ViewOptions,
};

use crate::align::{Aligned, align, index_mappings};
use crate::resolve::resolve_with;
use crate::stats::correlate;

/// Date-matched value pairs and the first/last paired dates.
pub type PairedSeries = (Vec<(f64, f64)>, Option<(NaiveDate, NaiveDate)>);

/// Build the merged series and correlation report for one merge group.
///
/// Equivalent to [`build_merged_view_with`] with no user preferences beyond the policy.
///
/// # Errors
/// Returns `ConcordError::Configuration` for an invalid group or mapping set, or
/// when fusion cannot run with the configured method and weights.
pub fn build_merged_view(
    group: &MergeGroup,
    mappings: &[SourceMapping],
    raw: &RawSeries,
    policy: ResolutionPolicy,
) -> Result<MergedView, ConcordError> {
    build_merged_view_with(group, mappings, raw, &ViewOptions::new(policy))
}

/// Build the merged series and correlation report for one merge group.
///
/// Steps:
/// 1. Validate the group and mappings, then align the raw series by date.
/// 2. Resolve every date in ascending order into one merged point.
/// 3. When correlation is enabled, correlate every unordered pair of mapped
///    sources over the dates both reported (restricted to the rolling window
///    when one is configured). `source_a` is the higher-ranked source.
///
/// Unmapped sources and non-finite values end up in `warnings`. A mapping
/// with an empty `group` is taken to belong to `group`.
///
/// # Errors
/// Returns `ConcordError::Configuration` for an invalid group or mapping set, or
/// when fusion cannot run with the configured method and weights.
pub fn build_merged_view_with(
    group: &MergeGroup,
    mappings: &[SourceMapping],
    raw: &RawSeries,
    options: &ViewOptions,
) -> Result<MergedView, ConcordError> {
    let mappings = bind_to_group(group, mappings);
    let mappings = mappings.as_ref();
    GroupDefinition::validate_parts(group, mappings)?;
    let aligned = align(raw, &index_mappings(mappings))?;

    let mut points = Vec::with_capacity(aligned.table.len());
    let mut attribution = Attribution::new(group.slug.clone());
    for observations in aligned.table.values() {
        if let Some(point) = resolve_with(observations, options)? {
            attribution.record(&point.chosen_source, point.date);
            points.push(point);
        }
    }

    let correlations = if group.correlation_enabled() {
        correlate_pairs(group, mappings, &aligned)
    } else {
        Vec::new()
    };

    Ok(MergedView {
        merge_group: group.slug.clone(),
        points,
        correlations,
        warnings: aligned.warnings,
        attribution,
    })
}

fn bind_to_group<'a>(
    group: &MergeGroup,
    mappings: &'a [SourceMapping],
) -> Cow<'a, [SourceMapping]> {
    if mappings.iter().all(|m| !m.group.is_empty()) {
        return Cow::Borrowed(mappings);
    }
    Cow::Owned(
        mappings
            .iter()
            .cloned()
            .map(|mut m| {
                if m.group.is_empty() {
                    m.group.clone_from(&group.slug);
                }
                m
            })
            .collect(),
    )
}

fn correlate_pairs(
    group: &MergeGroup,
    mappings: &[SourceMapping],
    aligned: &Aligned,
) -> Vec<CorrelationResult> {
    let mut ranked: Vec<&SourceMapping> = mappings.iter().collect();
    ranked.sort_by(|a, b| a.rank_key().cmp(&b.rank_key()));

    let window_start = window_start(group, aligned);
    let min_points = group.min_data_points();
    let mut out = Vec::new();
    for (i, a) in ranked.iter().enumerate() {
        for b in ranked.iter().skip(i + 1) {
            let (pairs, dates) = paired_series(aligned, &a.source, &b.source, window_start);
            let stats = correlate(&pairs, min_points);
            #[cfg(feature = "tracing")]
            {
                if stats.status == concord_types::CorrelationStatus::InsufficientData {
                    tracing::debug!(
                        group = %group.slug,
                        source_a = %a.source,
                        source_b = %b.source,
                        n = stats.n,
                        min_points,
                        "insufficient paired data for correlation"
                    );
                }
            }
            out.push(stats.into_result(&group.slug, a.source.clone(), b.source.clone(), dates));
        }
    }
    out
}

fn window_start(group: &MergeGroup, aligned: &Aligned) -> Option<NaiveDate> {
    let days = group.window_days()?;
    let latest = aligned.latest()?;
    Some(
        latest
            .checked_sub_days(Days::new(u64::from(days.saturating_sub(1))))
            .unwrap_or(NaiveDate::MIN),
    )
}

/// Inner-join two sources on date over an aligned table.
///
/// A source that reported several times on one date contributes its first
/// observation in aligned order. Dates before `since` are skipped. Returns the
/// pairs in ascending date order and the first/last paired dates.
#[must_use]
pub fn paired_series(
    aligned: &Aligned,
    a: &SourceId,
    b: &SourceId,
    since: Option<NaiveDate>,
) -> PairedSeries {
    let mut pairs = Vec::new();
    let mut first: Option<NaiveDate> = None;
    let mut last: Option<NaiveDate> = None;
    let dates = match since {
        Some(s) => aligned.table.range(s..),
        None => aligned.table.range(..),
    };
    for (date, observations) in dates {
        if let (Some(x), Some(y)) = (value_of(observations, a), value_of(observations, b)) {
            pairs.push((x, y));
            first.get_or_insert(*date);
            last = Some(*date);
        }
    }
    (pairs, first.zip(last))
}

fn value_of(observations: &[NormalizedObservation], source: &SourceId) -> Option<f64> {
    observations
        .iter()
        .find(|o| &o.source == source)
        .map(|o| o.canonical_value)
}
