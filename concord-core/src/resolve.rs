use concord_types::{
    ConcordError, MergeMethod, MergedPoint, NormalizedObservation, ResolutionPolicy, SourceId,
    ViewOptions,
};

use crate::fusion::fuse;

/// Collapse one date's observations into a merged point.
///
/// `observations` must all share a date and be in aligned order (priority,
/// then source id), as produced by [`crate::align`]. An empty slice yields
/// `None`; a single observation always yields it with `single_source`.
///
/// # Errors
/// Propagates `ConcordError::Configuration` from fusion.
pub fn resolve(
    observations: &[NormalizedObservation],
    policy: ResolutionPolicy,
) -> Result<Option<MergedPoint>, ConcordError> {
    resolve_with(observations, &ViewOptions::new(policy))
}

/// [`resolve`] with user preferences: a preferred source wins priority picks
/// whenever it reported, explicit weights feed fusion, and the spread between
/// observations is checked against the disagreement threshold.
///
/// # Errors
/// Propagates `ConcordError::Configuration` from fusion.
pub fn resolve_with(
    observations: &[NormalizedObservation],
    options: &ViewOptions,
) -> Result<Option<MergedPoint>, ConcordError> {
    let Some(first) = observations.first() else {
        return Ok(None);
    };

    let mut contributing: Vec<SourceId> = Vec::new();
    for o in observations {
        if !contributing.contains(&o.source) {
            contributing.push(o.source.clone());
        }
    }

    let (value, chosen, method) = if observations.len() == 1 {
        (
            first.canonical_value,
            first.source.clone(),
            MergeMethod::SingleSource,
        )
    } else {
        match options.policy {
            ResolutionPolicy::PriorityPick => {
                let pick = options
                    .preferred_source
                    .as_ref()
                    .and_then(|p| observations.iter().find(|o| &o.source == p))
                    .unwrap_or(first);
                (
                    pick.canonical_value,
                    pick.source.clone(),
                    MergeMethod::Priority,
                )
            }
            ResolutionPolicy::Fuse(m) => (
                fuse(observations, m, options.weights.as_ref())?,
                first.source.clone(),
                MergeMethod::Fused(m),
            ),
        }
    };

    let spread = spread(observations);
    let disagreement = match (spread, options.disagreement_threshold_pct) {
        (Some(s), Some(threshold)) => exceeds(s, value, threshold),
        _ => false,
    };

    Ok(Some(MergedPoint {
        date: first.date,
        value,
        chosen_source: chosen,
        contributing_sources: contributing,
        method,
        spread,
        disagreement,
    }))
}

fn spread(observations: &[NormalizedObservation]) -> Option<f64> {
    if observations.len() < 2 {
        return None;
    }
    let (lo, hi) = observations.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(lo, hi), o| (lo.min(o.canonical_value), hi.max(o.canonical_value)),
    );
    Some(hi - lo)
}

// Relative to the merged value; a zero value disagrees on any non-zero spread.
fn exceeds(spread: f64, value: f64, threshold_pct: f64) -> bool {
    if value == 0.0 {
        return spread > 0.0;
    }
    spread / value.abs() * 100.0 > threshold_pct
}
