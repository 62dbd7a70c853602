use concord_types::{ConcordError, FusionMethod, NormalizedObservation, SourceId, WeightTable};

/// Blend the canonical values of one date's observations.
///
/// - `WeightedAverage`: weight is `1 / priority`, or the entry in `weights` when
///   a table is supplied.
/// - `Median`: middle value, or the mean of the two middle values.
/// - `AccuracyWeighted`: weight is the source's declared accuracy percentage.
///
/// Only the observations given are combined; nothing is imputed. A source
/// that reported several times on the date counts once, with its first
/// observation in aligned order.
///
/// # Errors
/// Returns `ConcordError::Configuration` when a weight cannot be derived
/// (priority 0, source missing from the table, no declared accuracy), a weight
/// is negative or non-finite, the weights sum to zero, or `method` is not
/// supported by this build. Returns `ConcordError::InvalidArg` for an empty
/// slice.
pub fn fuse(
    observations: &[NormalizedObservation],
    method: FusionMethod,
    weights: Option<&WeightTable>,
) -> Result<f64, ConcordError> {
    if observations.is_empty() {
        return Err(ConcordError::InvalidArg("nothing to fuse".into()));
    }
    let observations = first_per_source(observations);
    let observations = observations.as_slice();
    match method {
        FusionMethod::WeightedAverage => weighted_mean(observations, |o| {
            if let Some(table) = weights {
                return table.get(&o.source).copied().ok_or_else(|| {
                    ConcordError::config(format!("no fusion weight for source {}", o.source))
                });
            }
            if o.priority == 0 {
                return Err(ConcordError::config(format!(
                    "source {} has priority 0; cannot derive a 1/priority weight",
                    o.source
                )));
            }
            Ok(1.0 / f64::from(o.priority))
        }),
        FusionMethod::AccuracyWeighted => weighted_mean(observations, |o| {
            o.accuracy_pct.ok_or_else(|| {
                ConcordError::config(format!("source {} declares no accuracy", o.source))
            })
        }),
        FusionMethod::Median => Ok(median(observations)),
        other => Err(ConcordError::config(format!(
            "unsupported fusion method: {other}"
        ))),
    }
}

fn first_per_source(observations: &[NormalizedObservation]) -> Vec<&NormalizedObservation> {
    let mut seen: Vec<&SourceId> = Vec::with_capacity(observations.len());
    let mut out = Vec::with_capacity(observations.len());
    for o in observations {
        if !seen.contains(&&o.source) {
            seen.push(&o.source);
            out.push(o);
        }
    }
    out
}

fn weighted_mean<F>(
    observations: &[&NormalizedObservation],
    weight: F,
) -> Result<f64, ConcordError>
where
    F: Fn(&NormalizedObservation) -> Result<f64, ConcordError>,
{
    let mut total = 0.0;
    let mut acc = 0.0;
    for &o in observations {
        let w = weight(o)?;
        if !w.is_finite() || w < 0.0 {
            return Err(ConcordError::config(format!(
                "invalid fusion weight {w} for source {}",
                o.source
            )));
        }
        total += w;
        acc += w * o.canonical_value;
    }
    if total <= 0.0 {
        return Err(ConcordError::config("fusion weights sum to zero"));
    }
    Ok(acc / total)
}

fn median(observations: &[&NormalizedObservation]) -> f64 {
    let mut values: Vec<f64> = observations.iter().map(|o| o.canonical_value).collect();
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}
