use concord_types::{ConcordError, NormalizedObservation, RawObservation, SourceMapping};

/// Convert `value` into the canonical unit: `value * factor + offset`.
///
/// # Errors
/// Returns `ConcordError::Configuration` if the mapping's factor is zero or
/// non-finite, or its offset is non-finite.
pub fn normalize(value: f64, mapping: &SourceMapping) -> Result<f64, ConcordError> {
    mapping.check_conversion()?;
    Ok(value * mapping.factor + mapping.offset)
}

/// Normalize a raw observation, carrying the mapping's priority and accuracy along.
///
/// # Errors
/// Same as [`normalize`].
pub fn normalize_observation(
    obs: &RawObservation,
    mapping: &SourceMapping,
) -> Result<NormalizedObservation, ConcordError> {
    Ok(NormalizedObservation {
        source: mapping.source.clone(),
        date: obs.date,
        canonical_value: normalize(obs.value, mapping)?,
        original_value: obs.value,
        original_unit: mapping.unit.clone(),
        priority: mapping.priority,
        accuracy_pct: mapping.accuracy_pct,
    })
}
