use concord_core::ConcordError;

/// Join a collection of tasks and apply an optional request-level deadline.
///
/// Wraps `futures::future::join_all(tasks)`; on timeout the result is
/// `ConcordError::RequestTimeout` for `group`.
///
/// # Errors
/// Returns `RequestTimeout` when the deadline passes before every task finishes.
pub async fn join_with_deadline<I, F, T>(
    group: &str,
    tasks: I,
    deadline: Option<std::time::Duration>,
) -> Result<Vec<T>, ConcordError>
where
    I: IntoIterator<Item = F>,
    F: std::future::Future<Output = T>,
{
    crate::core::with_request_deadline(group, deadline, futures::future::join_all(tasks)).await
}

/// Collapse the errors of a fan-out in which no provider succeeded.
///
/// Rules:
/// - All errors are `ProviderTimeout` -> `AllProvidersTimedOut(group)`.
/// - All errors are `NotFound` -> `NotFound("series for merge group <group>")`.
/// - Otherwise -> `AllProvidersFailed(errors)`.
#[must_use]
pub fn collapse_errors(group: &str, errors: Vec<ConcordError>) -> ConcordError {
    if !errors.is_empty()
        && errors
            .iter()
            .all(|e| matches!(e, ConcordError::ProviderTimeout { .. }))
    {
        return ConcordError::AllProvidersTimedOut {
            group: group.to_string(),
        };
    }
    if !errors.is_empty()
        && errors
            .iter()
            .all(|e| matches!(e, ConcordError::NotFound { .. }))
    {
        return ConcordError::not_found(format!("series for merge group {group}"));
    }
    ConcordError::AllProvidersFailed(errors)
}
