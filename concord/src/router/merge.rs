use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use concord_core::{
    ConcordError, GroupDefinition, MergedView, RawObservation, RawSeries, SeriesProvider,
    SeriesRequest, SourceId, ViewOptions, build_merged_view_with,
};

use crate::Concord;
use crate::core::tag_err;
use crate::router::util::{collapse_errors, join_with_deadline};

type FetchResult = (SourceId, Result<Vec<RawObservation>, ConcordError>);
type Collected = (RawSeries, Vec<ConcordError>);

impl Concord {
    /// Fetch every source mapped in the requested group and build its merged view.
    ///
    /// Behavior:
    /// - Providers whose source is mapped in the group are called concurrently,
    ///   each bounded by the provider timeout and all bounded by the request
    ///   timeout when one is set.
    /// - A provider that fails or times out is left out; its error is reported
    ///   in `warnings` ahead of the alignment warnings.
    /// - Every correlation row is stamped with the same `computed_at`.
    /// - The correlation report for `req` is refreshed in the cache, but only
    ///   when every eligible provider delivered. A partial report is returned
    ///   and never cached.
    ///
    /// # Errors
    /// - `InvalidArg` if `start` is after `end`.
    /// - `NotFound` for an unknown group, a group no registered provider serves,
    ///   or when every provider reports `NotFound`.
    /// - `AllProvidersTimedOut`, `AllProvidersFailed`, or `RequestTimeout` when
    ///   no provider delivered data.
    /// - `Configuration` from the merge itself.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "concord::router::merge::merged_view",
            skip(self, req, options),
            fields(group = %req.group, policy = ?options.policy),
        )
    )]
    pub async fn merged_view(
        &self,
        req: &SeriesRequest,
        options: &ViewOptions,
    ) -> Result<MergedView, ConcordError> {
        req.validate()?;
        let def = self.definition(&req.group)?;
        let (raw, fetch_warnings) = self.fetch_raw_series(def, req).await?;

        let mut view = build_merged_view_with(&def.group, &def.sources, &raw, options)?;
        let computed_at = Utc::now();
        for c in &mut view.correlations {
            c.computed_at = Some(computed_at);
        }
        if fetch_warnings.is_empty() {
            self.cache
                .insert(req.clone(), Arc::new(view.correlations.clone()))
                .await;
        } else {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                group = %req.group,
                failed = fetch_warnings.len(),
                "partial merge; correlation report not cached"
            );
            let mut warnings = fetch_warnings;
            warnings.append(&mut view.warnings);
            view.warnings = warnings;
        }
        Ok(view)
    }

    async fn fetch_raw_series(
        &self,
        def: &GroupDefinition,
        req: &SeriesRequest,
    ) -> Result<Collected, ConcordError> {
        let eligible = self.eligible(def);
        if eligible.is_empty() {
            return Err(ConcordError::not_found(format!(
                "providers for merge group {}",
                def.group.slug
            )));
        }
        let timeout = self.cfg.provider_timeout;
        let tasks = eligible
            .iter()
            .map(|p| Self::spawn_fetch_task(Arc::clone(p), req, timeout));
        let joined = join_with_deadline(&req.group, tasks, self.cfg.request_timeout).await?;
        Self::collect_successes(&req.group, joined)
    }

    fn spawn_fetch_task(
        p: Arc<dyn SeriesProvider>,
        req: &SeriesRequest,
        timeout: Duration,
    ) -> impl std::future::Future<Output = FetchResult> {
        async move {
            let source = p.source().clone();
            let res = Self::provider_call_with_timeout(&source, timeout, p.observations(req))
                .await
                .map_err(|e| tag_err(&source, e));
            (source, res)
        }
    }

    fn collect_successes(group: &str, joined: Vec<FetchResult>) -> Result<Collected, ConcordError> {
        let mut raw = RawSeries::new();
        let mut errors: Vec<ConcordError> = Vec::new();
        for (source, res) in joined {
            match res {
                Ok(observations) => {
                    raw.insert(source, observations);
                }
                Err(e) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        group,
                        source = %source,
                        error = %e,
                        "provider failed; merging without it"
                    );
                    errors.push(e);
                }
            }
        }
        if raw.is_empty() {
            return Err(collapse_errors(group, errors));
        }
        Ok((raw, errors))
    }
}
