use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use concord_core::{
    ConcordError, CorrelationResult, GroupCatalog, GroupDefinition, SeriesProvider, SeriesRequest,
    SourceId,
};
use moka::future::Cache;

use crate::config::ConcordConfig;

/// Orchestrator that fetches raw series from registered providers and merges them.
pub struct Concord {
    pub(crate) providers: Vec<Arc<dyn SeriesProvider>>,
    pub(crate) catalog: GroupCatalog,
    pub(crate) cfg: ConcordConfig,
    pub(crate) cache: Cache<SeriesRequest, Arc<Vec<CorrelationResult>>>,
}

/// Builder for constructing a `Concord` orchestrator with custom configuration.
pub struct ConcordBuilder {
    providers: Vec<Arc<dyn SeriesProvider>>,
    catalog: GroupCatalog,
    cfg: ConcordConfig,
}

impl Default for ConcordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConcordBuilder {
    /// Create a new builder with sensible defaults.
    ///
    /// Starts with no providers and an empty catalog; a 5s provider timeout, no
    /// overall deadline, and a 256-entry correlation cache with a 15 minute TTL.
    #[must_use]
    pub fn new() -> Self {
        Self {
            providers: vec![],
            catalog: GroupCatalog::default(),
            cfg: ConcordConfig::default(),
        }
    }

    /// Register a series provider. Each source may be served by one provider only.
    #[must_use]
    pub fn with_provider(mut self, p: Arc<dyn SeriesProvider>) -> Self {
        self.providers.push(p);
        self
    }

    /// Add or replace one merge group definition.
    #[must_use]
    pub fn with_group(mut self, def: GroupDefinition) -> Self {
        self.catalog.insert(def);
        self
    }

    /// Add every group of `catalog`, replacing definitions with the same slug.
    #[must_use]
    pub fn with_catalog(mut self, catalog: GroupCatalog) -> Self {
        for def in catalog.groups {
            self.catalog.insert(def);
        }
        self
    }

    /// Set the per-provider timeout.
    #[must_use]
    pub const fn provider_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.provider_timeout = timeout;
        self
    }

    /// Set an overall deadline for one fan-out. When exceeded the call fails
    /// with `RequestTimeout` and no partial view is produced.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.request_timeout = Some(timeout);
        self
    }

    /// Maximum number of cached correlation reports.
    #[must_use]
    pub const fn cache_capacity(mut self, entries: u64) -> Self {
        self.cfg.cache_capacity = entries;
        self
    }

    /// Lifetime of a cached correlation report.
    #[must_use]
    pub const fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cfg.cache_ttl = ttl;
        self
    }

    /// Build the `Concord` orchestrator.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no providers have been registered, and
    /// `Configuration` if the catalog is invalid or two providers serve the
    /// same source.
    pub fn build(self) -> Result<Concord, ConcordError> {
        if self.providers.is_empty() {
            return Err(ConcordError::InvalidArg(
                "no providers registered; add at least one via with_provider(...)".to_string(),
            ));
        }
        let mut seen: HashSet<&SourceId> = HashSet::with_capacity(self.providers.len());
        for p in &self.providers {
            if !seen.insert(p.source()) {
                return Err(ConcordError::config(format!(
                    "source {} is served by more than one provider",
                    p.source()
                )));
            }
        }
        self.catalog.validate()?;

        let cache = Cache::builder()
            .max_capacity(self.cfg.cache_capacity)
            .time_to_live(self.cfg.cache_ttl)
            .build();
        Ok(Concord {
            providers: self.providers,
            catalog: self.catalog,
            cfg: self.cfg,
            cache,
        })
    }
}

/// Wrap provider errors that carry no source attribution.
pub fn tag_err(source: &SourceId, e: ConcordError) -> ConcordError {
    match e {
        e @ (ConcordError::NotFound { .. }
        | ConcordError::ProviderTimeout { .. }
        | ConcordError::Provider { .. }
        | ConcordError::RequestTimeout { .. }
        | ConcordError::AllProvidersTimedOut { .. }
        | ConcordError::AllProvidersFailed(_)) => e,
        other => ConcordError::provider(source.as_str(), other.to_string()),
    }
}

impl Concord {
    /// Start building a new `Concord` instance.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use concord_mock::{MockProvider, fixtures};
    ///
    /// let concord = concord::Concord::builder()
    ///     .with_catalog(fixtures::catalog())
    ///     .with_provider(Arc::new(MockProvider::new("scale_api")))
    ///     .with_provider(Arc::new(MockProvider::new("wearable_api")))
    ///     .provider_timeout(std::time::Duration::from_secs(2))
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> ConcordBuilder {
        ConcordBuilder::new()
    }

    /// The active runtime settings.
    #[must_use]
    pub const fn config(&self) -> &ConcordConfig {
        &self.cfg
    }

    /// The group catalog this orchestrator serves.
    #[must_use]
    pub const fn catalog(&self) -> &GroupCatalog {
        &self.catalog
    }

    pub(crate) fn definition(&self, slug: &str) -> Result<&GroupDefinition, ConcordError> {
        self.catalog
            .get(slug)
            .ok_or_else(|| ConcordError::not_found(format!("merge group {slug}")))
    }

    /// Providers whose source is mapped in `def`, in registration order.
    pub(crate) fn eligible(&self, def: &GroupDefinition) -> Vec<Arc<dyn SeriesProvider>> {
        self.providers
            .iter()
            .filter(|p| def.sources.iter().any(|m| &m.source == p.source()))
            .cloned()
            .collect()
    }

    /// Wrap a provider future with a timeout and standardized timeout error mapping.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "concord::core::provider_call_with_timeout",
            skip(fut, source),
            fields(
                source_id = %source,
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            ),
        )
    )]
    pub(crate) async fn provider_call_with_timeout<T, Fut>(
        source: &SourceId,
        timeout: Duration,
        fut: Fut,
    ) -> Result<T, ConcordError>
    where
        Fut: std::future::Future<Output = Result<T, ConcordError>>,
    {
        (tokio::time::timeout(timeout, fut).await)
            .unwrap_or_else(|_| Err(ConcordError::provider_timeout(source.as_str())))
    }
}

/// Apply an optional overall deadline to a future.
///
/// # Errors
/// Returns `RequestTimeout` for `group` when the deadline passes first.
pub(crate) async fn with_request_deadline<F, T>(
    group: &str,
    deadline: Option<Duration>,
    fut: F,
) -> Result<T, ConcordError>
where
    F: std::future::Future<Output = T>,
{
    match deadline {
        Some(d) => tokio::time::timeout(d, fut)
            .await
            .map_err(|_| ConcordError::request_timeout(group)),
        None => Ok(fut.await),
    }
}
