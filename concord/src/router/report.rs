use concord_core::{
    ConcordError, CorrelationResult, MergedView, ReportSink, SeriesRequest, ViewOptions,
};

use crate::Concord;

impl Concord {
    /// Correlation results for a group and date range, served from cache when fresh.
    ///
    /// Correlations depend only on the raw data, not on resolution preferences,
    /// so a miss computes the view with default options and caches the result.
    /// A report computed while some provider failed is returned uncached, so
    /// the next call fetches again.
    ///
    /// # Errors
    /// Same as [`Concord::merged_view`].
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "concord::router::report::correlation_report",
            skip(self, req),
            fields(group = %req.group),
        )
    )]
    pub async fn correlation_report(
        &self,
        req: &SeriesRequest,
    ) -> Result<Vec<CorrelationResult>, ConcordError> {
        req.validate()?;
        self.definition(&req.group)?;
        if let Some(hit) = self.cache.get(req).await {
            #[cfg(feature = "tracing")]
            tracing::debug!(rows = hit.len(), "correlation report served from cache");
            return Ok(hit.as_ref().clone());
        }
        Ok(self
            .merged_view(req, &ViewOptions::default())
            .await?
            .correlations)
    }

    /// Drop the cached correlation report for `req`.
    pub async fn invalidate(&self, req: &SeriesRequest) {
        self.cache.invalidate(req).await;
    }

    /// Compute the merged view and hand it to `sink`; returns the stored view.
    ///
    /// # Errors
    /// Same as [`Concord::merged_view`], plus whatever `sink` returns.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "concord::router::report::publish",
            skip(self, req, options, sink),
            fields(group = %req.group),
        )
    )]
    pub async fn publish(
        &self,
        req: &SeriesRequest,
        options: &ViewOptions,
        sink: &dyn ReportSink,
    ) -> Result<MergedView, ConcordError> {
        let view = self.merged_view(req, options).await?;
        let def = self.definition(&req.group)?;
        sink.store(&def.group, req, &view).await?;
        Ok(view)
    }
}
