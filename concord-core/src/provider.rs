use async_trait::async_trait;

use concord_types::{ConcordError, MergeGroup, MergedView, RawObservation, SeriesRequest, SourceId};

/// Read interface: yields one source's raw observations for a merge group.
///
/// Implemented by the surrounding application on top of whatever store or
/// vendor API houses the data. Implementations should return only
/// observations inside the requested range, with caller-localized dates.
#[async_trait]
pub trait SeriesProvider: Send + Sync {
    /// Source this provider serves.
    fn source(&self) -> &SourceId;

    /// Fetch raw observations for `req.group` within the requested range.
    async fn observations(&self, req: &SeriesRequest)
    -> Result<Vec<RawObservation>, ConcordError>;
}

/// Write interface: accepts a merged view for display or persistence.
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Store or forward a computed view. A later view for the same group and
    /// range supersedes an earlier one.
    async fn store(
        &self,
        group: &MergeGroup,
        req: &SeriesRequest,
        view: &MergedView,
    ) -> Result<(), ConcordError>;
}
