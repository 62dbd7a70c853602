use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use concord_core::{ConcordError, MergeGroup, MergedView, ReportSink, SeriesRequest};

/// Sink that keeps every stored view in memory, latest last.
#[derive(Clone, Default)]
pub struct RecordingSink {
    stored: Arc<Mutex<Vec<(SeriesRequest, MergedView)>>>,
    fail_with: Option<ConcordError>,
}

impl RecordingSink {
    /// Empty sink that accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink that rejects every store with `err`.
    #[must_use]
    pub fn failing(err: ConcordError) -> Self {
        Self {
            stored: Arc::default(),
            fail_with: Some(err),
        }
    }

    /// Snapshot of everything stored so far.
    pub async fn stored(&self) -> Vec<(SeriesRequest, MergedView)> {
        self.stored.lock().await.clone()
    }

    /// Most recent view stored for `req`; later stores supersede earlier ones.
    pub async fn latest(&self, req: &SeriesRequest) -> Option<MergedView> {
        self.stored
            .lock()
            .await
            .iter()
            .rev()
            .find(|(r, _)| r == req)
            .map(|(_, v)| v.clone())
    }
}

#[async_trait]
impl ReportSink for RecordingSink {
    async fn store(
        &self,
        _group: &MergeGroup,
        req: &SeriesRequest,
        view: &MergedView,
    ) -> Result<(), ConcordError> {
        if let Some(e) = &self.fail_with {
            return Err(e.clone());
        }
        self.stored.lock().await.push((req.clone(), view.clone()));
        Ok(())
    }
}
