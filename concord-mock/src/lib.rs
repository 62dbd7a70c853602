//! Mock providers and sinks for exercising the concord orchestrator without a backing store.
use async_trait::async_trait;
use concord_core::{ConcordError, RawObservation, SeriesProvider, SeriesRequest, SourceId};

mod dynamic;
/// Static fixture data and the matching group catalog.
pub mod fixtures;
mod sink;

pub use dynamic::{DynamicMockController, DynamicMockProvider, MockBehavior};
pub use sink::RecordingSink;

/// Source id that always fails.
pub const FAIL: &str = "FAIL";
/// Source id that stalls long enough to trip a short provider timeout.
pub const TIMEOUT: &str = "TIMEOUT";

/// Fixture-backed provider for one source. Serves deterministic data from static fixtures.
pub struct MockProvider {
    source: SourceId,
}

impl MockProvider {
    /// Provider serving the fixtures of `source`.
    pub fn new(source: impl Into<SourceId>) -> Self {
        Self {
            source: source.into(),
        }
    }

    async fn maybe_fail_or_timeout(&self) -> Result<(), ConcordError> {
        match self.source.as_str() {
            FAIL => Err(ConcordError::provider(
                FAIL,
                "forced failure: observations",
            )),
            TIMEOUT => {
                // Keep short to avoid slowing tests excessively.
                tokio::time::sleep(std::time::Duration::from_millis(200)).await;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl SeriesProvider for MockProvider {
    fn source(&self) -> &SourceId {
        &self.source
    }

    async fn observations(
        &self,
        req: &SeriesRequest,
    ) -> Result<Vec<RawObservation>, ConcordError> {
        self.maybe_fail_or_timeout().await?;
        let Some(series) = fixtures::series(&req.group, self.source.as_str()) else {
            return Err(ConcordError::not_found(format!(
                "{} series from {}",
                req.group, self.source
            )));
        };
        Ok(series
            .into_iter()
            .filter(|o| req.contains(o.date))
            .collect())
    }
}
