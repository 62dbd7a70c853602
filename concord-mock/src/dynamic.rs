use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use concord_core::{ConcordError, RawObservation, SeriesProvider, SeriesRequest, SourceId};

/// Instruction for how `observations` should behave for a given group.
#[derive(Clone)]
pub enum MockBehavior {
    /// Return the provided observations, filtered to the requested range.
    Return(Vec<RawObservation>),
    /// Fail immediately with the provided error.
    Fail(ConcordError),
    /// Hang indefinitely (simulate a timeout).
    Hang,
}

#[derive(Default)]
struct InternalState {
    rules: HashMap<String, MockBehavior>,
    requests: Vec<SeriesRequest>,
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockController {
    /// Set the behavior for `observations` calls for a merge group.
    pub async fn set_behavior(&self, group: impl Into<String>, behavior: MockBehavior) {
        let mut guard = self.state.lock().await;
        guard.rules.insert(group.into(), behavior);
    }

    /// Requests received so far, in call order.
    pub async fn requests(&self) -> Vec<SeriesRequest> {
        self.state.lock().await.requests.clone()
    }

    /// Number of `observations` calls received so far.
    pub async fn call_count(&self) -> usize {
        self.state.lock().await.requests.len()
    }
}

/// Provider whose behavior is scripted per group at runtime.
///
/// Groups without a rule yield `NotFound`.
pub struct DynamicMockProvider {
    source: SourceId,
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockProvider {
    /// Create a provider for `source` and the controller that scripts it.
    pub fn new_with_controller(
        source: impl Into<SourceId>,
    ) -> (Arc<Self>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let provider = Arc::new(Self {
            source: source.into(),
            state: Arc::clone(&state),
        });
        (provider, DynamicMockController { state })
    }
}

#[async_trait]
impl SeriesProvider for DynamicMockProvider {
    fn source(&self) -> &SourceId {
        &self.source
    }

    async fn observations(
        &self,
        req: &SeriesRequest,
    ) -> Result<Vec<RawObservation>, ConcordError> {
        let rule = {
            let mut guard = self.state.lock().await;
            guard.requests.push(req.clone());
            guard.rules.get(&req.group).cloned()
        };
        match rule {
            Some(MockBehavior::Return(obs)) => Ok(obs
                .into_iter()
                .filter(|o| req.contains(o.date))
                .collect()),
            Some(MockBehavior::Fail(e)) => Err(e),
            Some(MockBehavior::Hang) => std::future::pending().await,
            None => Err(ConcordError::not_found(format!(
                "{} series from {}",
                req.group, self.source
            ))),
        }
    }
}
