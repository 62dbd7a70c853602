use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the concord workspace.
///
/// Configuration problems are fatal for the call that hit them. Data-shape
/// issues such as unmapped sources are carried as warnings on the produced
/// view instead of aborting it. The remaining variants describe provider
/// fan-out failures in the async orchestrator.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConcordError {
    /// Merge configuration is unusable (zero factor, unsupported fusion method, malformed mapping).
    #[error("configuration error: {message}")]
    Configuration {
        /// Human-readable description of the configuration problem.
        message: String,
    },

    /// Raw observations arrived for a source with no mapping in the merge group.
    #[error("unmapped source {source_id} in group {group}: {dropped} observation(s) dropped")]
    UnmappedSource {
        /// Merge group slug being computed.
        group: String,
        /// Source identifier that has no mapping.
        source_id: String,
        /// Number of observations excluded from alignment.
        dropped: usize,
    },

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// A group, provider, or report could not be found.
    #[error("not found: {what}")]
    NotFound {
        /// Description of missing resource, e.g. "merge group body_weight".
        what: String,
    },

    /// An individual series provider returned an error.
    #[error("{source_id} failed: {msg}")]
    Provider {
        /// Source served by the failing provider.
        source_id: String,
        /// Human-readable error message.
        msg: String,
    },

    /// An individual provider call exceeded the configured timeout.
    #[error("provider timed out: {source_id}")]
    ProviderTimeout {
        /// Source served by the provider that timed out.
        source_id: String,
    },

    /// The overall request exceeded the configured deadline.
    #[error("request timed out: {group}")]
    RequestTimeout {
        /// Merge group slug being fetched.
        group: String,
    },

    /// All selected providers failed; contains the individual failures.
    #[error("all providers failed: {0:?}")]
    AllProvidersFailed(Vec<ConcordError>),

    /// All attempted providers timed out.
    #[error("all providers timed out: {group}")]
    AllProvidersTimedOut {
        /// Merge group slug being fetched.
        group: String,
    },

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),
}

impl ConcordError {
    /// Helper: build a `Configuration` error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Helper: build a `Provider` error with the source name and message.
    pub fn provider(source_id: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Provider {
            source_id: source_id.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `NotFound` error for a description of the missing resource.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Helper: build a `ProviderTimeout` error.
    pub fn provider_timeout(source_id: impl Into<String>) -> Self {
        Self::ProviderTimeout {
            source_id: source_id.into(),
        }
    }

    /// Helper: build a `RequestTimeout` error.
    pub fn request_timeout(group: impl Into<String>) -> Self {
        Self::RequestTimeout {
            group: group.into(),
        }
    }

    /// True for configuration errors, which are never worth retrying.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    /// Returns true if this error should be surfaced to users as actionable.
    ///
    /// Unmapped sources and benign not-found conditions are informational.
    /// Aggregates are classified based on their contents.
    #[must_use]
    pub fn is_actionable(&self) -> bool {
        match self {
            Self::UnmappedSource { .. } | Self::NotFound { .. } => false,
            Self::AllProvidersFailed(inner) => inner.iter().any(Self::is_actionable),
            _ => true,
        }
    }

    /// Flatten nested `AllProvidersFailed` structures into a plain vector.
    #[must_use]
    pub fn flatten(self) -> Vec<Self> {
        match self {
            Self::AllProvidersFailed(list) => list.into_iter().flat_map(Self::flatten).collect(),
            other => vec![other],
        }
    }
}

impl From<serde_json::Error> for ConcordError {
    fn from(e: serde_json::Error) -> Self {
        Self::config(format!("invalid catalog: {e}"))
    }
}
