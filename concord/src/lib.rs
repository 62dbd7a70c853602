//! Concord merges one measured quantity reported by several sources into a
//! single daily series and reports how well the sources agree.
//!
//! Overview
//! - Fetches raw series concurrently from providers implementing
//!   `concord_core::SeriesProvider`, one per upstream source.
//! - Normalizes, aligns, and resolves them with `concord_core` according to
//!   the group catalog and the caller's `ViewOptions`.
//! - Caches correlation reports per group and date range.
//!
//! Key behaviors and trade-offs
//! - Partial failure: a provider that errors or times out is dropped from the
//!   merge and reported in `MergedView::warnings`. Only when no provider
//!   delivers data does the call fail.
//! - Timeouts: every provider call is bounded by `provider_timeout`; an
//!   optional `request_timeout` bounds the whole fan-out and discards partial
//!   results when it fires.
//! - Caching: `correlation_report` may serve results up to `cache_ttl` old.
//!   `merged_view` always recomputes and refreshes the cache entry.
//!
//! Examples
//! ```rust,ignore
//! use std::sync::Arc;
//! use concord::{Concord, ResolutionPolicy, SeriesRequest, ViewOptions, FusionMethod};
//! use concord_mock::{MockProvider, fixtures};
//!
//! let concord = Concord::builder()
//!     .with_catalog(fixtures::catalog())
//!     .with_provider(Arc::new(MockProvider::new("scale_api")))
//!     .with_provider(Arc::new(MockProvider::new("wearable_api")))
//!     .build()?;
//!
//! let req = SeriesRequest::new("body_weight");
//! let fused = ViewOptions::new(ResolutionPolicy::Fuse(FusionMethod::Median));
//! let view = concord.merged_view(&req, &fused).await?;
//! let report = concord.correlation_report(&req).await?;
//! ```
//!
//! See `concord/examples/` for runnable end-to-end demonstrations.
#![warn(missing_docs)]

mod config;
pub(crate) mod core;
mod router;

pub use config::{
    ConcordConfig, DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL, DEFAULT_PROVIDER_TIMEOUT,
};
pub use crate::core::{Concord, ConcordBuilder};
pub use router::util::{collapse_errors, join_with_deadline};

// Re-export core types for convenience
pub use concord_core::{
    Attribution, ConcordError, CorrelationResult, CorrelationSettings, CorrelationStatus,
    FusionMethod, GroupCatalog, GroupDefinition, MergeGroup, MergeMethod, MergedPoint,
    MergedView, RawObservation, RawSeries, ReportSink, ResolutionPolicy, SeriesProvider,
    SeriesRequest, SourceId, SourceMapping, Span, UserMergePreference, ViewOptions, WeightTable,
};
