//! concord-core
//!
//! The pure computation behind multi-source merging:
//!
//! - `normalize`: linear unit conversion into a group's canonical unit.
//! - `align`: group normalized observations by calendar date in priority order.
//! - `resolve`: collapse one date's observations into a merged point.
//! - `fusion`: blend several same-date values.
//! - `stats`: pairwise agreement statistics between two sources.
//! - `view`: drive the above into a merged series and correlation report.
//! - `provider`: the read and write seams implemented by the surrounding application.
//!
//! Everything except `provider` is synchronous and side-effect free; calls
//! share no mutable state and may run concurrently.
#![warn(missing_docs)]

/// Date alignment of normalized observations.
pub mod align;
/// Blending of same-date values.
pub mod fusion;
/// Unit conversion.
pub mod normalize;
/// Read and write interfaces implemented by external collaborators.
pub mod provider;
/// Per-date resolution into merged points.
pub mod resolve;
/// Agreement statistics.
pub mod stats;
/// Merged view orchestration.
pub mod view;

pub use align::{Aligned, align, index_mappings};
pub use concord_types::*;
pub use fusion::fuse;
pub use normalize::{normalize, normalize_observation};
pub use provider::{ReportSink, SeriesProvider};
pub use resolve::{resolve, resolve_with};
pub use stats::{CorrelationStats, correlate};
pub use view::{PairedSeries, build_merged_view, build_merged_view_with, paired_series};
