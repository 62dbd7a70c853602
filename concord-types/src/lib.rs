//! Concord-specific configuration primitives and data transfer objects.
#![warn(missing_docs)]

mod attribution;
mod catalog;
mod config;
mod error;
mod observation;
mod reports;
mod request;
mod source;

pub use attribution::{Attribution, Span};
pub use catalog::{GroupCatalog, GroupDefinition};
pub use config::{
    CorrelationSettings, DEFAULT_MIN_DATA_POINTS, FusionMethod, MergeGroup, ResolutionPolicy,
    SourceMapping, UserMergePreference, ViewOptions, WeightTable,
};
pub use error::ConcordError;
pub use observation::{MergeMethod, MergedPoint, NormalizedObservation, RawObservation};
pub use reports::{CorrelationResult, CorrelationStatus, MergedView};
pub use request::{RawSeries, SeriesRequest};
pub use source::SourceId;
