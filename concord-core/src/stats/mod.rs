//! Pairwise agreement statistics.
//!
//! All reductions run sequentially left to right so results are reproducible
//! bit for bit for a given input order. Undefined statistics come back as
//! `None`; no `NaN` or infinity escapes.

mod correlation;
mod describe;
mod rank;
mod significance;

pub use correlation::{CorrelationStats, correlate};
pub use describe::{PairMoments, is_constant, mean};
pub use rank::average_ranks;
pub use significance::{FISHER_Z_95, fisher_interval, pearson_p_value};

pub(crate) fn finite(x: f64) -> Option<f64> {
    x.is_finite().then_some(x)
}
