use statrs::distribution::{ContinuousCDF, StudentsT};

use super::finite;

/// Two-sided 95% critical value of the standard normal distribution.
pub const FISHER_Z_95: f64 = 1.96;

/// 95% confidence interval for Pearson r via the Fisher z-transform.
///
/// `None` when `n < 4`, where the standard error `1 / sqrt(n - 3)` is undefined.
#[must_use]
pub fn fisher_interval(r: f64, n: usize) -> Option<(f64, f64)> {
    if n < 4 || !r.is_finite() {
        return None;
    }
    let z = r.clamp(-1.0, 1.0).atanh();
    #[allow(clippy::cast_precision_loss)]
    let se = 1.0 / ((n - 3) as f64).sqrt();
    let lower = finite((z - FISHER_Z_95 * se).tanh())?;
    let upper = finite((z + FISHER_Z_95 * se).tanh())?;
    Some((lower, upper))
}

/// Two-tailed p-value of Pearson r under a Student t test with `n - 2` degrees of freedom.
///
/// `None` when `n < 3`. Perfect correlation yields `0.0`.
#[must_use]
pub fn pearson_p_value(r: f64, n: usize) -> Option<f64> {
    if n < 3 || !r.is_finite() {
        return None;
    }
    let r = r.clamp(-1.0, 1.0);
    let residual = 1.0 - r * r;
    if residual <= 0.0 {
        return Some(0.0);
    }
    #[allow(clippy::cast_precision_loss)]
    let df = (n - 2) as f64;
    let t = r * df.sqrt() / residual.sqrt();
    let dist = StudentsT::new(0.0, 1.0, df).ok()?;
    finite((2.0 * dist.sf(t.abs())).clamp(0.0, 1.0))
}
