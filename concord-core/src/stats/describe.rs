/// Arithmetic mean; `None` for an empty slice.
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: f64 = values.iter().sum();
    #[allow(clippy::cast_precision_loss)]
    let n = values.len() as f64;
    Some(sum / n)
}

/// True when every value equals the first one exactly (zero variance).
#[must_use]
pub fn is_constant(values: &[f64]) -> bool {
    values.first().is_none_or(|v0| values.iter().all(|v| v == v0))
}

/// Population moments of two equally long vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairMoments {
    /// Mean of `a`.
    pub mean_a: f64,
    /// Mean of `b`.
    pub mean_b: f64,
    /// Population variance of `a`.
    pub var_a: f64,
    /// Population variance of `b`.
    pub var_b: f64,
    /// Population covariance.
    pub cov: f64,
}

impl PairMoments {
    /// Compute moments; `None` for empty or mismatched input.
    #[must_use]
    pub fn new(a: &[f64], b: &[f64]) -> Option<Self> {
        if a.len() != b.len() {
            return None;
        }
        let mean_a = mean(a)?;
        let mean_b = mean(b)?;
        let mut var_a = 0.0;
        let mut var_b = 0.0;
        let mut cov = 0.0;
        for (x, y) in a.iter().zip(b) {
            let dx = x - mean_a;
            let dy = y - mean_b;
            var_a += dx * dx;
            var_b += dy * dy;
            cov += dx * dy;
        }
        #[allow(clippy::cast_precision_loss)]
        let n = a.len() as f64;
        Some(Self {
            mean_a,
            mean_b,
            var_a: var_a / n,
            var_b: var_b / n,
            cov: cov / n,
        })
    }

    /// Pearson r, clamped to `[-1, 1]`; `None` when either variance is zero.
    #[must_use]
    pub fn pearson(&self) -> Option<f64> {
        if self.var_a <= 0.0 || self.var_b <= 0.0 {
            return None;
        }
        super::finite((self.cov / (self.var_a * self.var_b).sqrt()).clamp(-1.0, 1.0))
    }

    /// Lin's concordance correlation coefficient.
    #[must_use]
    pub fn ccc(&self) -> Option<f64> {
        let shift = self.mean_a - self.mean_b;
        let denom = self.var_a + self.var_b + shift * shift;
        if self.var_a <= 0.0 || self.var_b <= 0.0 || denom <= 0.0 {
            return None;
        }
        super::finite(2.0 * self.cov / denom)
    }
}
