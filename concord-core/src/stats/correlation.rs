use chrono::NaiveDate;
use concord_types::{CorrelationResult, CorrelationStatus, SourceId};
use serde::{Deserialize, Serialize};

use super::describe::{PairMoments, is_constant};
use super::rank::average_ranks;
use super::significance::{fisher_interval, pearson_p_value};
use super::finite;

/// Agreement statistics for one paired series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrelationStats {
    /// Pearson product-moment correlation.
    pub pearson: Option<f64>,
    /// Spearman rank correlation.
    pub spearman: Option<f64>,
    /// Intraclass correlation, k = 2.
    pub icc: Option<f64>,
    /// Lin's concordance correlation coefficient.
    pub ccc: Option<f64>,
    /// Mean absolute error.
    pub mae: Option<f64>,
    /// Root-mean-square error.
    pub rmse: Option<f64>,
    /// Signed mean of `a - b`.
    pub mean_bias: Option<f64>,
    /// Two-tailed p-value for Pearson r.
    pub p_value: Option<f64>,
    /// Lower bound of the 95% interval for r.
    pub ci_lower: Option<f64>,
    /// Upper bound of the 95% interval for r.
    pub ci_upper: Option<f64>,
    /// Number of pairs.
    pub n: usize,
    /// `InsufficientData` when `n` is below the minimum.
    pub status: CorrelationStatus,
}

impl CorrelationStats {
    /// The all-null outcome for a pair with too few points.
    #[must_use]
    pub const fn insufficient(n: usize) -> Self {
        Self {
            pearson: None,
            spearman: None,
            icc: None,
            ccc: None,
            mae: None,
            rmse: None,
            mean_bias: None,
            p_value: None,
            ci_lower: None,
            ci_upper: None,
            n,
            status: CorrelationStatus::InsufficientData,
        }
    }

    /// Attach group, pair, and date range to build a report row.
    #[must_use]
    pub fn into_result(
        self,
        merge_group: &str,
        source_a: SourceId,
        source_b: SourceId,
        dates: Option<(NaiveDate, NaiveDate)>,
    ) -> CorrelationResult {
        CorrelationResult {
            merge_group: merge_group.to_string(),
            source_a,
            source_b,
            pearson: self.pearson,
            spearman: self.spearman,
            icc: self.icc,
            ccc: self.ccc,
            mae: self.mae,
            rmse: self.rmse,
            mean_bias: self.mean_bias,
            p_value: self.p_value,
            n: self.n,
            confidence_interval_lower: self.ci_lower,
            confidence_interval_upper: self.ci_upper,
            first_date: dates.map(|(first, _)| first),
            last_date: dates.map(|(_, last)| last),
            status: self.status,
            computed_at: None,
        }
    }
}

/// Compute agreement statistics over date-matched pairs `(a, b)`.
///
/// Fewer than `min_points` pairs (or none at all) is not an error: every
/// statistic is `None` and `n` holds the true count. If either side is
/// constant, the correlation-type statistics are `None` while MAE, RMSE and
/// mean bias are still reported.
#[must_use]
pub fn correlate(pairs: &[(f64, f64)], min_points: usize) -> CorrelationStats {
    let n = pairs.len();
    if n == 0 || n < min_points {
        return CorrelationStats::insufficient(n);
    }

    let a: Vec<f64> = pairs.iter().map(|&(x, _)| x).collect();
    let b: Vec<f64> = pairs.iter().map(|&(_, y)| y).collect();
    let (mae, rmse, mean_bias) = error_terms(pairs);

    let degenerate = n < 2 || is_constant(&a) || is_constant(&b);
    let (pearson, ccc) = if degenerate {
        (None, None)
    } else {
        PairMoments::new(&a, &b).map_or((None, None), |m| (m.pearson(), m.ccc()))
    };
    let spearman = if degenerate {
        None
    } else {
        PairMoments::new(&average_ranks(&a), &average_ranks(&b)).and_then(|m| m.pearson())
    };
    let icc = if degenerate { None } else { icc_k2(&a, &b) };

    let (ci_lower, ci_upper) = pearson
        .and_then(|r| fisher_interval(r, n))
        .map_or((None, None), |(lo, hi)| (Some(lo), Some(hi)));
    let p_value = pearson.and_then(|r| pearson_p_value(r, n));

    CorrelationStats {
        pearson,
        spearman,
        icc,
        ccc,
        mae,
        rmse,
        mean_bias,
        p_value,
        ci_lower,
        ci_upper,
        n,
        status: CorrelationStatus::Computed,
    }
}

fn error_terms(pairs: &[(f64, f64)]) -> (Option<f64>, Option<f64>, Option<f64>) {
    let mut abs_sum = 0.0;
    let mut sq_sum = 0.0;
    let mut diff_sum = 0.0;
    for &(x, y) in pairs {
        let d = x - y;
        abs_sum += d.abs();
        sq_sum += d * d;
        diff_sum += d;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = pairs.len() as f64;
    (
        finite(abs_sum / n),
        finite((sq_sum / n).sqrt()),
        finite(diff_sum / n),
    )
}

/// `(MSB - MSW) / (MSB + (k - 1) MSW)` with k = 2, dates as subjects.
fn icc_k2(a: &[f64], b: &[f64]) -> Option<f64> {
    const K: f64 = 2.0;
    let n = a.len();
    if n < 2 {
        return None;
    }
    let mut grand = 0.0;
    for (x, y) in a.iter().zip(b) {
        grand += x + y;
    }
    #[allow(clippy::cast_precision_loss)]
    let nf = n as f64;
    grand /= nf * K;

    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for (x, y) in a.iter().zip(b) {
        let subject = (x + y) / K;
        let d = subject - grand;
        ss_between += K * d * d;
        let dx = x - subject;
        let dy = y - subject;
        ss_within += dx * dx + dy * dy;
    }
    let ms_between = ss_between / (nf - 1.0);
    let ms_within = ss_within / (nf * (K - 1.0));
    let denom = ms_between + (K - 1.0) * ms_within;
    if denom <= 0.0 {
        return None;
    }
    finite((ms_between - ms_within) / denom)
}
