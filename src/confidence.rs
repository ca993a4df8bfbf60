use rayon::prelude::*;
use statrs::distribution::{Beta, ContinuousCDF};

use crate::error::{GwasPlotError, Result};
use crate::types::{neg_log10, ConfidenceBandPoint};

/// Default number of ranks evaluated for the QQ envelope.
pub const DEFAULT_CONF_POINTS: usize = 1500;

/// Default two-sided significance level of the QQ envelope.
pub const DEFAULT_CONF_ALPHA: f64 = 0.05;

/// Pointwise confidence envelope for the QQ plot of `n` p-values under the null.
///
/// The i-th smallest of `n` uniform(0,1) draws follows Beta(i, n - i + 1), so for
/// ranks i = 1..=min(budget, n - 1):
///
/// * `expected = -log10((i - 0.5) / n)`
/// * `upper = -log10(Beta(i, n - i + 1).quantile(1 - alpha / 2))`
/// * `lower = -log10(Beta(i, n - i + 1).quantile(alpha / 2))`
///
/// `upper` comes from the upper p-value quantile and so is the smaller value in
/// -log10 space. Returns an empty band when `n <= 1`.
pub fn confidence_band(n: usize, budget: usize, alpha: f64) -> Result<Vec<ConfidenceBandPoint>> {
    if budget == 0 {
        return Err(GwasPlotError::InvalidBudget(budget));
    }
    if !(alpha > 0.0 && alpha <= 1.0) {
        return Err(GwasPlotError::InvalidAlpha(alpha));
    }
    if n <= 1 {
        return Ok(Vec::new());
    }

    let k = budget.min(n - 1);
    let n_f64 = n as f64;

    (1..=k)
        .into_par_iter()
        .map(|i| {
            let i_f64 = i as f64;
            let dist = Beta::new(i_f64, n_f64 - i_f64 + 1.0)
                .map_err(|e| GwasPlotError::Distribution(e.to_string()))?;
            Ok(ConfidenceBandPoint {
                expected: neg_log10((i_f64 - 0.5) / n_f64),
                upper: neg_log10(dist.inverse_cdf(1.0 - alpha / 2.0)),
                lower: neg_log10(dist.inverse_cdf(alpha / 2.0)),
            })
        })
        .collect()
}

/// Closed outline of the band for fill rendering: the `upper` values in order of
/// rank, then the `lower` values in reverse, giving `2 * points.len()` vertices.
pub fn band_polygon(points: &[ConfidenceBandPoint]) -> Vec<(f64, f64)> {
    let mut outline = Vec::with_capacity(points.len() * 2);
    outline.extend(points.iter().map(|p| (p.expected, p.upper)));
    outline.extend(points.iter().rev().map(|p| (p.expected, p.lower)));
    outline
}
