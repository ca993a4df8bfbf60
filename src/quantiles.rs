use crate::confidence::confidence_band;
use crate::error::Result;
use crate::thinning::thin;
use crate::types::{neg_log10, ConfidenceBandPoint, QqPoint};

/// Everything the QQ renderer needs.
#[derive(Debug, Clone)]
pub struct QqLayout {
    /// Thinned (expected, observed) pairs in input order
    pub points: Vec<QqPoint>,
    pub band: Vec<ConfidenceBandPoint>,
    /// Shared range of both axes
    pub axis_range: (f64, f64),
    /// Number of p-values before thinning
    pub n: usize,
}

/// Ordinal ranks (1-based) of `p_values` in ascending order; ties are ranked by
/// their position in the input.
pub fn ordinal_ranks(p_values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..p_values.len()).collect();
    order.sort_by(|&a, &b| p_values[a].total_cmp(&p_values[b]));

    let mut ranks = vec![0; p_values.len()];
    for (rank, idx) in order.into_iter().enumerate() {
        ranks[idx] = rank + 1;
    }
    ranks
}

/// Expected and observed -log10(p) per input value, in input order.
///
/// expected = -log10((rank - 0.5) / n)
pub fn qq_points(p_values: &[f64]) -> Vec<QqPoint> {
    let n = p_values.len() as f64;
    ordinal_ranks(p_values)
        .into_iter()
        .zip(p_values)
        .map(|(rank, &p)| QqPoint {
            expected: neg_log10((rank as f64 - 0.5) / n),
            observed: neg_log10(p),
        })
        .collect()
}

/// Shared axis range: [min - 0.5, max + 1] over both coordinates.
pub fn axis_range(points: &[QqPoint]) -> (f64, f64) {
    if points.is_empty() {
        return (-0.5, 1.0);
    }
    let (lo, hi) = points.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
        (lo.min(p.expected).min(p.observed), hi.max(p.expected).max(p.observed))
    });
    (lo - 0.5, hi + 1.0)
}

/// Rank, thin and bound the QQ data, and compute its confidence band.
pub fn prepare_qq(p_values: &[f64], conf_points: usize, conf_alpha: f64) -> Result<QqLayout> {
    let n = p_values.len();
    let band = confidence_band(n, conf_points, conf_alpha)?;
    let points = thin(&qq_points(p_values));
    let axis_range = axis_range(&points);

    Ok(QqLayout {
        points,
        band,
        axis_range,
        n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ordinal_ranks_ties_by_input_order() {
        assert_eq!(ordinal_ranks(&[0.3, 0.1, 0.3, 0.2]), vec![3, 1, 4, 2]);
    }

    #[test]
    fn test_qq_points_five_values() {
        let points = qq_points(&[0.1, 0.2, 0.3, 0.4, 0.5]);
        assert_relative_eq!(points[0].expected, 1.0, epsilon = 1e-12);
        assert_relative_eq!(points[0].observed, 1.0, epsilon = 1e-12);
        // Largest p-value gets the last rank
        assert_relative_eq!(points[4].expected, -(0.9f64).log10(), epsilon = 1e-12);
    }

    #[test]
    fn test_qq_points_unsorted_input() {
        let points = qq_points(&[0.5, 0.1]);
        assert_relative_eq!(points[1].expected, -(0.25f64).log10(), epsilon = 1e-12);
        assert_relative_eq!(points[0].expected, -(0.75f64).log10(), epsilon = 1e-12);
    }

    #[test]
    fn test_axis_range() {
        let points = vec![
            QqPoint { expected: 0.2, observed: 0.1 },
            QqPoint { expected: 3.0, observed: 5.0 },
        ];
        let (lo, hi) = axis_range(&points);
        assert_relative_eq!(lo, -0.4, epsilon = 1e-12);
        assert_relative_eq!(hi, 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_prepare_qq_degenerate() {
        let layout = prepare_qq(&[], 1500, 0.05).unwrap();
        assert!(layout.points.is_empty());
        assert!(layout.band.is_empty());

        let layout = prepare_qq(&[0.3], 1500, 0.05).unwrap();
        assert_eq!(layout.points.len(), 1);
        assert!(layout.band.is_empty());
    }

    #[test]
    fn test_prepare_qq_thins_ties() {
        // Expected values of neighbouring high ranks differ by less than 0.0005
        let p: Vec<f64> = vec![0.5; 5000];
        let layout = prepare_qq(&p, 1500, 0.05).unwrap();
        assert_eq!(layout.n, 5000);
        assert_eq!(layout.band.len(), 1500);
        assert!(layout.points.len() < 5000);
    }

    #[test]
    fn test_prepare_qq_band_covers_ranks() {
        let p: Vec<f64> = (1..=10).map(|i| i as f64 / 10.0).collect();

        let layout = prepare_qq(&p, 1500, 0.05).unwrap();
        assert_eq!(layout.band.len(), 9);
        for (i, point) in layout.band.iter().enumerate() {
            let rank = (i + 1) as f64;
            assert_relative_eq!(point.expected, -((rank - 0.5) / 10.0).log10(), epsilon = 1e-12);
            assert!(point.upper < point.lower);
        }

        let layout = prepare_qq(&p, 3, 0.05).unwrap();
        assert_eq!(layout.band.len(), 3);
        assert_relative_eq!(layout.band[2].expected, -(0.25f64).log10(), epsilon = 1e-12);
    }
}
