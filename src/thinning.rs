use std::collections::HashSet;
use std::hash::Hash;

use crate::types::{Grouped, QqPoint};

/// Number of decimal digits kept when thinning.
pub const THIN_DIGITS: i32 = 3;

fn to_millis(x: f64) -> i64 {
    (x * 10f64.powi(THIN_DIGITS)).round() as i64
}

fn from_millis(m: i64) -> f64 {
    m as f64 / 10f64.powi(THIN_DIGITS)
}

/// A point that can be thinned: it has an exact rounded key and can be replaced
/// by its rounded form.
pub trait Thin: Sized {
    type Key: Eq + Hash;

    fn thin_key(&self) -> Self::Key;

    fn rounded(&self) -> Self;
}

impl Thin for QqPoint {
    type Key = (i64, i64);

    fn thin_key(&self) -> Self::Key {
        (to_millis(self.observed), to_millis(self.expected))
    }

    fn rounded(&self) -> Self {
        let (obs, exp) = self.thin_key();
        QqPoint {
            expected: from_millis(exp),
            observed: from_millis(obs),
        }
    }
}

impl<G: Clone + Eq + Hash> Thin for Grouped<G> {
    type Key = ((i64, i64), G);

    fn thin_key(&self) -> Self::Key {
        (self.point.thin_key(), self.group.clone())
    }

    fn rounded(&self) -> Self {
        Grouped {
            point: self.point.rounded(),
            group: self.group.clone(),
        }
    }
}

/// Round every point to three decimals and drop exact duplicates, keeping the
/// first occurrence of each. Order-preserving and idempotent.
pub fn thin<T: Thin>(points: &[T]) -> Vec<T> {
    let mut seen = HashSet::with_capacity(points.len());
    points
        .iter()
        .filter(|p| seen.insert(p.thin_key()))
        .map(|p| p.rounded())
        .collect()
}
