use std::collections::HashMap;

use crate::classify::ClassifiedAnnotations;
use crate::types::{AnnotatedVariant, Category, PlottablePoint, VariantRecord};

/// An annotated variant resolved to its point on the plot.
#[derive(Debug, Clone, PartialEq)]
pub struct Highlight {
    pub point: PlottablePoint,
    /// Index of `point` in the placed point list
    pub rank: usize,
    pub gene: String,
    pub category: Option<Category>,
}

fn join<'a, I>(points: &[PlottablePoint], records: &[VariantRecord], annotations: I) -> Vec<Highlight>
where
    I: IntoIterator<Item = (&'a str, &'a str, Option<Category>)>,
{
    let mut by_id: HashMap<&str, usize> = HashMap::with_capacity(points.len());
    for (rank, p) in points.iter().enumerate() {
        by_id.entry(records[p.source].id.as_str()).or_insert(rank);
    }

    let mut unresolved = 0usize;
    let mut out = Vec::new();
    for (id, gene, category) in annotations {
        match by_id.get(id) {
            Some(&rank) => out.push(Highlight {
                point: points[rank],
                rank,
                gene: gene.to_string(),
                category,
            }),
            None => unresolved += 1,
        }
    }

    if unresolved > 0 {
        log::debug!(
            "{} annotated variant(s) not found in the association table; not highlighted",
            unresolved
        );
    }
    out
}

/// Join an annotation table against placed points by variant id.
///
/// `points` must come from `GenomeLayout::place(records, ..)`. Annotations whose
/// id is missing from `records` are dropped.
pub fn resolve(
    points: &[PlottablePoint],
    records: &[VariantRecord],
    annotations: &[AnnotatedVariant],
) -> Vec<Highlight> {
    join(
        points,
        records,
        annotations
            .iter()
            .map(|a| (a.id.as_str(), a.gene.as_str(), None)),
    )
}

/// Like [`resolve`], keeping the category of each classified annotation.
pub fn resolve_classified(
    points: &[PlottablePoint],
    records: &[VariantRecord],
    annotations: &ClassifiedAnnotations,
) -> Vec<Highlight> {
    join(
        points,
        records,
        annotations
            .iter()
            .map(|a| (a.id.as_str(), a.gene.as_str(), Some(a.category))),
    )
}
