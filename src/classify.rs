use std::collections::HashSet;

use crate::types::{AnnotatedVariant, Category, ClassifiedAnnotation};

/// Annotated hits of two studies split by where they were found.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedAnnotations {
    pub on_both: Vec<ClassifiedAnnotation>,
    pub top_only: Vec<ClassifiedAnnotation>,
    pub bottom_only: Vec<ClassifiedAnnotation>,
}

impl ClassifiedAnnotations {
    /// All annotations: on_both first, then top_only, then bottom_only.
    pub fn iter(&self) -> impl Iterator<Item = &ClassifiedAnnotation> {
        self.on_both
            .iter()
            .chain(self.top_only.iter())
            .chain(self.bottom_only.iter())
    }

    pub fn len(&self) -> usize {
        self.on_both.len() + self.top_only.len() + self.bottom_only.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn tag(v: &AnnotatedVariant, category: Category) -> ClassifiedAnnotation {
    ClassifiedAnnotation {
        id: v.id.clone(),
        gene: v.gene.clone(),
        category,
    }
}

/// First occurrence of each variant id, in input order.
fn unique_by_id(variants: &[AnnotatedVariant]) -> Vec<&AnnotatedVariant> {
    let mut seen = HashSet::with_capacity(variants.len());
    variants.iter().filter(|v| seen.insert(v.id.as_str())).collect()
}

/// Partition the annotated hits of a top and a bottom study by variant id.
///
/// Variants present in both take their gene from the top set. Every id of the
/// union lands in exactly one category; an empty side passes the other side
/// through unchanged.
pub fn classify(top: &[AnnotatedVariant], bottom: &[AnnotatedVariant]) -> ClassifiedAnnotations {
    let top = unique_by_id(top);
    let bottom = unique_by_id(bottom);

    let top_ids: HashSet<&str> = top.iter().map(|v| v.id.as_str()).collect();
    let bottom_ids: HashSet<&str> = bottom.iter().map(|v| v.id.as_str()).collect();

    let mut out = ClassifiedAnnotations::default();
    for v in &top {
        if bottom_ids.contains(v.id.as_str()) {
            out.on_both.push(tag(v, Category::OnBoth));
        } else {
            out.top_only.push(tag(v, Category::TopOnly));
        }
    }
    out.bottom_only = bottom
        .iter()
        .filter(|v| !top_ids.contains(v.id.as_str()))
        .map(|v| tag(v, Category::BottomOnly))
        .collect();

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annots(ids: &[&str]) -> Vec<AnnotatedVariant> {
        ids.iter()
            .map(|id| AnnotatedVariant::new(*id, format!("GENE_{}", id)))
            .collect()
    }

    fn ids(v: &[ClassifiedAnnotation]) -> Vec<&str> {
        v.iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn test_classify_basic() {
        let out = classify(&annots(&["A", "B", "C"]), &annots(&["B", "C", "D"]));
        assert_eq!(ids(&out.on_both), vec!["B", "C"]);
        assert_eq!(ids(&out.top_only), vec!["A"]);
        assert_eq!(ids(&out.bottom_only), vec!["D"]);
        assert!(out.on_both.iter().all(|a| a.category == Category::OnBoth));
        assert_eq!(out.bottom_only[0].category, Category::BottomOnly);
    }

    #[test]
    fn test_on_both_takes_top_gene() {
        let top = vec![AnnotatedVariant::new("rs1", "TOPGENE")];
        let bottom = vec![AnnotatedVariant::new("rs1", "BOTTOMGENE")];
        let out = classify(&top, &bottom);
        assert_eq!(out.on_both[0].gene, "TOPGENE");
    }

    #[test]
    fn test_partition_of_union() {
        let top = annots(&["a", "b", "c", "d", "a"]);
        let bottom = annots(&["c", "d", "e", "f", "f"]);
        let out = classify(&top, &bottom);

        let union: HashSet<&str> = top.iter().chain(bottom.iter()).map(|v| v.id.as_str()).collect();
        assert_eq!(out.len(), union.len());

        let mut all: Vec<&str> = out.iter().map(|a| a.id.as_str()).collect();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), out.len(), "categories must be disjoint");
    }

    #[test]
    fn test_one_side_empty() {
        let out = classify(&annots(&["A", "B"]), &[]);
        assert!(out.on_both.is_empty());
        assert_eq!(ids(&out.top_only), vec!["A", "B"]);
        assert!(out.bottom_only.is_empty());

        let out = classify(&[], &annots(&["X"]));
        assert_eq!(ids(&out.bottom_only), vec!["X"]);
    }

    #[test]
    fn test_both_empty() {
        assert!(classify(&[], &[]).is_empty());
    }
}
