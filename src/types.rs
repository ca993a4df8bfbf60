/// Gene label used when the annotation lookup found nothing.
pub const MISSING_GENE: &str = "NA";

/// Genome-wide significance threshold (p-value).
pub const GENOME_WIDE_P: f64 = 5e-8;

/// Suggestive significance threshold (p-value).
pub const SUGGESTIVE_P: f64 = 1e-5;

/// One row of an association-results table.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantRecord {
    pub chrom: String,
    pub pos: u64,
    pub id: String,
    pub p_value: f64,

    // Optional summary statistics
    pub allele1: Option<String>,
    pub allele2: Option<String>,
    pub allele_freq: Option<f64>,
    pub effect_size: Option<f64>,
    pub std_err: Option<f64>,
    pub sample_size: Option<u64>,
}

impl VariantRecord {
    /// Record with only the required columns set.
    pub fn new(chrom: impl Into<String>, pos: u64, id: impl Into<String>, p_value: f64) -> Self {
        Self {
            chrom: chrom.into(),
            pos,
            id: id.into(),
            p_value,
            allele1: None,
            allele2: None,
            allele_freq: None,
            effect_size: None,
            std_err: None,
            sample_size: None,
        }
    }

    pub fn neg_log10_p(&self) -> f64 {
        neg_log10(self.p_value)
    }
}

/// -log10 of a p-value.
pub fn neg_log10(p: f64) -> f64 {
    -p.log10()
}

/// A variant with the gene name found for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedVariant {
    pub id: String,
    pub gene: String,
}

impl AnnotatedVariant {
    pub fn new(id: impl Into<String>, gene: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            gene: gene.into(),
        }
    }

    pub fn is_missing_gene(&self) -> bool {
        self.gene == MISSING_GENE
    }
}

/// Placement of one chromosome on the genome-wide axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromosomeLayout {
    pub chrom: String,
    /// Largest position observed on this chromosome
    pub length: u64,
    /// Sum of the lengths of every chromosome placed before this one
    pub offset: u64,
}

/// Which study a Miami plot point belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    Top,
    Bottom,
}

/// A variant placed on the genome-wide axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlottablePoint {
    pub relative_pos: u64,
    pub neg_log10_p: f64,
    /// Index into `GenomeLayout::chromosomes()`
    pub chrom_index: usize,
    /// Row index into the table the point came from
    pub source: usize,
    pub origin: Option<Origin>,
}

/// Category of an annotated variant when comparing two studies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    OnBoth,
    TopOnly,
    BottomOnly,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::OnBoth => "on_both",
            Category::TopOnly => "top_only",
            Category::BottomOnly => "bottom_only",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedAnnotation {
    pub id: String,
    pub gene: String,
    pub category: Category,
}

/// One rank of the QQ confidence envelope, all values in -log10 space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceBandPoint {
    pub expected: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Expected vs observed -log10(p) for one variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QqPoint {
    pub expected: f64,
    pub observed: f64,
}

/// A QQ point tagged with a group label.
#[derive(Debug, Clone, PartialEq)]
pub struct Grouped<G> {
    pub point: QqPoint,
    pub group: G,
}
