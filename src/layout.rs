use std::cmp::Ordering;
use std::collections::HashMap;

use crate::error::{GwasPlotError, Result};
use crate::types::{ChromosomeLayout, Origin, PlottablePoint, VariantRecord};

/// Traversal order over chromosome identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChromOrder {
    /// Ascending, numeric-aware: chr1 < chr2 < ... < chr10 < chrX
    #[default]
    Natural,
    /// Order of first appearance in the input
    FirstSeen,
    /// Caller-supplied order; records on other chromosomes are rejected
    Explicit(Vec<String>),
}

/// Axis tick for one chromosome.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    pub chrom: String,
    pub center: f64,
}

/// Natural chromosome sort: chr1 < chr2 < ... < chr10 < chrX
pub fn natural_chrom_cmp(a: &str, b: &str) -> Ordering {
    let a_num = extract_chrom_number(a);
    let b_num = extract_chrom_number(b);
    match (a_num, b_num) {
        (Some(an), Some(bn)) => an.cmp(&bn),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

fn extract_chrom_number(chrom: &str) -> Option<u64> {
    let stripped = chrom
        .strip_prefix("chr")
        .or_else(|| chrom.strip_prefix("Chr"))
        .or_else(|| chrom.strip_prefix("CHR"))
        .unwrap_or(chrom);
    stripped.parse::<u64>().ok()
}

/// Chromosomes laid end to end on one genome-wide axis.
#[derive(Debug, Clone)]
pub struct GenomeLayout {
    chromosomes: Vec<ChromosomeLayout>,
    lookup: HashMap<String, usize>,
}

impl GenomeLayout {
    /// Build the layout from every record that will be plotted on this axis.
    ///
    /// Chromosome lengths are the largest position observed per chromosome, so
    /// passing the records of two studies together yields aligned boundaries.
    pub fn from_records<'a, I>(records: I, order: &ChromOrder) -> Result<Self>
    where
        I: IntoIterator<Item = &'a VariantRecord>,
    {
        let mut max_pos: HashMap<&str, u64> = HashMap::new();
        let mut first_seen: Vec<&str> = Vec::new();

        for r in records {
            let m = max_pos.entry(r.chrom.as_str()).or_insert_with(|| {
                first_seen.push(r.chrom.as_str());
                r.pos
            });
            *m = (*m).max(r.pos);
        }

        let ordered: Vec<String> = match order {
            ChromOrder::Natural => {
                let mut chroms: Vec<String> = first_seen.iter().map(|c| c.to_string()).collect();
                chroms.sort_by(|a, b| natural_chrom_cmp(a, b));
                chroms
            }
            ChromOrder::FirstSeen => first_seen.iter().map(|c| c.to_string()).collect(),
            ChromOrder::Explicit(explicit) => {
                if let Some(unknown) = first_seen.iter().find(|c| !explicit.iter().any(|e| e.as_str() == **c)) {
                    return Err(GwasPlotError::UnknownChromosome(unknown.to_string()));
                }
                explicit
                    .iter()
                    .filter(|c| max_pos.contains_key(c.as_str()))
                    .cloned()
                    .collect()
            }
        };

        let mut chromosomes = Vec::with_capacity(ordered.len());
        let mut lookup = HashMap::with_capacity(ordered.len());
        let mut offset = 0u64;
        for chrom in ordered {
            // Explicit orders may repeat a name; the first slot wins
            if lookup.contains_key(&chrom) {
                continue;
            }
            let length = max_pos[chrom.as_str()];
            lookup.insert(chrom.clone(), chromosomes.len());
            chromosomes.push(ChromosomeLayout {
                chrom,
                length,
                offset,
            });
            offset += length;
        }

        Ok(Self {
            chromosomes,
            lookup,
        })
    }

    pub fn chromosomes(&self) -> &[ChromosomeLayout] {
        &self.chromosomes
    }

    pub fn is_empty(&self) -> bool {
        self.chromosomes.is_empty()
    }

    pub fn index_of(&self, chrom: &str) -> Option<usize> {
        self.lookup.get(chrom).copied()
    }

    /// Total span of the axis (sum of all chromosome lengths).
    pub fn genome_length(&self) -> u64 {
        self.chromosomes
            .last()
            .map(|c| c.offset + c.length)
            .unwrap_or(0)
    }

    pub fn relative_position(&self, chrom: &str, pos: u64) -> Result<u64> {
        let idx = self
            .index_of(chrom)
            .ok_or_else(|| GwasPlotError::UnknownChromosome(chrom.to_string()))?;
        Ok(pos + self.chromosomes[idx].offset)
    }

    /// Place every record on the axis, sorted by chromosome order then position.
    pub fn place(&self, records: &[VariantRecord], origin: Option<Origin>) -> Result<Vec<PlottablePoint>> {
        let mut points = Vec::with_capacity(records.len());
        for (i, r) in records.iter().enumerate() {
            let chrom_index = self
                .index_of(&r.chrom)
                .ok_or_else(|| GwasPlotError::UnknownChromosome(r.chrom.clone()))?;
            points.push(PlottablePoint {
                relative_pos: r.pos + self.chromosomes[chrom_index].offset,
                neg_log10_p: r.neg_log10_p(),
                chrom_index,
                source: i,
                origin,
            });
        }
        // Stable sort keeps input order among identical positions
        points.sort_by_key(|p| (p.chrom_index, p.relative_pos));
        Ok(points)
    }

    /// Tick position for each chromosome present in `points`: the midpoint
    /// between its smallest and largest x value, rounded half to even.
    pub fn axis_ticks(&self, points: &[PlottablePoint], x_of: impl Fn(usize, &PlottablePoint) -> f64) -> Vec<AxisTick> {
        let mut bounds: Vec<Option<(f64, f64)>> = vec![None; self.chromosomes.len()];
        for (i, p) in points.iter().enumerate() {
            let x = x_of(i, p);
            let b = &mut bounds[p.chrom_index];
            *b = Some(match *b {
                Some((lo, hi)) => (lo.min(x), hi.max(x)),
                None => (x, x),
            });
        }

        bounds
            .into_iter()
            .enumerate()
            .filter_map(|(idx, b)| {
                b.map(|(lo, hi)| AxisTick {
                    chrom: self.chromosomes[idx].chrom.clone(),
                    center: ((lo + hi) / 2.0).round_ties_even(),
                })
            })
            .collect()
    }
}

/// x value of a point on the genome-wide axis.
pub fn genomic_x(_: usize, p: &PlottablePoint) -> f64 {
    p.relative_pos as f64
}

/// x value of a point when variants are spaced evenly by their rank.
pub fn ordinal_x(i: usize, _: &PlottablePoint) -> f64 {
    i as f64
}
