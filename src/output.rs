use std::path::{Path, PathBuf};

use csv::WriterBuilder;

use crate::error::{GwasPlotError, Result};
use crate::types::{AnnotatedVariant, VariantRecord};

fn missing(column: &str, path: &Path) -> GwasPlotError {
    GwasPlotError::MissingColumn {
        column: column.to_string(),
        path: PathBuf::from(path),
    }
}

/// Write the `.ma` summary-statistics file consumed by COJO stepwise selection:
/// tab-separated `SNP A1 A2 freq b se p N`.
///
/// Every record must carry the optional columns. All records are checked before
/// the file is created; the first one that fails aborts with `MissingColumn`
/// naming the absent field and nothing is written.
pub fn write_cojo_input(records: &[VariantRecord], path: &Path) -> Result<()> {
    let rows = records
        .iter()
        .map(|r| cojo_row(r, path))
        .collect::<Result<Vec<_>>>()?;

    let mut wtr = WriterBuilder::new().delimiter(b'\t').from_path(path)?;

    wtr.write_record(["SNP", "A1", "A2", "freq", "b", "se", "p", "N"])?;
    for row in &rows {
        wtr.write_record(row)?;
    }

    wtr.flush()?;
    Ok(())
}

fn cojo_row(r: &VariantRecord, path: &Path) -> Result<[String; 8]> {
    let a1 = r.allele1.as_deref().ok_or_else(|| missing("A1", path))?;
    let a2 = r.allele2.as_deref().ok_or_else(|| missing("A2", path))?;
    let freq = r.allele_freq.ok_or_else(|| missing("freq", path))?;
    let b = r.effect_size.ok_or_else(|| missing("b", path))?;
    let se = r.std_err.ok_or_else(|| missing("se", path))?;
    let n = r.sample_size.ok_or_else(|| missing("N", path))?;

    Ok([
        r.id.clone(),
        a1.to_string(),
        a2.to_string(),
        freq.to_string(),
        b.to_string(),
        se.to_string(),
        format!("{:e}", r.p_value),
        n.to_string(),
    ])
}

/// Write an annotated-hits table (tab-separated `SNP GENE`), the
/// `snps_annotated.tsv` file read back by `load_annotation_table`.
pub fn write_annotations(annotations: &[AnnotatedVariant], path: &Path) -> Result<()> {
    let mut wtr = WriterBuilder::new().delimiter(b'\t').from_path(path)?;

    wtr.write_record(["SNP", "GENE"])?;
    for a in annotations {
        wtr.write_record([a.id.as_str(), a.gene.as_str()])?;
    }

    wtr.flush()?;
    Ok(())
}
