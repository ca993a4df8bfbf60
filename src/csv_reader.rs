use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use crate::error::{GwasPlotError, Result};
use crate::types::{AnnotatedVariant, VariantRecord, MISSING_GENE};

// Accepted header names, first entry is the canonical one reported in errors.
const CHR_COLUMNS: &[&str] = &["CHR", "Chr", "chrom", "CHROM", "#CHROM"];
const SNP_COLUMNS: &[&str] = &["SNP", "rsid", "ID"];
const POS_COLUMNS: &[&str] = &["bp", "POS", "pos", "BP"];
const P_COLUMNS: &[&str] = &["p", "P"];
const A1_COLUMNS: &[&str] = &["A1"];
const A2_COLUMNS: &[&str] = &["A2"];
const FREQ_COLUMNS: &[&str] = &["freq", "AF1"];
const BETA_COLUMNS: &[&str] = &["b", "BETA"];
const SE_COLUMNS: &[&str] = &["se", "SE"];
const N_COLUMNS: &[&str] = &["N"];
const GENE_COLUMNS: &[&str] = &["GENE", "gene"];

/// Tab if the header line contains one, comma otherwise.
fn sniff_delimiter(path: &Path) -> Result<u8> {
    let mut first_line = String::new();
    BufReader::new(File::open(path)?).read_line(&mut first_line)?;
    Ok(if first_line.contains('\t') { b'\t' } else { b',' })
}

fn open_table(path: &Path) -> Result<csv::Reader<File>> {
    let delimiter = sniff_delimiter(path)?;
    Ok(csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_path(path)?)
}

fn find_column(headers: &csv::StringRecord, aliases: &[&str]) -> Option<usize> {
    aliases
        .iter()
        .find_map(|alias| headers.iter().position(|h| h == *alias))
}

fn require_column(headers: &csv::StringRecord, aliases: &[&str], path: &Path) -> Result<usize> {
    find_column(headers, aliases).ok_or_else(|| GwasPlotError::MissingColumn {
        column: aliases[0].to_string(),
        path: path.to_path_buf(),
    })
}

fn is_missing(value: &str) -> bool {
    value.is_empty() || value.eq_ignore_ascii_case("na") || value.eq_ignore_ascii_case("nan")
}

fn parse_required<T: FromStr>(record: &csv::StringRecord, idx: usize, row: usize, column: &str) -> Result<T> {
    let value = record.get(idx).unwrap_or("");
    value.parse().map_err(|_| GwasPlotError::InvalidValue {
        row,
        column: column.to_string(),
        value: value.to_string(),
    })
}

fn parse_optional<T: FromStr>(
    record: &csv::StringRecord,
    idx: Option<usize>,
    row: usize,
    column: &str,
) -> Result<Option<T>> {
    match idx {
        Some(i) if !is_missing(record.get(i).unwrap_or("")) => parse_required(record, i, row, column).map(Some),
        _ => Ok(None),
    }
}

fn optional_string(record: &csv::StringRecord, idx: Option<usize>) -> Option<String> {
    idx.and_then(|i| record.get(i))
        .filter(|v| !is_missing(v))
        .map(str::to_string)
}

/// Column positions of an association table, resolved once from its header.
struct AssociationColumns {
    chrom: usize,
    id: usize,
    pos: usize,
    p: usize,
    a1: Option<usize>,
    a2: Option<usize>,
    freq: Option<usize>,
    beta: Option<usize>,
    se: Option<usize>,
    n: Option<usize>,
}

impl AssociationColumns {
    fn from_headers(headers: &csv::StringRecord, path: &Path) -> Result<Self> {
        Ok(Self {
            chrom: require_column(headers, CHR_COLUMNS, path)?,
            id: require_column(headers, SNP_COLUMNS, path)?,
            pos: require_column(headers, POS_COLUMNS, path)?,
            p: require_column(headers, P_COLUMNS, path)?,
            a1: find_column(headers, A1_COLUMNS),
            a2: find_column(headers, A2_COLUMNS),
            freq: find_column(headers, FREQ_COLUMNS),
            beta: find_column(headers, BETA_COLUMNS),
            se: find_column(headers, SE_COLUMNS),
            n: find_column(headers, N_COLUMNS),
        })
    }

    fn parse(&self, record: &csv::StringRecord, row: usize) -> Result<VariantRecord> {
        let p_value: f64 = parse_required(record, self.p, row, P_COLUMNS[0])?;
        if !(p_value > 0.0 && p_value <= 1.0) {
            return Err(GwasPlotError::InvalidValue {
                row,
                column: P_COLUMNS[0].to_string(),
                value: p_value.to_string(),
            });
        }

        Ok(VariantRecord {
            chrom: record.get(self.chrom).unwrap_or("").to_string(),
            pos: parse_required(record, self.pos, row, POS_COLUMNS[0])?,
            id: record.get(self.id).unwrap_or("").to_string(),
            p_value,
            allele1: optional_string(record, self.a1),
            allele2: optional_string(record, self.a2),
            allele_freq: parse_optional(record, self.freq, row, FREQ_COLUMNS[0])?,
            effect_size: parse_optional(record, self.beta, row, BETA_COLUMNS[0])?,
            std_err: parse_optional(record, self.se, row, SE_COLUMNS[0])?,
            sample_size: parse_optional(record, self.n, row, N_COLUMNS[0])?,
        })
    }
}

/// Read an association-results table (fastGWA output after column renaming).
///
/// Required columns: CHR, SNP, bp (or POS) and p. Optional: A1, A2, freq (AF1),
/// b (BETA), se (SE), N. Tab- and comma-delimited files are both accepted.
pub fn load_association_table(path: &Path) -> Result<Vec<VariantRecord>> {
    let mut rdr = open_table(path)?;
    let headers = rdr.headers()?.clone();
    let columns = AssociationColumns::from_headers(&headers, path)?;

    let mut records = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        records.push(columns.parse(&record, i + 1)?);
    }

    log::info!("Loaded {} variants from {}", records.len(), path.display());
    Ok(records)
}

/// Read an annotated-hits table with columns SNP and GENE.
///
/// Empty or NA gene cells become the "NA" sentinel.
pub fn load_annotation_table(path: &Path) -> Result<Vec<AnnotatedVariant>> {
    let mut rdr = open_table(path)?;
    let headers = rdr.headers()?.clone();
    let id_idx = require_column(&headers, SNP_COLUMNS, path)?;
    let gene_idx = require_column(&headers, GENE_COLUMNS, path)?;

    let mut annotations = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let id = record.get(id_idx).unwrap_or("");
        if id.is_empty() {
            continue;
        }
        let gene = optional_string(&record, Some(gene_idx)).unwrap_or_else(|| MISSING_GENE.to_string());
        annotations.push(AnnotatedVariant::new(id, gene));
    }

    log::info!("Loaded {} annotated variants from {}", annotations.len(), path.display());
    Ok(annotations)
}
