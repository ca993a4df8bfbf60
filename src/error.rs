use std::path::PathBuf;

/// Errors raised by the table loaders and the plot primitives.
#[derive(Debug, thiserror::Error)]
pub enum GwasPlotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("required column '{column}' not found in {}", path.display())]
    MissingColumn { column: String, path: PathBuf },

    #[error("row {row}: invalid value '{value}' in column '{column}'")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("no variants to plot")]
    EmptyInput,

    #[error("chromosome '{0}' is not part of the chromosome order")]
    UnknownChromosome(String),

    #[error("confidence band point budget must be positive (got {0})")]
    InvalidBudget(usize),

    #[error("confidence level alpha must lie in (0, 1] (got {0})")]
    InvalidAlpha(f64),

    #[error("distribution error: {0}")]
    Distribution(String),
}

pub type Result<T> = std::result::Result<T, GwasPlotError>;
