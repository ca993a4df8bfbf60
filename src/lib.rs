//! Diagnostic plots for mixed-model GWAS summary statistics.
//!
//! The pure building blocks (genome-wide coordinates, QQ confidence band,
//! point thinning, two-study classification) have no rendering dependency;
//! the `plotting` feature adds the Manhattan, QQ and Miami renderers.

pub mod classify;
pub mod confidence;
pub mod csv_reader;
pub mod error;
pub mod highlight;
pub mod layout;
pub mod output;
pub mod quantiles;
pub mod thinning;
pub mod types;

#[cfg(feature = "plotting")]
pub mod plotting;

pub use error::{GwasPlotError, Result};
