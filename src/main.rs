use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gwas_viz::{csv_reader, output, types::VariantRecord};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "gwas-viz")]
#[command(version)]
#[command(about = "Manhattan, QQ and Miami plots for GWAS summary statistics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Plot output format: "png" (default) or "svg"
    #[arg(long, global = true, default_value = "png")]
    plot_format: String,

    /// Image width in pixels
    #[arg(long, global = true, default_value_t = 1800)]
    width: u32,

    /// Image height in pixels (QQ plots are height x height)
    #[arg(long, global = true, default_value_t = 900)]
    height: u32,

    /// Number of threads for parallel processing
    #[arg(long, global = true, default_value_t = num_cpus())]
    threads: usize,

    /// Suppress progress output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log level: error, warn, info, debug or trace
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Command {
    /// Genome-wide Manhattan plot of one association table
    Manhattan {
        /// Association results (fastGWA output with renamed columns)
        #[arg(long)]
        assoc: PathBuf,

        /// Annotated hits to highlight (columns SNP, GENE)
        #[arg(long)]
        annotations: Option<PathBuf>,

        /// Label highlighted variants with their gene
        #[arg(long)]
        annotate: bool,

        /// x axis: "ordinal" (row rank) or "genomic" (cumulative position)
        #[arg(long, default_value = "ordinal")]
        x_axis: String,

        /// Comma-separated chromosome order; defaults to natural order
        #[arg(long, value_delimiter = ',')]
        chrom_order: Option<Vec<String>>,

        /// Output directory for the plot
        #[arg(long)]
        out_dir: PathBuf,
    },

    /// QQ plot with a Beta confidence band
    Qq {
        #[arg(long)]
        assoc: PathBuf,

        /// Maximum number of ranks in the confidence band
        #[arg(long, default_value_t = gwas_viz::confidence::DEFAULT_CONF_POINTS)]
        conf_points: usize,

        /// Two-sided significance level of the band
        #[arg(long, default_value_t = gwas_viz::confidence::DEFAULT_CONF_ALPHA)]
        conf_alpha: f64,

        #[arg(long)]
        out_dir: PathBuf,
    },

    /// Miami plot comparing two association tables
    Miami {
        /// Study drawn upright
        #[arg(long)]
        top: PathBuf,

        /// Study drawn mirrored below
        #[arg(long)]
        bottom: PathBuf,

        #[arg(long)]
        top_annotations: Option<PathBuf>,

        #[arg(long)]
        bottom_annotations: Option<PathBuf>,

        #[arg(long, value_delimiter = ',')]
        chrom_order: Option<Vec<String>>,

        #[arg(long)]
        out_dir: PathBuf,
    },

    /// Manhattan and QQ plots of one association table
    All {
        #[arg(long)]
        assoc: PathBuf,

        #[arg(long)]
        annotations: Option<PathBuf>,

        #[arg(long)]
        annotate: bool,

        #[arg(long)]
        out_dir: PathBuf,
    },

    /// Write the .ma summary-statistics file for COJO stepwise selection
    CojoInput {
        #[arg(long)]
        assoc: PathBuf,

        /// Output .ma file
        #[arg(long)]
        output: PathBuf,
    },
}

fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

macro_rules! progress {
    ($quiet:expr) => {
        if !$quiet {
            eprintln!();
        }
    };
    ($quiet:expr, $($arg:tt)*) => {
        if !$quiet {
            eprintln!($($arg)*);
        }
    };
}

fn make_spinner(quiet: bool) -> Result<ProgressBar> {
    if quiet {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("  {spinner} [{elapsed_precise}] {msg}")?);
    pb.enable_steady_tick(std::time::Duration::from_millis(120));
    Ok(pb)
}

fn load_assoc(path: &Path, quiet: bool) -> Result<Vec<VariantRecord>> {
    let pb = make_spinner(quiet)?;
    pb.set_message(format!("reading {}", path.display()));
    let records = csv_reader::load_association_table(path)
        .with_context(|| format!("Failed to load association table {}", path.display()))?;
    pb.finish_and_clear();
    progress!(quiet, "  {} variants from {}", records.len(), path.display());
    Ok(records)
}

fn load_annotations(path: Option<&Path>, quiet: bool) -> Result<Option<Vec<gwas_viz::types::AnnotatedVariant>>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let annotations = csv_reader::load_annotation_table(path)
        .with_context(|| format!("Failed to load annotation table {}", path.display()))?;
    progress!(quiet, "  {} annotated variants from {}", annotations.len(), path.display());
    Ok(Some(annotations))
}

fn init_logging(level: &str) -> Result<()> {
    let filter: log::LevelFilter = level
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid --log-level '{}'", level))?;
    env_logger::Builder::new()
        .filter_level(filter)
        .format_timestamp(None)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level)?;

    // Configure rayon thread pool
    rayon::ThreadPoolBuilder::new()
        .num_threads(cli.threads)
        .build_global()
        .context("Failed to configure thread pool")?;

    match &cli.command {
        Command::CojoInput { assoc, output: out } => {
            progress!(cli.quiet, "Writing COJO input");
            let records = load_assoc(assoc, cli.quiet)?;
            output::write_cojo_input(&records, out)
                .with_context(|| format!("Failed to write {}", out.display()))?;
            progress!(cli.quiet, "Done! Results written to: {}", out.display());
            Ok(())
        }
        _ => run_plots(&cli),
    }
}

#[cfg(not(feature = "plotting"))]
fn run_plots(_cli: &Cli) -> Result<()> {
    anyhow::bail!("plotting feature not enabled. Rebuild with default features to enable plots.")
}

#[cfg(feature = "plotting")]
fn parse_plot_format(s: &str) -> Result<gwas_viz::plotting::PlotFormat> {
    match s.to_lowercase().as_str() {
        "png" => Ok(gwas_viz::plotting::PlotFormat::Png),
        "svg" => Ok(gwas_viz::plotting::PlotFormat::Svg),
        other => anyhow::bail!("Invalid --plot-format '{}'. Must be 'png' or 'svg'", other),
    }
}

#[cfg(feature = "plotting")]
fn parse_x_axis(s: &str) -> Result<gwas_viz::plotting::XAxis> {
    match s.to_lowercase().as_str() {
        "genomic" => Ok(gwas_viz::plotting::XAxis::Genomic),
        "ordinal" => Ok(gwas_viz::plotting::XAxis::Ordinal),
        other => anyhow::bail!("Invalid --x-axis '{}'. Must be 'genomic' or 'ordinal'", other),
    }
}

#[cfg(feature = "plotting")]
fn chrom_order(order: &Option<Vec<String>>) -> gwas_viz::layout::ChromOrder {
    match order {
        Some(list) if !list.is_empty() => gwas_viz::layout::ChromOrder::Explicit(list.clone()),
        _ => gwas_viz::layout::ChromOrder::Natural,
    }
}

#[cfg(feature = "plotting")]
fn run_plots(cli: &Cli) -> Result<()> {
    use gwas_viz::plotting;

    let base = plotting::PlotConfig {
        width: cli.width,
        height: cli.height,
        format: parse_plot_format(&cli.plot_format)?,
        ..Default::default()
    };

    match &cli.command {
        Command::Manhattan {
            assoc,
            annotations,
            annotate,
            x_axis,
            chrom_order: order,
            out_dir,
        } => {
            progress!(cli.quiet, "Manhattan plot");
            let config = plotting::PlotConfig {
                annotate: *annotate,
                x_axis: parse_x_axis(x_axis)?,
                chrom_order: chrom_order(order),
                ..base
            };
            let records = load_assoc(assoc, cli.quiet)?;
            let annots = load_annotations(annotations.as_deref(), cli.quiet)?;
            let path = plotting::plot_manhattan(&records, annots.as_deref(), out_dir, &config)?;
            progress!(cli.quiet, "  Plot saved to: {}", path.display());
        }
        Command::Qq {
            assoc,
            conf_points,
            conf_alpha,
            out_dir,
        } => {
            progress!(cli.quiet, "QQ plot");
            let config = plotting::PlotConfig {
                conf_points: *conf_points,
                conf_alpha: *conf_alpha,
                ..base
            };
            let records = load_assoc(assoc, cli.quiet)?;
            let p_values: Vec<f64> = records.iter().map(|r| r.p_value).collect();
            let path = plotting::plot_qq(&p_values, out_dir, &config)?;
            progress!(cli.quiet, "  Plot saved to: {}", path.display());
        }
        Command::Miami {
            top,
            bottom,
            top_annotations,
            bottom_annotations,
            chrom_order: order,
            out_dir,
        } => {
            progress!(cli.quiet, "Miami plot");
            let config = plotting::PlotConfig {
                chrom_order: chrom_order(order),
                ..base
            };
            let top_records = load_assoc(top, cli.quiet)?;
            let bottom_records = load_assoc(bottom, cli.quiet)?;
            let top_hl = load_annotations(top_annotations.as_deref(), cli.quiet)?;
            let bottom_hl = load_annotations(bottom_annotations.as_deref(), cli.quiet)?;
            let path = plotting::plot_miami(
                &top_records,
                top_hl.as_deref(),
                &bottom_records,
                bottom_hl.as_deref(),
                out_dir,
                &config,
            )?;
            progress!(cli.quiet, "  Plot saved to: {}", path.display());
        }
        Command::All {
            assoc,
            annotations,
            annotate,
            out_dir,
        } => {
            progress!(cli.quiet, "Manhattan and QQ plots");
            let config = plotting::PlotConfig {
                annotate: *annotate,
                ..base
            };
            let records = load_assoc(assoc, cli.quiet)?;
            let annots = load_annotations(annotations.as_deref(), cli.quiet)?;
            let p_values: Vec<f64> = records.iter().map(|r| r.p_value).collect();

            let (manhattan, qq) = rayon::join(
                || plotting::plot_manhattan(&records, annots.as_deref(), out_dir, &config),
                || plotting::plot_qq(&p_values, out_dir, &config),
            );
            progress!(cli.quiet, "  Plot saved to: {}", manhattan?.display());
            progress!(cli.quiet, "  Plot saved to: {}", qq?.display());
        }
        Command::CojoInput { .. } => unreachable!("handled in main"),
    }

    progress!(cli.quiet);
    progress!(cli.quiet, "Done!");
    Ok(())
}
