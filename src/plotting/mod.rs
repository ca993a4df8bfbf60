pub mod labels;
mod manhattan;
mod miami;
mod qq;

use anyhow::{Context, Result};
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Once;

use crate::error::GwasPlotError;
use crate::highlight::resolve;
use crate::layout::{genomic_x, ordinal_x, ChromOrder, GenomeLayout};
use crate::quantiles::prepare_qq;
use crate::types::{AnnotatedVariant, Origin, PlottablePoint, VariantRecord, GENOME_WIDE_P, SUGGESTIVE_P};
use crate::confidence::{DEFAULT_CONF_ALPHA, DEFAULT_CONF_POINTS};

static FONT_INIT: Once = Once::new();

/// Register an embedded font for the ab_glyph backend (no-op after first call).
fn ensure_fonts() {
    FONT_INIT.call_once(|| {
        // DejaVu Sans is available on virtually all Linux systems
        let font_data: &'static [u8] =
            include_bytes!("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf");
        plotters::style::register_font("sans-serif", FontStyle::Normal, font_data)
            .unwrap_or_else(|_| panic!("failed to register sans-serif Normal font"));
        plotters::style::register_font("sans-serif", FontStyle::Bold, font_data)
            .unwrap_or_else(|_| panic!("failed to register sans-serif Bold font"));
    });
}

/// Output format for plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlotFormat {
    #[default]
    Png,
    Svg,
}

impl PlotFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            PlotFormat::Png => "png",
            PlotFormat::Svg => "svg",
        }
    }
}

/// How variants are spread along the Manhattan x axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum XAxis {
    /// Evenly spaced by rank in sorted order, domain [0, n)
    #[default]
    Ordinal,
    /// Cumulative base-pair position, domain [0, genome length]
    Genomic,
}

impl XAxis {
    fn x_of(self) -> fn(usize, &PlottablePoint) -> f64 {
        match self {
            XAxis::Genomic => genomic_x,
            XAxis::Ordinal => ordinal_x,
        }
    }

    fn x_max(self, layout: &GenomeLayout, n_points: usize) -> f64 {
        let max = match self {
            XAxis::Genomic => layout.genome_length() as f64,
            XAxis::Ordinal => n_points as f64,
        };
        max.max(1.0)
    }
}

/// Configuration for plot generation.
#[derive(Debug, Clone)]
pub struct PlotConfig {
    pub width: u32,
    pub height: u32,
    pub format: PlotFormat,
    /// Draw gene labels next to highlighted Manhattan points
    pub annotate: bool,
    /// Maximum number of ranks in the QQ confidence band
    pub conf_points: usize,
    pub conf_alpha: f64,
    pub genome_wide_p: f64,
    pub suggestive_p: f64,
    pub chrom_order: ChromOrder,
    pub x_axis: XAxis,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 1800,
            height: 900,
            format: PlotFormat::Png,
            annotate: false,
            conf_points: DEFAULT_CONF_POINTS,
            conf_alpha: DEFAULT_CONF_ALPHA,
            genome_wide_p: GENOME_WIDE_P,
            suggestive_p: SUGGESTIVE_P,
            chrom_order: ChromOrder::Natural,
            x_axis: XAxis::Ordinal,
        }
    }
}

// Manhattan
pub const COLOR_CHROM_EVEN: RGBColor = RGBColor(128, 128, 128); // grey
pub const COLOR_CHROM_ODD: RGBColor = RGBColor(135, 206, 235); // skyblue
pub const COLOR_HIGHLIGHT: RGBColor = RGBColor(220, 50, 50);
pub const COLOR_THRESHOLD: RGBColor = RGBColor(0, 0, 255);

// Miami
pub const COLOR_MIAMI_EVEN: RGBColor = RGBColor(102, 194, 165); // #66c2a5
pub const COLOR_MIAMI_ODD: RGBColor = RGBColor(252, 141, 98); // #fc8d62
pub const COLOR_ON_BOTH: RGBColor = RGBColor(31, 119, 180); // #1f77b4
pub const COLOR_TOP_ONLY: RGBColor = RGBColor(44, 160, 44); // #2ca02c
pub const COLOR_BOTTOM_ONLY: RGBColor = RGBColor(148, 103, 189); // #9467bd

// QQ
pub const COLOR_BAND: RGBColor = RGBColor(211, 211, 211); // lightgray
pub const COLOR_STEEL_BLUE: RGBColor = RGBColor(46, 134, 171); // #2E86AB
pub const COLOR_RED: RGBColor = RGBColor(220, 50, 50);

pub const COLOR_BLACK: RGBColor = RGBColor(0, 0, 0);
pub const COLOR_GRID: RGBColor = RGBColor(200, 200, 200);

/// Whether a threshold line at `threshold` (-log10 scale) falls inside a y
/// range topping out at `y_max`.
pub(crate) fn threshold_visible(threshold: f64, y_max: f64) -> bool {
    threshold.is_finite() && threshold <= y_max
}

/// `<out_dir>/<stem>.<ext>`, creating `out_dir` if needed.
fn output_path(out_dir: &Path, stem: &str, format: PlotFormat) -> Result<PathBuf> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;
    Ok(out_dir.join(format!("{}.{}", stem, format.extension())))
}

/// Render a genome-wide Manhattan plot to `<out_dir>/manhattan_plot.<ext>`.
///
/// Variants listed in `annotations` are drawn in red; with `config.annotate`
/// they are also labelled with their gene.
pub fn plot_manhattan(
    records: &[VariantRecord],
    annotations: Option<&[AnnotatedVariant]>,
    out_dir: &Path,
    config: &PlotConfig,
) -> Result<PathBuf> {
    ensure_fonts();
    if records.is_empty() {
        return Err(GwasPlotError::EmptyInput.into());
    }

    let layout = GenomeLayout::from_records(records, &config.chrom_order)?;
    let points = layout.place(records, None)?;
    let highlights = annotations
        .map(|a| resolve(&points, records, a))
        .unwrap_or_default();

    let path = output_path(out_dir, "manhattan_plot", config.format)?;
    let dims = (config.width, config.height);

    match config.format {
        PlotFormat::Png => {
            let root = BitMapBackend::new(&path, dims).into_drawing_area();
            manhattan::draw_manhattan(&root, &layout, &points, &highlights, config)?;
            root.present()?;
        }
        PlotFormat::Svg => {
            let root = SVGBackend::new(&path, dims).into_drawing_area();
            manhattan::draw_manhattan(&root, &layout, &points, &highlights, config)?;
            root.present()?;
        }
    }

    log::info!("Plot saved to: {}", path.display());
    Ok(path)
}

/// Render a QQ plot with its confidence band to `<out_dir>/qq_plot.<ext>`.
///
/// The image is square, `config.height` pixels on each side.
pub fn plot_qq(p_values: &[f64], out_dir: &Path, config: &PlotConfig) -> Result<PathBuf> {
    ensure_fonts();
    let qq = prepare_qq(p_values, config.conf_points, config.conf_alpha)?;
    if qq.n <= 1 {
        log::warn!("QQ plot of {} p-value(s) has no confidence band", qq.n);
    }

    let path = output_path(out_dir, "qq_plot", config.format)?;
    let dims = (config.height, config.height);

    match config.format {
        PlotFormat::Png => {
            let root = BitMapBackend::new(&path, dims).into_drawing_area();
            qq::draw_qq(&root, &qq)?;
            root.present()?;
        }
        PlotFormat::Svg => {
            let root = SVGBackend::new(&path, dims).into_drawing_area();
            qq::draw_qq(&root, &qq)?;
            root.present()?;
        }
    }

    log::info!("Plot saved to: {}", path.display());
    Ok(path)
}

/// Render a Miami plot of two studies to `<out_dir>/miami_plot.<ext>`.
///
/// Both tables share one genome-wide axis. The top study is drawn upright, the
/// bottom one mirrored below it. When both studies supply highlights they are
/// classified by which study reported them and coloured accordingly; a set
/// supplied for one study only is labelled on both panels.
pub fn plot_miami(
    top: &[VariantRecord],
    top_highlights: Option<&[AnnotatedVariant]>,
    bottom: &[VariantRecord],
    bottom_highlights: Option<&[AnnotatedVariant]>,
    out_dir: &Path,
    config: &PlotConfig,
) -> Result<PathBuf> {
    ensure_fonts();
    if top.is_empty() || bottom.is_empty() {
        return Err(GwasPlotError::EmptyInput.into());
    }

    let layout = GenomeLayout::from_records(top.iter().chain(bottom), &config.chrom_order)?;
    let top_points = layout.place(top, Some(Origin::Top))?;
    let bottom_points = layout.place(bottom, Some(Origin::Bottom))?;

    let (top_resolved, bottom_resolved) = miami::panel_highlights(
        &top_points,
        top,
        &bottom_points,
        bottom,
        top_highlights,
        bottom_highlights,
    );
    let panels = miami::MiamiPanels {
        top: miami::Panel {
            points: &top_points,
            highlights: top_resolved,
        },
        bottom: miami::Panel {
            points: &bottom_points,
            highlights: bottom_resolved,
        },
    };

    let path = output_path(out_dir, "miami_plot", config.format)?;
    let dims = (config.width, config.height * 16 / 10);

    match config.format {
        PlotFormat::Png => {
            let root = BitMapBackend::new(&path, dims).into_drawing_area();
            miami::draw_miami(&root, &layout, &panels, config)?;
            root.present()?;
        }
        PlotFormat::Svg => {
            let root = SVGBackend::new(&path, dims).into_drawing_area();
            miami::draw_miami(&root, &layout, &panels, config)?;
            root.present()?;
        }
    }

    log::info!("Plot saved to: {}", path.display());
    Ok(path)
}

/// Draw chromosome names centred under their tick positions.
fn draw_chrom_labels<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    ticks: &[(String, (i32, i32))],
    font_size: u32,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    use plotters::style::text_anchor::{HPos, Pos, VPos};

    let style = ("sans-serif", font_size)
        .into_font()
        .color(&COLOR_BLACK)
        .pos(Pos::new(HPos::Center, VPos::Top));
    for (chrom, (px, py)) in ticks {
        root.draw(&Text::new(chrom.clone(), (*px, *py + 6), style.clone()))?;
    }
    Ok(())
}
