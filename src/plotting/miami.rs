use anyhow::Result;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;

use super::labels::{draw_labels, LabelBox, Stack};
use super::{
    draw_chrom_labels, threshold_visible, PlotConfig, COLOR_BOTTOM_ONLY, COLOR_GRID, COLOR_MIAMI_EVEN, COLOR_MIAMI_ODD,
    COLOR_ON_BOTH, COLOR_RED, COLOR_THRESHOLD, COLOR_TOP_ONLY,
};
use crate::classify::classify;
use crate::highlight::{resolve, resolve_classified, Highlight};
use crate::layout::{genomic_x, GenomeLayout};
use crate::types::{neg_log10, AnnotatedVariant, Category, Origin, PlottablePoint, VariantRecord};

type MiamiChart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Points and resolved highlights of one study.
pub struct Panel<'a> {
    pub points: &'a [PlottablePoint],
    pub highlights: Vec<Highlight>,
}

pub struct MiamiPanels<'a> {
    pub top: Panel<'a>,
    pub bottom: Panel<'a>,
}

fn category_color(category: Option<Category>) -> RGBColor {
    match category {
        Some(Category::OnBoth) => COLOR_ON_BOTH,
        Some(Category::TopOnly) => COLOR_TOP_ONLY,
        Some(Category::BottomOnly) => COLOR_BOTTOM_ONLY,
        None => COLOR_RED,
    }
}

/// Whether a highlight gets a gene label on the panel of `origin`.
///
/// Unclassified highlights are labelled wherever they resolve.
fn labelled_on(category: Option<Category>, origin: Origin) -> bool {
    matches!(
        (category, origin),
        (None, _)
            | (Some(Category::OnBoth), _)
            | (Some(Category::TopOnly), Origin::Top)
            | (Some(Category::BottomOnly), Origin::Bottom)
    )
}

/// Resolve the highlight sets of both studies against both panels.
///
/// Points of each panel must come from `GenomeLayout::place` over the
/// matching records. Sets supplied for both studies are classified first. A
/// set supplied for one study only stays unclassified and is resolved against
/// both panels.
pub fn panel_highlights(
    top_points: &[PlottablePoint],
    top_records: &[VariantRecord],
    bottom_points: &[PlottablePoint],
    bottom_records: &[VariantRecord],
    top_highlights: Option<&[AnnotatedVariant]>,
    bottom_highlights: Option<&[AnnotatedVariant]>,
) -> (Vec<Highlight>, Vec<Highlight>) {
    match (top_highlights, bottom_highlights) {
        (Some(t), Some(b)) => {
            let classified = classify(t, b);
            (
                resolve_classified(top_points, top_records, &classified),
                resolve_classified(bottom_points, bottom_records, &classified),
            )
        }
        (Some(one), None) | (None, Some(one)) => {
            (
                resolve(top_points, top_records, one),
                resolve(bottom_points, bottom_records, one),
            )
        }
        (None, None) => (Vec::new(), Vec::new()),
    }
}

/// Shared y extent of both panels: the largest -log10(p) rounded up, at least 1.
fn y_extent(top: &[PlottablePoint], bottom: &[PlottablePoint]) -> f64 {
    top.iter()
        .chain(bottom)
        .map(|p| p.neg_log10_p)
        .fold(0.0, f64::max)
        .ceil()
        .max(1.0)
}

/// Draw a Miami plot: the top study upright over the bottom study mirrored
/// below it, on one shared genome-wide axis.
///
/// The bottom panel uses negated y values so that -log10(p) grows downward;
/// its tick labels print the absolute value.
pub fn draw_miami<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    layout: &GenomeLayout,
    panels: &MiamiPanels,
    config: &PlotConfig,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let x_max = (layout.genome_length() as f64).max(1.0);
    let maxp = y_extent(panels.top.points, panels.bottom.points);

    let half = (root.dim_in_pixel().1 / 2) as i32;
    let (upper, lower) = root.split_vertically(half);

    let mut top_chart = ChartBuilder::on(&upper)
        .margin_top(20)
        .margin_left(20)
        .margin_right(20)
        .x_label_area_size(30)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..x_max, 0.0..maxp)?;

    top_chart
        .configure_mesh()
        .x_labels(0)
        .disable_x_mesh()
        .y_desc("-log10(p)")
        .y_label_formatter(&|v| format!("{:.1}", v))
        .y_label_style(("sans-serif", 14))
        .axis_desc_style(("sans-serif", 18))
        .light_line_style(COLOR_GRID.mix(0.3))
        .draw()?;

    let mut bottom_chart = ChartBuilder::on(&lower)
        .margin_bottom(20)
        .margin_left(20)
        .margin_right(20)
        .x_label_area_size(10)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..x_max, -maxp..0.0)?;

    bottom_chart
        .configure_mesh()
        .x_labels(0)
        .disable_x_mesh()
        .y_desc("-log10(p)")
        .y_label_formatter(&|v| format!("{:.1}", v.abs()))
        .y_label_style(("sans-serif", 14))
        .axis_desc_style(("sans-serif", 18))
        .light_line_style(COLOR_GRID.mix(0.3))
        .draw()?;

    draw_panel(&mut top_chart, &panels.top, 1.0, x_max, maxp, config)?;
    draw_panel(&mut bottom_chart, &panels.bottom, -1.0, x_max, maxp, config)?;

    // Chromosome names sit between the panels, under the top axis
    let (_, top_py) = top_chart.plotting_area().get_pixel_range();
    let all_points: Vec<PlottablePoint> = panels
        .top
        .points
        .iter()
        .chain(panels.bottom.points)
        .copied()
        .collect();
    let ticks: Vec<(String, (i32, i32))> = layout
        .axis_ticks(&all_points, genomic_x)
        .into_iter()
        .map(|t| {
            let (px, _) = top_chart.backend_coord(&(t.center, 0.0));
            (t.chrom, (px, top_py.end))
        })
        .collect();
    draw_chrom_labels(root, &ticks, 12)?;

    draw_panel_labels(root, &top_chart, &panels.top, 1.0, Origin::Top, Stack::Up)?;
    draw_panel_labels(root, &bottom_chart, &panels.bottom, -1.0, Origin::Bottom, Stack::Down)?;

    Ok(())
}

fn draw_panel<DB: DrawingBackend>(
    chart: &mut MiamiChart<DB>,
    panel: &Panel,
    sign: f64,
    x_max: f64,
    maxp: f64,
    config: &PlotConfig,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    chart.draw_series(panel.points.iter().map(|p| {
        let color = if p.chrom_index % 2 == 0 {
            COLOR_MIAMI_EVEN
        } else {
            COLOR_MIAMI_ODD
        };
        Circle::new((p.relative_pos as f64, sign * p.neg_log10_p), 1, color.filled())
    }))?;

    let suggestive = neg_log10(config.suggestive_p);
    if threshold_visible(suggestive, maxp) {
        chart.draw_series(LineSeries::new(
            vec![(0.0, sign * suggestive), (x_max, sign * suggestive)],
            COLOR_THRESHOLD.stroke_width(1),
        ))?;
    }

    let genome_wide = neg_log10(config.genome_wide_p);
    if threshold_visible(genome_wide, maxp) {
        chart.draw_series(DashedLineSeries::new(
            vec![(0.0, sign * genome_wide), (x_max, sign * genome_wide)],
            8,
            4,
            COLOR_RED.stroke_width(1),
        ))?;
    }

    chart.draw_series(panel.highlights.iter().map(|h| {
        Circle::new(
            (h.point.relative_pos as f64, sign * h.point.neg_log10_p),
            3,
            category_color(h.category).filled(),
        )
    }))?;

    Ok(())
}

fn draw_panel_labels<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    chart: &MiamiChart<DB>,
    panel: &Panel,
    sign: f64,
    origin: Origin,
    stack: Stack,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let labelled: Vec<&Highlight> = panel
        .highlights
        .iter()
        .filter(|h| labelled_on(h.category, origin))
        .collect();
    if labelled.is_empty() {
        return Ok(());
    }

    let anchors: Vec<(i32, i32)> = labelled
        .iter()
        .map(|h| chart.backend_coord(&(h.point.relative_pos as f64, sign * h.point.neg_log10_p)))
        .collect();
    let texts: Vec<String> = labelled.iter().map(|h| h.gene.clone()).collect();

    let (px, py) = chart.plotting_area().get_pixel_range();
    let bounds = LabelBox {
        x: px.start,
        y: py.start,
        w: px.end - px.start,
        h: py.end - py.start,
    };
    draw_labels(root, &anchors, &texts, bounds, stack, 11)
}
