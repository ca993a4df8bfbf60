use anyhow::Result;
use plotters::prelude::*;

use super::labels::{draw_labels, LabelBox, Stack};
use super::{
    draw_chrom_labels, threshold_visible, PlotConfig, COLOR_BLACK, COLOR_CHROM_EVEN, COLOR_CHROM_ODD, COLOR_GRID,
    COLOR_HIGHLIGHT, COLOR_THRESHOLD,
};
use crate::highlight::Highlight;
use crate::layout::GenomeLayout;
use crate::types::{neg_log10, PlottablePoint};

/// Top of the y range: the largest -log10(p) plus one.
fn y_upper(points: &[PlottablePoint]) -> f64 {
    points.iter().map(|p| p.neg_log10_p).fold(0.0, f64::max) + 1.0
}

/// Draw a genome-wide Manhattan plot on the given drawing area.
///
/// `points` must be in layout order (as returned by `GenomeLayout::place`).
pub fn draw_manhattan<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    layout: &GenomeLayout,
    points: &[PlottablePoint],
    highlights: &[Highlight],
    config: &PlotConfig,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let x_of = config.x_axis.x_of();
    let x_max = config.x_axis.x_max(layout, points.len());

    let y_max = y_upper(points);

    let mut chart = ChartBuilder::on(root)
        .caption("Manhattan Plot", ("sans-serif", 28).into_font().color(&COLOR_BLACK))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..x_max, 0.0..y_max)?;

    chart
        .configure_mesh()
        .x_labels(0)
        .disable_x_mesh()
        .x_desc("Chromosome")
        .y_desc("-log10(P-value)")
        .y_label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 20))
        .light_line_style(COLOR_GRID.mix(0.3))
        .draw()?;

    // Alternating chromosome colours
    chart.draw_series(points.iter().enumerate().map(|(i, p)| {
        let color = if p.chrom_index % 2 == 0 {
            COLOR_CHROM_EVEN
        } else {
            COLOR_CHROM_ODD
        };
        Circle::new((x_of(i, p), p.neg_log10_p), 2, color.filled())
    }))?;

    let genome_wide = neg_log10(config.genome_wide_p);
    if threshold_visible(genome_wide, y_max) {
        chart.draw_series(DashedLineSeries::new(
            vec![(0.0, genome_wide), (x_max, genome_wide)],
            8,
            4,
            COLOR_THRESHOLD.stroke_width(1),
        ))?;
    }

    if !highlights.is_empty() {
        chart.draw_series(highlights.iter().map(|h| {
            Circle::new(
                (x_of(h.rank, &h.point), h.point.neg_log10_p),
                4,
                COLOR_HIGHLIGHT.filled(),
            )
        }))?;
    }

    let (px_range, py_range) = chart.plotting_area().get_pixel_range();

    let ticks: Vec<(String, (i32, i32))> = layout
        .axis_ticks(points, x_of)
        .into_iter()
        .map(|t| {
            let (px, _) = chart.backend_coord(&(t.center, 0.0));
            (t.chrom, (px, py_range.end))
        })
        .collect();
    draw_chrom_labels(root, &ticks, 14)?;

    if config.annotate && !highlights.is_empty() {
        let anchors: Vec<(i32, i32)> = highlights
            .iter()
            .map(|h| chart.backend_coord(&(x_of(h.rank, &h.point), h.point.neg_log10_p)))
            .collect();
        let texts: Vec<String> = highlights.iter().map(|h| h.gene.clone()).collect();
        let bounds = LabelBox {
            x: px_range.start,
            y: py_range.start,
            w: px_range.end - px_range.start,
            h: py_range.end - py_range.start,
        };
        draw_labels(root, &anchors, &texts, bounds, Stack::Up, 12)?;
    }

    Ok(())
}
