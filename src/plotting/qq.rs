use anyhow::Result;
use plotters::prelude::*;

use super::{COLOR_BAND, COLOR_BLACK, COLOR_GRID, COLOR_RED, COLOR_STEEL_BLUE};
use crate::confidence::band_polygon;
use crate::quantiles::QqLayout;

/// Draw a QQ plot: confidence band first, then the points, then the y = x line.
pub fn draw_qq<DB: DrawingBackend>(root: &DrawingArea<DB, plotters::coord::Shift>, qq: &QqLayout) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let (lo, hi) = qq.axis_range;

    let mut chart = ChartBuilder::on(root)
        .caption("QQ Plot", ("sans-serif", 24).into_font().color(&COLOR_BLACK))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(lo..hi, lo..hi)?;

    chart
        .configure_mesh()
        .x_desc("Expected -log10(p)")
        .y_desc("Observed -log10(p)")
        .x_label_style(("sans-serif", 14))
        .y_label_style(("sans-serif", 14))
        .axis_desc_style(("sans-serif", 18))
        .light_line_style(COLOR_GRID.mix(0.3))
        .draw()?;

    if !qq.band.is_empty() {
        chart.draw_series(std::iter::once(Polygon::new(
            band_polygon(&qq.band),
            COLOR_BAND.mix(0.8).filled(),
        )))?;
    }

    chart.draw_series(
        qq.points
            .iter()
            .map(|p| Circle::new((p.expected, p.observed), 3, COLOR_STEEL_BLUE.filled())),
    )?;

    chart.draw_series(DashedLineSeries::new(
        vec![(lo, lo), (hi, hi)],
        8,
        4,
        COLOR_RED.stroke_width(1),
    ))?;

    Ok(())
}
