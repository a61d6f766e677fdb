use anyhow::{bail, Result};
use plotters::prelude::*;
use std::path::PathBuf;

use super::{
    bar_span, category_axis, category_label, output_path, padded_range, save_png, Canvas, COMPARISON_FILE, FONT,
};
use crate::config::{ComparisonConfig, OutputConfig};
use crate::types::Neighborhoods;

const STEEL_BLUE: RGBColor = RGBColor(70, 130, 180);

/// Equity score bars on the left axis against the crime rate line on the
/// right axis, for the configured subset of neighborhoods.
pub fn render_equity_comparison(
    table: &Neighborhoods,
    comparison: &ComparisonConfig,
    output: &OutputConfig,
) -> Result<PathBuf> {
    let subset = table.select(&comparison.neighborhoods);
    if subset.is_empty() {
        bail!("None of the comparison neighborhoods are in the table: {:?}", comparison.neighborhoods);
    }

    let names: Vec<&str> = subset.iter().map(|r| r.name.as_str()).collect();
    let (crime_min, crime_max) = subset.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
        (lo.min(r.crime_rate), hi.max(r.crime_rate))
    });
    let crime_range = padded_range(crime_min, crime_max, 0.05);

    let path = output_path(output, COMPARISON_FILE)?;
    let canvas = Canvas::new(12.0, 6.0, output.dpi);

    save_png(&path, canvas, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(
                "Comparison of Equity Scores and Crime Rates by Neighborhood",
                (FONT, canvas.font(16.0)),
            )
            .margin(canvas.px(10.0))
            .x_label_area_size(canvas.px(40.0))
            .y_label_area_size(canvas.px(50.0))
            .right_y_label_area_size(canvas.px(50.0))
            .build_cartesian_2d(category_axis(names.len()).into_segmented(), 0.0..5.5)?
            .set_secondary_coord(category_axis(names.len()).into_segmented(), crime_range);

        chart
            .configure_mesh()
            .disable_x_mesh()
            .bold_line_style(RGBColor(225, 225, 225))
            .light_line_style(TRANSPARENT)
            .x_labels(names.len())
            .x_label_formatter(&|v: &SegmentValue<usize>| category_label(&names, v))
            .x_label_style((FONT, canvas.font(9.0)))
            .y_label_style((FONT, canvas.font(10.0)).into_font().color(&STEEL_BLUE))
            .x_desc("Neighborhood")
            .y_desc("Equity Score (1-5)")
            .axis_desc_style((FONT, canvas.font(11.0)).into_font().color(&STEEL_BLUE))
            .draw()?;

        chart
            .configure_secondary_axes()
            .label_style((FONT, canvas.font(10.0)).into_font().color(&RED))
            .y_desc("Crime Rate per 1,000")
            .axis_desc_style((FONT, canvas.font(11.0)).into_font().color(&RED))
            .draw()?;

        let gap = canvas.px(8.0);
        let legend_size = canvas.px(8.0) as i32;

        chart
            .draw_series(subset.iter().enumerate().map(|(i, region)| {
                let (left, right) = bar_span(i, subset.len());
                let mut bar = Rectangle::new(
                    [(left, 0.0), (right, region.equity_score)],
                    STEEL_BLUE.mix(0.7).filled(),
                );
                bar.set_margin(0, 0, gap, gap);
                bar
            }))?
            .label("Equity Score")
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - legend_size / 2), (x + legend_size, y + legend_size / 2)], STEEL_BLUE.mix(0.7).filled())
            });

        let line_width = canvas.px(1.5);
        let marker_size = canvas.px(4.0);
        let points: Vec<(SegmentValue<usize>, f64)> = subset
            .iter()
            .enumerate()
            .map(|(i, region)| (SegmentValue::CenterOf(i), region.crime_rate))
            .collect();

        chart
            .draw_secondary_series(LineSeries::new(points.clone(), RED.stroke_width(line_width)))?
            .label("Crime Rate")
            .legend(move |(x, y)| {
                EmptyElement::at((x, y))
                    + PathElement::new(vec![(0, 0), (legend_size * 2, 0)], RED.stroke_width(line_width))
                    + Circle::new((legend_size, 0), marker_size, RED.filled())
            });
        chart.draw_secondary_series(
            points.into_iter().map(|p| Circle::new(p, marker_size, RED.filled())),
        )?;

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .label_font((FONT, canvas.font(10.0)))
            .background_style(WHITE.mix(0.8))
            .border_style(RGBColor(200, 200, 200))
            .margin(canvas.px(6.0))
            .draw()?;

        Ok(())
    })?;

    Ok(path)
}
