use anyhow::Result;
use plotters::prelude::*;
use std::path::PathBuf;

use super::{bar_span, category_axis, category_label, output_path, save_png, Canvas, CRIME_BARS_FILE, FONT};
use crate::classify::classify;
use crate::config::OutputConfig;
use crate::types::Neighborhoods;

/// Crime rate per neighborhood, highest first, each bar in its bucket color.
pub fn render_crime_bars(table: &Neighborhoods, output: &OutputConfig) -> Result<PathBuf> {
    let path = output_path(output, CRIME_BARS_FILE)?;
    let canvas = Canvas::new(12.0, 6.0, output.dpi);

    let sorted = table.sorted_by_crime_desc();
    let names: Vec<&str> = sorted.iter().map(|r| r.name.as_str()).collect();
    let y_max = sorted.first().map_or(1.0, |r| r.crime_rate.max(1.0)) * 1.05;

    save_png(&path, canvas, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption("Crime Rate by Neighborhood", (FONT, canvas.font(16.0)))
            .margin(canvas.px(10.0))
            .x_label_area_size(canvas.px(40.0))
            .y_label_area_size(canvas.px(50.0))
            .build_cartesian_2d(category_axis(names.len()).into_segmented(), 0.0..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .bold_line_style(RGBColor(225, 225, 225))
            .light_line_style(TRANSPARENT)
            .x_labels(names.len())
            .x_label_formatter(&|v: &SegmentValue<usize>| category_label(&names, v))
            .x_label_style((FONT, canvas.font(8.0)))
            .y_label_style((FONT, canvas.font(10.0)))
            .x_desc("Neighborhood")
            .y_desc("Crime Rate per 1,000 Residents")
            .axis_desc_style((FONT, canvas.font(11.0)))
            .draw()?;

        let gap = canvas.px(6.0);
        chart.draw_series(sorted.iter().enumerate().map(|(i, region)| {
            let (left, right) = bar_span(i, sorted.len());
            let mut bar = Rectangle::new(
                [(left, 0.0), (right, region.crime_rate)],
                classify(region.crime_rate).color().filled(),
            );
            bar.set_margin(0, 0, gap, gap);
            bar
        }))?;

        Ok(())
    })?;

    Ok(path)
}
