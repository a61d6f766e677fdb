use anyhow::{anyhow, Result};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::PathBuf;
use tracing::info;

use super::{output_path, padded_range, save_png, Canvas, CORRELATION_FILE, FONT};
use crate::config::OutputConfig;
use crate::stats::{linear_fit, pearson};
use crate::types::Neighborhoods;

const POINT_COLOR: RGBColor = RGBColor(76, 114, 176);

/// After-school programs against crime rate, with the least-squares line and
/// the correlation coefficient.
pub fn render_correlation_scatter(table: &Neighborhoods, output: &OutputConfig) -> Result<PathBuf> {
    let xs = table.after_school_programs();
    let ys = table.crime_rates();

    let correlation = pearson(&xs, &ys)
        .ok_or_else(|| anyhow!("Correlation is undefined for {} neighborhoods", table.len()))?;
    let fit = linear_fit(&xs, &ys)
        .ok_or_else(|| anyhow!("Regression is undefined for {} neighborhoods", table.len()))?;
    info!("Programs vs crime: r = {:.4}, slope = {:.4}", correlation, fit.slope);

    let (x_min, x_max) = min_max(&xs);
    let (y_min, y_max) = min_max(&ys);
    let x_range = padded_range(x_min, x_max, 0.08);
    let y_range = padded_range(y_min, y_max, 0.1);

    let path = output_path(output, CORRELATION_FILE)?;
    let canvas = Canvas::new(10.0, 8.0, output.dpi);

    save_png(&path, canvas, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(
                "Relationship Between After-School Programs and Crime Rates",
                (FONT, canvas.font(16.0)),
            )
            .margin(canvas.px(12.0))
            .x_label_area_size(canvas.px(40.0))
            .y_label_area_size(canvas.px(50.0))
            .build_cartesian_2d(x_range.clone(), y_range.clone())?;

        chart
            .configure_mesh()
            .bold_line_style(RGBColor(225, 225, 225))
            .light_line_style(TRANSPARENT)
            .label_style((FONT, canvas.font(10.0)))
            .x_desc("Number of After-School Programs")
            .y_desc("Crime Rate per 1,000 Residents")
            .axis_desc_style((FONT, canvas.font(12.0)))
            .draw()?;

        chart.draw_series(DashedLineSeries::new(
            vec![(x_range.start, fit.at(x_range.start)), (x_range.end, fit.at(x_range.end))],
            canvas.px(6.0),
            canvas.px(4.0),
            RED.stroke_width(canvas.px(1.5)),
        ))?;

        let radius = canvas.px(5.0) as i32;
        let offset = canvas.px(5.0) as i32;
        let label_style = TextStyle::from((FONT, canvas.font(10.0)))
            .pos(Pos::new(HPos::Left, VPos::Bottom));
        chart.draw_series(table.regions().iter().map(|region| {
            EmptyElement::at((region.after_school_programs as f64, region.crime_rate))
                + Circle::new((0, 0), radius, POINT_COLOR.mix(0.7).filled())
                + Text::new(region.name.clone(), (offset, -offset), label_style.clone())
        }))?;

        // Boxed annotation in the lower right of the plotting area.
        let annotation = format!("Correlation: {:.2}", correlation);
        let style = TextStyle::from((FONT, canvas.font(12.0)))
            .pos(Pos::new(HPos::Right, VPos::Bottom));
        let (text_w, text_h) = root.estimate_text_size(&annotation, &style)?;
        let (x_px, y_px) = chart.plotting_area().get_pixel_range();
        let pad = canvas.px(4.0) as i32;
        let right = x_px.end - canvas.px(12.0) as i32;
        let bottom = y_px.end - canvas.px(12.0) as i32;

        root.draw(&Rectangle::new(
            [(right - text_w as i32 - 2 * pad, bottom - text_h as i32 - 2 * pad), (right, bottom)],
            WHITE.mix(0.8).filled(),
        ))?;
        root.draw(&Rectangle::new(
            [(right - text_w as i32 - 2 * pad, bottom - text_h as i32 - 2 * pad), (right, bottom)],
            RGBColor(128, 128, 128).stroke_width(1),
        ))?;
        root.draw(&Text::new(annotation, (right - pad, bottom - pad), style))?;

        Ok(())
    })?;

    Ok(path)
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)))
}
