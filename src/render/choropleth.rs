use anyhow::{anyhow, bail, Result};
use geo::{BoundingRect, InteriorPoint, Rect};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontStyle;
use std::ops::Range;
use std::path::PathBuf;
use tracing::{debug, info};

use super::{output_path, save_png, Canvas, CHOROPLETH_FILE, FONT};
use crate::classify::ColorBucket;
use crate::config::OutputConfig;
use crate::join::JoinReport;

const EDGE_COLOR: RGBColor = RGBColor(204, 204, 204);
const LEGEND_TITLE: &str = "Crime Rate per 1,000 Residents";

/// Map of the joined neighborhoods, each filled with its crime bucket color.
pub fn render_choropleth(report: &JoinReport, output: &OutputConfig) -> Result<PathBuf> {
    if report.joined.is_empty() {
        bail!("No boundaries matched any neighborhood; nothing to map");
    }

    let bounds = report
        .joined
        .iter()
        .filter_map(|j| j.boundary.geometry.bounding_rect())
        .reduce(|a, b| {
            Rect::new(
                (a.min().x.min(b.min().x), a.min().y.min(b.min().y)),
                (a.max().x.max(b.max().x), a.max().y.max(b.max().y)),
            )
        })
        .ok_or_else(|| anyhow!("Joined boundaries have no extent"))?;
    debug!("Map extent: {:?}", bounds);

    info!("Rendering choropleth for {} neighborhoods", report.joined.len());
    let path = output_path(output, CHOROPLETH_FILE)?;
    let canvas = Canvas::new(10.0, 8.0, output.dpi);

    save_png(&path, canvas, |root| {
        let (map_area, legend_area) = root.split_horizontally(canvas.width * 4 / 5);

        let map_area = map_area
            .titled("Denver Neighborhood Crime Rates", (FONT, canvas.font(16.0)))?
            .margin(canvas.px(10.0), canvas.px(10.0), canvas.px(10.0), canvas.px(10.0));
        let (width, height) = map_area.dim_in_pixel();
        let (x_range, y_range) = fit_aspect(bounds, width, height);

        let mut chart = ChartBuilder::on(&map_area).build_cartesian_2d(x_range, y_range)?;

        let edge_width = canvas.px(0.8);
        for joined in &report.joined {
            let fill = joined.bucket.color();
            for polygon in &joined.boundary.geometry {
                let exterior: Vec<(f64, f64)> = polygon.exterior().coords().map(|c| (c.x, c.y)).collect();
                chart.draw_series(std::iter::once(Polygon::new(exterior.clone(), fill.filled())))?;

                let holes: Vec<Vec<(f64, f64)>> = polygon
                    .interiors()
                    .iter()
                    .map(|ring| ring.coords().map(|c| (c.x, c.y)).collect())
                    .collect();
                chart.draw_series(holes.iter().map(|ring| Polygon::new(ring.clone(), WHITE.filled())))?;

                chart.draw_series(
                    std::iter::once(exterior)
                        .chain(holes)
                        .map(|ring| PathElement::new(ring, EDGE_COLOR.stroke_width(edge_width))),
                )?;
            }
        }

        let label_style = TextStyle::from((FONT, canvas.font(8.0), FontStyle::Bold))
            .pos(Pos::new(HPos::Center, VPos::Center));
        chart.draw_series(report.joined.iter().filter_map(|joined| {
            let point = joined.boundary.geometry.interior_point()?;
            Some(Text::new(joined.region.name.clone(), (point.x(), point.y()), label_style.clone()))
        }))?;

        draw_legend(&legend_area, canvas)?;

        Ok(())
    })?;

    Ok(path)
}

fn draw_legend(area: &DrawingArea<BitMapBackend<'_>, plotters::coord::Shift>, canvas: Canvas) -> Result<()> {
    let (_, height) = area.dim_in_pixel();
    let swatch = canvas.px(12.0) as i32;
    let row = canvas.px(20.0) as i32;
    let left = canvas.px(4.0) as i32;
    let mut top = height as i32 / 3;

    let heading = TextStyle::from((FONT, canvas.font(10.0), FontStyle::Bold))
        .pos(Pos::new(HPos::Left, VPos::Bottom));
    area.draw(&Text::new(LEGEND_TITLE, (left, top - canvas.px(6.0) as i32), heading))?;

    let entry = TextStyle::from((FONT, canvas.font(9.0))).pos(Pos::new(HPos::Left, VPos::Center));
    for bucket in ColorBucket::ALL {
        area.draw(&Rectangle::new([(left, top), (left + swatch, top + swatch)], bucket.color().filled()))?;
        area.draw(&Rectangle::new([(left, top), (left + swatch, top + swatch)], EDGE_COLOR.stroke_width(1)))?;
        area.draw(&Text::new(
            bucket.label(),
            (left + swatch + canvas.px(4.0) as i32, top + swatch / 2),
            entry.clone(),
        ))?;
        top += row;
    }

    Ok(())
}

/// Expands `bounds` to fill a `width` x `height` pixel area without
/// distorting shapes. Lon/lat extents are corrected for latitude; anything
/// outside lon/lat limits is treated as an already projected plane.
pub fn fit_aspect(bounds: Rect<f64>, width: u32, height: u32) -> (Range<f64>, Range<f64>) {
    let (min, max) = (bounds.min(), bounds.max());
    let geographic = min.x >= -180.0 && max.x <= 180.0 && min.y >= -90.0 && max.y <= 90.0;
    let x_scale = if geographic {
        ((min.y + max.y) / 2.0).to_radians().cos().max(1e-6)
    } else {
        1.0
    };

    let (cx, cy) = ((min.x + max.x) / 2.0, (min.y + max.y) / 2.0);
    // Smallest span that still moves coordinates of this magnitude.
    let floor = 1e-6 * cx.abs().max(cy.abs()).max(1.0);

    let pad = 1.06;
    let mut w = (max.x - min.x).max(floor) * x_scale * pad;
    let mut h = (max.y - min.y).max(floor) * pad;
    let target = width.max(1) as f64 / height.max(1) as f64;
    if w / h > target {
        h = w / target;
    } else {
        w = h * target;
    }

    let half_x = w / x_scale / 2.0;
    let half_y = h / 2.0;
    ((cx - half_x)..(cx + half_x), (cy - half_y)..(cy + half_y))
}
