//! PNG chart output.
//!
//! Every chart is drawn with `plotters` into an in-memory RGB buffer and then
//! encoded with `image`, so a failed write surfaces as an ordinary error.

mod bars;
mod choropleth;
mod comparison;
mod scatter;

pub use bars::render_crime_bars;
pub use choropleth::{fit_aspect, render_choropleth};
pub use comparison::render_equity_comparison;
pub use scatter::render_correlation_scatter;

use anyhow::{anyhow, Context, Result};
use image::RgbImage;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::OutputConfig;

pub const CRIME_BARS_FILE: &str = "neighborhood_crime_bars.png";
pub const CORRELATION_FILE: &str = "program_crime_correlation.png";
pub const COMPARISON_FILE: &str = "equity_crime_comparison.png";
pub const CHOROPLETH_FILE: &str = "denver_crime_map_labeled.png";

pub const FONT: &str = "sans-serif";

/// Pixel geometry of one figure: inches times dots per inch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    /// Pixels per typographic point.
    pub scale: f64,
}

impl Canvas {
    pub fn new(width_in: f64, height_in: f64, dpi: u32) -> Self {
        let dpi = dpi as f64;
        Canvas {
            width: (width_in * dpi).round() as u32,
            height: (height_in * dpi).round() as u32,
            scale: dpi / 72.0,
        }
    }

    /// Converts a size in points to whole pixels, never below one.
    pub fn px(&self, points: f64) -> u32 {
        (points * self.scale).round().max(1.0) as u32
    }

    pub fn font(&self, points: f64) -> f64 {
        points * self.scale
    }
}

pub fn output_path(output: &OutputConfig, file_name: &str) -> Result<PathBuf> {
    fs::create_dir_all(&output.dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output.dir))?;
    Ok(output.dir.join(file_name))
}

/// Runs `draw` on a white canvas and writes the result as a PNG at `path`.
pub fn save_png<F>(path: &Path, canvas: Canvas, draw: F) -> Result<()>
where
    F: FnOnce(&DrawingArea<BitMapBackend<'_>, Shift>) -> Result<()>,
{
    let mut buffer = vec![0u8; canvas.width as usize * canvas.height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (canvas.width, canvas.height))
            .into_drawing_area();
        root.fill(&WHITE)?;
        draw(&root)?;
        root.present()?;
    }

    let image = RgbImage::from_raw(canvas.width, canvas.height, buffer)
        .ok_or_else(|| anyhow!("Chart buffer does not match {}x{}", canvas.width, canvas.height))?;
    image.save(path).with_context(|| format!("Failed to save chart: {:?}", path))?;

    info!("Wrote {:?} ({}x{})", path, canvas.width, canvas.height);
    Ok(())
}

/// Discrete x axis for `count` categories. Plotters includes the end of an
/// integer range as a slot of its own, so the range stops at the last index.
pub fn category_axis(count: usize) -> std::ops::Range<usize> {
    0..count.saturating_sub(1)
}

/// Left and right edges of the bar in slot `index` out of `count`.
pub fn bar_span(index: usize, count: usize) -> (SegmentValue<usize>, SegmentValue<usize>) {
    let right = if index + 1 >= count { SegmentValue::Last } else { SegmentValue::Exact(index + 1) };
    (SegmentValue::Exact(index), right)
}

pub fn category_label(names: &[&str], value: &SegmentValue<usize>) -> String {
    match value {
        SegmentValue::CenterOf(i) => names.get(*i).map(|n| n.to_string()).unwrap_or_default(),
        _ => String::new(),
    }
}

/// Pads `[min, max]` by `fraction` of its span on both ends.
pub fn padded_range(min: f64, max: f64, fraction: f64) -> std::ops::Range<f64> {
    let span = max - min;
    let pad = if span > 0.0 { span * fraction } else { 1.0 };
    (min - pad)..(max + pad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use plotters::prelude::*;

    #[test]
    fn test_canvas_from_inches() {
        let canvas = Canvas::new(12.0, 6.0, 300);
        assert_eq!((canvas.width, canvas.height), (3600, 1800));
        assert_eq!(canvas.px(12.0), 50);
        assert_eq!(Canvas::new(10.0, 8.0, 72).px(0.1), 1);
    }

    #[test]
    fn test_category_axis_has_one_slot_per_name() {
        use plotters::coord::ranged1d::Ranged;

        let axis = category_axis(8).into_segmented();
        let center_of_last = axis.map(&SegmentValue::CenterOf(7), (0, 800));
        assert!((center_of_last - 750).abs() <= 2, "last slot centered at {center_of_last}");
        assert_eq!(axis.map(&SegmentValue::Exact(0), (0, 800)), 0);

        let (left, right) = bar_span(7, 8);
        assert_eq!(axis.map(&right, (0, 800)), 800);
        assert!((axis.map(&left, (0, 800)) - 700).abs() <= 2);
    }

    #[test]
    fn test_single_category_fills_axis() {
        let (left, right) = bar_span(0, 1);
        assert!(matches!(left, SegmentValue::Exact(0)));
        assert!(matches!(right, SegmentValue::Last));
        assert_eq!(category_axis(1), 0..0);
    }

    #[test]
    fn test_category_label_only_at_centers() {
        let names = ["Highland", "Auraria"];
        assert_eq!(category_label(&names, &SegmentValue::CenterOf(1)), "Auraria");
        assert_eq!(category_label(&names, &SegmentValue::CenterOf(2)), "");
        assert_eq!(category_label(&names, &SegmentValue::Exact(0)), "");
    }

    #[test]
    fn test_padded_range() {
        assert_eq!(padded_range(0.0, 10.0, 0.1), -1.0..11.0);
        assert_eq!(padded_range(5.0, 5.0, 0.1), 4.0..6.0);
    }

    #[test]
    fn test_output_path_creates_dir() {
        let dir = tempfile::tempdir().unwrap();
        let output = OutputConfig { dir: dir.path().join("charts"), dpi: 72 };
        let path = output_path(&output, CRIME_BARS_FILE).unwrap();
        assert!(output.dir.is_dir());
        assert_eq!(path, output.dir.join("neighborhood_crime_bars.png"));
    }
}
