use geo::{polygon, MultiPolygon};
use neighborhood_charts::config::{ComparisonConfig, OutputConfig};
use neighborhood_charts::render::{
    render_choropleth, render_correlation_scatter, render_crime_bars, render_equity_comparison,
    CHOROPLETH_FILE, COMPARISON_FILE, CORRELATION_FILE, CRIME_BARS_FILE,
};
use neighborhood_charts::{join, Boundary, JoinReport, Neighborhoods};
use std::path::Path;
use tempfile::TempDir;

const DPI: u32 = 40;

fn output_in(dir: &Path) -> OutputConfig {
    OutputConfig { dir: dir.to_path_buf(), dpi: DPI }
}

fn block(name: &str, x: f64, y: f64) -> Boundary {
    Boundary {
        raw_name: name.to_string(),
        geometry: MultiPolygon::new(vec![polygon![
            (x: x, y: y),
            (x: x + 0.02, y: y),
            (x: x + 0.02, y: y + 0.02),
            (x: x, y: y + 0.02),
        ]]),
    }
}

fn denver_report() -> JoinReport {
    let boundaries = vec![
        block("FIVE POINTS", -104.98, 39.75),
        block("Capitol Hill", -104.98, 39.73),
        block("auraria", -105.01, 39.74),
        block("Washington Park", -104.97, 39.70),
    ];
    join(&boundaries, Neighborhoods::denver().regions()).unwrap()
}

fn assert_png(path: &Path, width: u32, height: u32) {
    assert!(path.exists(), "{:?} was not written", path);
    let image = image::open(path).unwrap();
    assert_eq!((image.width(), image.height()), (width, height), "size of {:?}", path);
}

#[test]
fn test_charts_written_at_figure_size() {
    let temp_dir = TempDir::new().unwrap();
    let output = output_in(temp_dir.path());
    let table = Neighborhoods::denver();

    let bars = render_crime_bars(&table, &output).unwrap();
    let scatter = render_correlation_scatter(&table, &output).unwrap();
    let comparison = render_equity_comparison(&table, &ComparisonConfig::default(), &output).unwrap();

    assert_eq!(bars, temp_dir.path().join(CRIME_BARS_FILE));
    assert_eq!(scatter, temp_dir.path().join(CORRELATION_FILE));
    assert_eq!(comparison, temp_dir.path().join(COMPARISON_FILE));

    // 12 x 6 and 10 x 8 inches
    assert_png(&bars, 480, 240);
    assert_png(&scatter, 400, 320);
    assert_png(&comparison, 480, 240);
}

#[test]
fn test_choropleth_written_for_joined_regions() {
    let temp_dir = TempDir::new().unwrap();
    let report = denver_report();
    assert_eq!(report.joined.len(), 4);

    let map = render_choropleth(&report, &output_in(temp_dir.path())).unwrap();

    assert_eq!(map, temp_dir.path().join(CHOROPLETH_FILE));
    assert_png(&map, 400, 320);
}

#[test]
fn test_choropleth_of_single_point_extent() {
    let temp_dir = TempDir::new().unwrap();
    let point = Boundary {
        raw_name: "Highland".to_string(),
        geometry: MultiPolygon::new(vec![polygon![
            (x: -104.9, y: 39.7),
            (x: -104.9, y: 39.7),
            (x: -104.9, y: 39.7),
        ]]),
    };
    let report = join(&[point], Neighborhoods::denver().regions()).unwrap();

    let map = render_choropleth(&report, &output_in(temp_dir.path())).unwrap();

    assert_png(&map, 400, 320);
}

#[test]
fn test_unwritable_output_dir_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"file").unwrap();
    let output = output_in(&blocker.join("charts"));
    let table = Neighborhoods::denver();

    assert!(render_crime_bars(&table, &output).is_err());
    assert!(render_correlation_scatter(&table, &output).is_err());
    assert!(render_equity_comparison(&table, &ComparisonConfig::default(), &output).is_err());
    assert!(render_choropleth(&denver_report(), &output).is_err());
}

#[test]
fn test_unknown_comparison_names_are_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let comparison = ComparisonConfig { neighborhoods: vec!["Sloan Lake".to_string()] };

    let result = render_equity_comparison(&Neighborhoods::denver(), &comparison, &output_in(temp_dir.path()));

    assert!(result.is_err());
    assert!(!temp_dir.path().join(COMPARISON_FILE).exists());
}
