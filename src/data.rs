use crate::config::InputConfig;
use crate::join::{join, JoinReport};
use crate::types::{Boundary, Neighborhoods};
use anyhow::{anyhow, Context, Result};
use geo::MultiPolygon;
use shapefile::Reader;
use std::fs::File;
use std::io::BufReader;
use tracing::{debug, info};

/// Reads the boundary file named by `input`, picking the reader from the
/// file extension.
pub fn load_boundaries(input: &InputConfig) -> Result<Vec<Boundary>> {
    let extension = input.boundaries.extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .ok_or_else(|| anyhow!("Boundary file has no extension: {:?}", input.boundaries))?;

    let boundaries = match extension.as_str() {
        "shp" => load_shapefile(input)?,
        "json" | "geojson" => load_geojson(input)?,
        _ => return Err(anyhow!("Unsupported geometry format: {}", extension)),
    };

    info!("Loaded {} boundaries from {:?}", boundaries.len(), input.boundaries);
    Ok(boundaries)
}

/// Loads the boundary file and joins it against `table`.
pub fn load_and_join(input: &InputConfig, table: &Neighborhoods) -> Result<JoinReport> {
    let boundaries = load_boundaries(input)?;
    let report = join(&boundaries, table.regions())
        .with_context(|| format!("Failed to join {:?} against the neighborhood table", input.boundaries))?;
    info!("Joined {} of {} neighborhoods", report.joined.len(), table.len());
    Ok(report)
}

fn load_shapefile(input: &InputConfig) -> Result<Vec<Boundary>> {
    let mut reader = Reader::from_path(&input.boundaries)
        .with_context(|| format!("Failed to open Shapefile: {:?}", input.boundaries))?;

    let mut boundaries = Vec::new();

    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result
            .with_context(|| format!("Failed to read Shapefile record: {:?}", input.boundaries))?;

        let name_value = record.get(&input.name_column)
            .ok_or_else(|| anyhow!("Name column '{}' not found in Shapefile", input.name_column))?;

        let raw_name = match name_value {
            shapefile::dbase::FieldValue::Character(Some(s)) => s.clone(),
            shapefile::dbase::FieldValue::Numeric(Some(n)) => n.to_string(),
            shapefile::dbase::FieldValue::Character(None)
            | shapefile::dbase::FieldValue::Numeric(None) => continue,
            other => return Err(anyhow!(
                "Shapefile name column '{}' must be text, got {:?}", input.name_column, other
            )),
        };

        let geometry: MultiPolygon<f64> = match shape {
            shapefile::Shape::Polygon(polygon) => polygon.try_into()
                .map_err(|e| anyhow!("Failed to convert polygon '{}': {:?}", raw_name, e))?,
            shapefile::Shape::PolygonM(polygon) => polygon.try_into()
                .map_err(|e| anyhow!("Failed to convert polygonM '{}': {:?}", raw_name, e))?,
            shapefile::Shape::PolygonZ(polygon) => polygon.try_into()
                .map_err(|e| anyhow!("Failed to convert polygonZ '{}': {:?}", raw_name, e))?,
            _ => {
                debug!("Skipping non-polygon shape '{}'", raw_name);
                continue;
            }
        };

        boundaries.push(Boundary { raw_name, geometry });
    }

    Ok(boundaries)
}

fn load_geojson(input: &InputConfig) -> Result<Vec<Boundary>> {
    use geojson::GeoJson;

    let file = File::open(&input.boundaries)
        .with_context(|| format!("Failed to open GeoJSON file: {:?}", input.boundaries))?;
    let geojson = GeoJson::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse GeoJSON: {:?}", input.boundaries))?;

    let collection = match geojson {
        GeoJson::FeatureCollection(fc) => fc,
        _ => return Err(anyhow!("GeoJSON must be a FeatureCollection")),
    };

    let mut boundaries = Vec::new();

    for feature in collection.features {
        let name_value = feature.properties.as_ref()
            .and_then(|props| props.get(&input.name_column));

        let raw_name = match name_value {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => continue,
        };

        let geometry = match feature.geometry {
            Some(geom) => {
                let value: geo::Geometry<f64> = geom.value.try_into()
                    .map_err(|e| anyhow!("Failed to convert geometry '{}': {:?}", raw_name, e))?;

                match value {
                    geo::Geometry::MultiPolygon(mp) => mp,
                    geo::Geometry::Polygon(p) => MultiPolygon::new(vec![p]),
                    _ => {
                        debug!("Skipping non-areal feature '{}'", raw_name);
                        continue;
                    }
                }
            }
            None => continue,
        };

        boundaries.push(Boundary { raw_name, geometry });
    }

    Ok(boundaries)
}
