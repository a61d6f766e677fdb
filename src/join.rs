use std::collections::HashMap;

use geo::MultiPolygon;
use thiserror::Error;
use tracing::{debug, warn};

use crate::classify::classify;
use crate::types::{Boundary, JoinedRegion, Region};

#[derive(Error, Debug, PartialEq)]
pub enum JoinError {
    #[error("more than one region normalizes to '{key}'")]
    DuplicateRegion { key: String },
}

/// Result of matching boundaries against the attribute table.
#[derive(Debug, Clone, Default)]
pub struct JoinReport {
    pub joined: Vec<JoinedRegion>,
    pub unmatched_boundaries: Vec<String>,
    pub unmatched_regions: Vec<String>,
}

/// Canonical join key: surrounding whitespace removed, ASCII uppercased.
pub fn normalize(name: &str) -> String {
    name.trim().to_ascii_uppercase()
}

/// Inner join of `boundaries` and `regions` on their normalized names.
///
/// Output follows boundary order. Boundaries sharing a key are dissolved into
/// one before matching, so every region is joined at most once. Regions
/// sharing a key are rejected.
pub fn join(boundaries: &[Boundary], regions: &[Region]) -> Result<JoinReport, JoinError> {
    let mut by_key: HashMap<String, &Region> = HashMap::new();
    for region in regions {
        let key = normalize(&region.name);
        if by_key.insert(key.clone(), region).is_some() {
            return Err(JoinError::DuplicateRegion { key });
        }
    }

    let mut report = JoinReport::default();
    let mut seen: HashMap<String, usize> = HashMap::new();

    for boundary in dissolve(boundaries) {
        let key = normalize(&boundary.raw_name);
        match by_key.get(&key) {
            Some(region) => {
                debug!("Matched boundary '{}' to region '{}'", boundary.raw_name, region.name);
                seen.insert(key, report.joined.len());
                report.joined.push(JoinedRegion {
                    bucket: classify(region.crime_rate),
                    region: (*region).clone(),
                    boundary,
                });
            }
            None => report.unmatched_boundaries.push(boundary.raw_name),
        }
    }

    report.unmatched_regions = regions
        .iter()
        .filter(|r| !seen.contains_key(&normalize(&r.name)))
        .map(|r| r.name.clone())
        .collect();

    if !report.unmatched_regions.is_empty() {
        warn!(
            "{} region(s) have no boundary and are left off the map: {}",
            report.unmatched_regions.len(),
            report.unmatched_regions.join(", ")
        );
    }
    if !report.unmatched_boundaries.is_empty() {
        warn!(
            "{} boundary row(s) have no matching region",
            report.unmatched_boundaries.len()
        );
        debug!("Unmatched boundaries: {}", report.unmatched_boundaries.join(", "));
    }

    Ok(report)
}

/// Merges boundaries with equal normalized names, keeping first-seen order
/// and the first raw name.
fn dissolve(boundaries: &[Boundary]) -> Vec<Boundary> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut merged: Vec<Boundary> = Vec::with_capacity(boundaries.len());

    for boundary in boundaries {
        let key = normalize(&boundary.raw_name);
        match index.get(&key) {
            Some(&i) => {
                debug!("Dissolving repeated boundary '{}'", boundary.raw_name);
                let mut polygons = std::mem::take(&mut merged[i].geometry.0);
                polygons.extend(boundary.geometry.0.iter().cloned());
                merged[i].geometry = MultiPolygon::new(polygons);
            }
            None => {
                index.insert(key, merged.len());
                merged.push(boundary.clone());
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ColorBucket;
    use crate::types::Neighborhoods;
    use geo::{polygon, MultiPolygon};

    fn square(name: &str, x: f64) -> Boundary {
        Boundary {
            raw_name: name.to_string(),
            geometry: MultiPolygon::new(vec![polygon![
                (x: x, y: 0.0),
                (x: x + 1.0, y: 0.0),
                (x: x + 1.0, y: 1.0),
                (x: x, y: 1.0),
            ]]),
        }
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Five Points "), "FIVE POINTS");
        assert_eq!(normalize("FIVE POINTS"), "FIVE POINTS");
        assert_eq!(normalize("\tauraria\n"), "AURARIA");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for s in ["  Five Points ", "Gateway-Green Valley Ranch", "", " x ", "Ünïcode  "] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn test_join_two_matches() {
        let table = Neighborhoods::denver();
        let boundaries = vec![square("FIVE POINTS", 0.0), square("AURARIA", 2.0)];

        let report = join(&boundaries, table.regions()).unwrap();

        assert_eq!(report.joined.len(), 2);
        assert_eq!(report.joined[0].region.crime_rate, 85.0);
        assert_eq!(report.joined[0].bucket, ColorBucket::Critical);
        assert_eq!(report.joined[1].region.crime_rate, 55.0);
        assert_eq!(report.joined[1].bucket, ColorBucket::High);
        assert!(report.unmatched_boundaries.is_empty());
        assert_eq!(report.unmatched_regions.len(), 6);
    }

    #[test]
    fn test_unmatched_boundaries_are_reported() {
        let table = Neighborhoods::denver();
        let boundaries = vec![square("Sloan Lake", 0.0), square(" highland ", 1.0)];

        let report = join(&boundaries, table.regions()).unwrap();

        assert_eq!(report.joined.len(), 1);
        assert_eq!(report.joined[0].region.name, "Highland");
        assert_eq!(report.unmatched_boundaries, vec!["Sloan Lake".to_string()]);
    }

    #[test]
    fn test_duplicate_region_key_rejected() {
        let regions = vec![
            Region::new("Highland", 45.0, 15, 3.8),
            Region::new("  HIGHLAND", 40.0, 10, 3.0),
        ];
        let err = join(&[square("Highland", 0.0)], &regions).unwrap_err();
        assert_eq!(err, JoinError::DuplicateRegion { key: "HIGHLAND".to_string() });
    }

    #[test]
    fn test_repeated_boundary_is_dissolved() {
        let table = Neighborhoods::denver();
        let boundaries = vec![
            square("Auraria", 0.0),
            square("AURARIA ", 3.0),
            square("Montbello", 5.0),
        ];

        let report = join(&boundaries, table.regions()).unwrap();

        assert_eq!(report.joined.len(), 2);
        assert_eq!(report.joined[0].boundary.raw_name, "Auraria");
        assert_eq!(report.joined[0].boundary.geometry.0.len(), 2);
        assert!(report.joined.len() <= boundaries.len().min(table.len()));
    }

    #[test]
    fn test_join_size_bounded_by_smaller_table() {
        let table = Neighborhoods::denver();
        let boundaries: Vec<Boundary> = table
            .regions()
            .iter()
            .enumerate()
            .map(|(i, r)| square(&r.name.to_lowercase(), i as f64))
            .chain(std::iter::once(square("Union Station", 20.0)))
            .collect();

        let report = join(&boundaries, table.regions()).unwrap();

        assert_eq!(report.joined.len(), 8);
        assert!(report.joined.len() <= boundaries.len().min(table.len()));
        assert!(report.unmatched_regions.is_empty());
    }

    #[test]
    fn test_empty_inputs() {
        let report = join(&[], &[]).unwrap();
        assert!(report.joined.is_empty());
        assert!(report.unmatched_regions.is_empty());
    }
}
