use geo::MultiPolygon;

use crate::classify::ColorBucket;

#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: String,
    pub crime_rate: f64,
    pub after_school_programs: u32,
    pub equity_score: f64, // 1-5
}

impl Region {
    pub fn new(name: &str, crime_rate: f64, after_school_programs: u32, equity_score: f64) -> Self {
        Region {
            name: name.to_string(),
            crime_rate,
            after_school_programs,
            equity_score,
        }
    }
}

/// The attribute table every chart is drawn from.
///
/// Built once and handed by reference to whatever needs it.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighborhoods {
    regions: Vec<Region>,
}

impl Neighborhoods {
    pub fn new(regions: Vec<Region>) -> Self {
        Neighborhoods { regions }
    }

    /// The eight Denver neighborhoods the charts are about.
    pub fn denver() -> Self {
        Neighborhoods::new(vec![
            Region::new("Five Points", 85.0, 5, 2.1),
            Region::new("Capitol Hill", 78.0, 8, 3.2),
            Region::new("Highland", 45.0, 15, 3.8),
            Region::new("Cherry Creek", 32.0, 22, 4.5),
            Region::new("Washington Park", 25.0, 18, 4.8),
            Region::new("Montbello", 68.0, 7, 2.3),
            Region::new("Gateway-Green Valley Ranch", 52.0, 9, 2.9),
            Region::new("Auraria", 55.0, 5, 3.1),
        ])
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Regions whose name is in `names`, kept in table order.
    pub fn select(&self, names: &[String]) -> Vec<&Region> {
        self.regions
            .iter()
            .filter(|r| names.iter().any(|n| n == &r.name))
            .collect()
    }

    pub fn sorted_by_crime_desc(&self) -> Vec<&Region> {
        let mut sorted: Vec<&Region> = self.regions.iter().collect();
        sorted.sort_by(|a, b| b.crime_rate.total_cmp(&a.crime_rate));
        sorted
    }

    pub fn after_school_programs(&self) -> Vec<f64> {
        self.regions.iter().map(|r| r.after_school_programs as f64).collect()
    }

    pub fn crime_rates(&self) -> Vec<f64> {
        self.regions.iter().map(|r| r.crime_rate).collect()
    }
}

#[derive(Debug, Clone)]
pub struct Boundary {
    pub raw_name: String,
    pub geometry: MultiPolygon<f64>,
}

#[derive(Debug, Clone)]
pub struct JoinedRegion {
    pub boundary: Boundary,
    pub region: Region,
    pub bucket: ColorBucket,
}
