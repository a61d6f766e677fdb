use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub comparison: ComparisonConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    pub boundaries: PathBuf, // .shp, .json or .geojson
    pub name_column: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig {
            boundaries: PathBuf::from("data/neighborhoods/ADMN_NEIGHBORHOOD_A.shp"),
            name_column: "NBHD_NAME".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub dpi: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig { dir: PathBuf::from("."), dpi: 300 }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Neighborhoods shown on the equity vs crime chart.
    pub neighborhoods: Vec<String>,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        let names = [
            "Five Points",
            "Capitol Hill",
            "Highland",
            "Cherry Creek",
            "Washington Park",
            "Montbello",
        ];
        ComparisonConfig { neighborhoods: names.iter().map(|n| n.to_string()).collect() }
    }
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML configuration: {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise falls back to the built-in defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            info!("No config at {:?}, using defaults", path);
            Ok(AppConfig::default())
        }
    }

    fn validate(&self) -> Result<()> {
        if !(1..=1200).contains(&self.output.dpi) {
            bail!("output.dpi must be between 1 and 1200, got {}", self.output.dpi);
        }
        if self.input.name_column.trim().is_empty() {
            bail!("input.name_column must not be empty");
        }
        Ok(())
    }
}
