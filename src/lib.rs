//! Crime, after-school program and equity charts for a fixed table of Denver
//! neighborhoods, plus a choropleth joined against a GIS boundary file.
//!
//! The two pieces with real decisions in them are [`join`] (name
//! normalization and the inner join) and [`classify`] (rate buckets).

pub mod classify;
pub mod config;
pub mod data;
pub mod join;
pub mod logger;
pub mod render;
pub mod stats;
pub mod types;

pub use classify::{classify, ColorBucket};
pub use config::AppConfig;
pub use join::{join, normalize, JoinError, JoinReport};
pub use types::{Boundary, JoinedRegion, Neighborhoods, Region};
