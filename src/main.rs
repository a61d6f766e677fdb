use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use neighborhood_charts::config::AppConfig;
use neighborhood_charts::types::Neighborhoods;
use neighborhood_charts::{data, logger, render};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the crime bar chart, the correlation scatter and the equity comparison
    Charts {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
    },
    /// Join the boundary file against the table and render the choropleth
    Map {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
    },
    /// Render every chart and the map
    All {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
    },
    /// Print which neighborhoods match the boundary file
    Join {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init_logger(cli.verbose);

    let table = Neighborhoods::denver();

    match &cli.command {
        Commands::Charts { config } => {
            let app_config = AppConfig::load_or_default(config)?;
            render_charts(&app_config, &table)?;
        }
        Commands::Map { config } => {
            let app_config = AppConfig::load_or_default(config)?;
            render_map(&app_config, &table)?;
        }
        Commands::All { config } => {
            let app_config = AppConfig::load_or_default(config)?;
            render_charts(&app_config, &table)?;
            render_map(&app_config, &table)?;
        }
        Commands::Join { config } => {
            let app_config = AppConfig::load_or_default(config)?;
            let report = data::load_and_join(&app_config.input, &table)?;

            println!("{:<30} {:>10}  BUCKET", "NEIGHBORHOOD", "CRIME RATE");
            for joined in &report.joined {
                println!("{:<30} {:>10.1}  {}", joined.region.name, joined.region.crime_rate, joined.bucket);
            }
            if !report.unmatched_regions.is_empty() {
                println!("\nNo boundary for: {}", report.unmatched_regions.join(", "));
            }
            if !report.unmatched_boundaries.is_empty() {
                println!("Boundaries without data: {}", report.unmatched_boundaries.len());
            }
        }
    }

    Ok(())
}

fn render_charts(config: &AppConfig, table: &Neighborhoods) -> Result<()> {
    render::render_crime_bars(table, &config.output)?;
    render::render_correlation_scatter(table, &config.output)?;
    render::render_equity_comparison(table, &config.comparison, &config.output)?;
    info!("Charts written to {:?}", config.output.dir);
    Ok(())
}

fn render_map(config: &AppConfig, table: &Neighborhoods) -> Result<()> {
    let report = data::load_and_join(&config.input, table)?;
    let path = render::render_choropleth(&report, &config.output)?;
    info!("Map written to {:?}", path);
    Ok(())
}
