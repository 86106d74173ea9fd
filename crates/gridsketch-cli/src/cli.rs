use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Gridsketch - sketch-to-grid workbench for areas of interest
#[derive(Parser, Debug)]
#[command(name = "gridsketch")]
#[command(about = "Turn a sketched boundary line into a validated, gridded AOI", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Base URL of the AOI processing service
    #[arg(long, global = true)]
    pub server_url: Option<String>,

    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process a sketched line and print its statistics
    Stats(StatsArgs),

    /// Process a sketch, close it, and segment it into a grid
    Segment(SegmentArgs),
}

#[derive(Parser, Debug)]
pub struct StatsArgs {
    /// Path to a GeoJSON file holding the sketched line
    /// (FeatureCollection, Feature, or bare LineString geometry)
    pub sketch: PathBuf,

    /// Close the loop before reporting statistics
    #[arg(long)]
    pub close: bool,
}

#[derive(Parser, Debug)]
pub struct SegmentArgs {
    /// Path to a GeoJSON file holding the sketched line
    pub sketch: PathBuf,

    /// Target area of each grid cell in km²
    #[arg(long)]
    pub grid_area: Option<f64>,

    /// Buffer distance around the AOI in km
    #[arg(long)]
    pub buffer: Option<f64>,

    /// Close the loop automatically if the sketch is open
    #[arg(long)]
    pub close: bool,

    /// Where to write the segmented grid GeoJSON
    #[arg(long, short = 'o', default_value = "segmented_aoi.geojson")]
    pub output: PathBuf,
}
