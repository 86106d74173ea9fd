//! Command implementations

mod segment;
mod stats;

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};

use gridsketch_client::HttpAoiService;
use gridsketch_core::config::{CliConfigOverrides, LayeredConfig};
use gridsketch_core::models::SketchLine;

use crate::cli::{Cli, Commands};
use crate::output::OutputWriter;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Stats(args) => stats::execute(args, &config, &output).await,
        Commands::Segment(args) => segment::execute(args, &config, &output).await,
    }
}

/// Resolve the layered configuration: defaults, then file, then
/// environment, then CLI flags.
fn load_config(cli: &Cli) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();
    if let Some(path) = &cli.config {
        config = config
            .load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?;
    }
    let mut config = config.load_from_env();
    config.update_from_cli(CliConfigOverrides {
        service_url: cli.server_url.clone(),
        ..Default::default()
    });
    Ok(config)
}

/// Build the service adapter from the resolved configuration
fn service(config: &LayeredConfig) -> Result<HttpAoiService> {
    Ok(HttpAoiService::new(
        config.service_url.value.clone(),
        Duration::from_secs(config.request_timeout_secs.value),
    )?)
}

/// Load a sketched line from a GeoJSON file. Accepts a FeatureCollection,
/// a single Feature, or a bare LineString geometry.
fn load_sketch(path: &Path) -> Result<SketchLine> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read sketch file {}", path.display()))?;
    let geojson: geojson::GeoJson = content
        .parse()
        .with_context(|| format!("{} is not valid GeoJSON", path.display()))?;
    Ok(SketchLine::from_geojson(&geojson)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_load_sketch_from_feature_collection() {
        let file = write_file(
            r#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{},
                "geometry":{"type":"LineString","coordinates":[[0,0],[1,0],[1,1]]}}]}"#,
        );
        let line = load_sketch(file.path()).unwrap();
        assert_eq!(line.point_count(), 3);
    }

    #[test]
    fn test_load_sketch_from_bare_geometry() {
        let file = write_file(r#"{"type":"LineString","coordinates":[[0,0],[2,2]]}"#);
        let line = load_sketch(file.path()).unwrap();
        assert_eq!(line.point_count(), 2);
    }

    #[test]
    fn test_load_sketch_rejects_non_linestring() {
        let file = write_file(r#"{"type":"Point","coordinates":[0,0]}"#);
        assert!(load_sketch(file.path()).is_err());
    }

    #[test]
    fn test_load_sketch_rejects_invalid_json() {
        let file = write_file("not geojson at all");
        assert!(load_sketch(file.path()).is_err());
    }
}
