//! WorkbenchView adapter rendering controller output to the terminal.
//!
//! Overlays have no visual counterpart in a headless run; they are logged
//! for diagnostics instead.

use tabled::Tabled;

use gridsketch_core::models::{AoiStats, ControlSet, SegmentParams};
use gridsketch_workflow::{Overlay, WorkbenchView};

use crate::output::OutputWriter;

pub struct ConsoleView {
    output: OutputWriter,
}

impl ConsoleView {
    pub fn new(output: OutputWriter) -> Self {
        Self { output }
    }
}

#[derive(Tabled)]
struct StatRow {
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Value")]
    value: String,
}

fn stat_rows(stats: &AoiStats) -> Vec<StatRow> {
    let centroid = match (stats.centroid.lon, stats.centroid.lat) {
        (Some(lon), Some(lat)) => format!("{}, {}", lon, lat),
        _ => "-".to_string(),
    };

    vec![
        StatRow {
            field: "Points".to_string(),
            value: stats.num_points.to_string(),
        },
        StatRow {
            field: "Area".to_string(),
            value: stats.area_display(),
        },
        StatRow {
            field: "Closed loop".to_string(),
            value: if stats.is_closed { "Yes" } else { "No" }.to_string(),
        },
        StatRow {
            field: "Centroid".to_string(),
            value: centroid,
        },
    ]
}

impl WorkbenchView for ConsoleView {
    fn info(&self, message: &str) {
        self.output.info(message);
    }

    fn success(&self, message: &str) {
        self.output.success(message);
    }

    fn error(&self, message: &str) {
        self.output.error(message);
    }

    fn show_stats(&self, stats: &AoiStats) {
        if self.output.is_json() {
            if let Err(e) = self.output.result(stats) {
                tracing::error!("failed to serialize stats: {}", e);
            }
        } else {
            self.output.table(stat_rows(stats));
        }
    }

    fn clear_stats(&self) {
        // Nothing to clear on a scrolling terminal
    }

    fn upsert_overlay(&self, overlay: Overlay, data: &geojson::FeatureCollection, visible: bool) {
        tracing::debug!(?overlay, features = data.features.len(), visible, "overlay updated");
    }

    fn remove_overlay(&self, overlay: Overlay) {
        tracing::debug!(?overlay, "overlay removed");
    }

    fn set_overlay_visibility(&self, overlay: Overlay, visible: bool) {
        tracing::debug!(?overlay, visible, "overlay visibility changed");
    }

    fn show_download(&self, url: &str) {
        self.output.kv("Download", url);
    }

    fn clear_download(&self) {}

    fn reset_inputs(&self, params: &SegmentParams) {
        tracing::debug!(
            grid_area_sqkm = params.grid_area_sqkm,
            buffer_km = params.buffer_km,
            "inputs reset"
        );
    }

    fn controls_changed(&self, controls: &ControlSet) {
        tracing::debug!(?controls, "controls changed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridsketch_core::models::Centroid;

    #[test]
    fn test_stat_rows_annotate_open_loop() {
        let stats = AoiStats {
            num_points: 3,
            area_sqkm: 0.0,
            is_closed: false,
            centroid: Centroid::new(0.5, 0.5),
        };

        let rows = stat_rows(&stats);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[1].value, "0 km² (open loop)");
        assert_eq!(rows[2].value, "No");
        assert_eq!(rows[3].value, "0.5, 0.5");
    }

    #[test]
    fn test_stat_rows_with_null_centroid() {
        let stats = AoiStats {
            num_points: 2,
            area_sqkm: 0.0,
            is_closed: false,
            centroid: Centroid::default(),
        };

        let rows = stat_rows(&stats);
        assert_eq!(rows[3].value, "-");
    }
}
