//! Segmentation parameters and results.

use geojson::FeatureCollection;
use serde::{Deserialize, Serialize};

use crate::error::{GridsketchError, Result};
use crate::models::geometry::SketchLine;

/// Default target cell area in km²
pub const DEFAULT_GRID_AREA_SQKM: f64 = 20.0;

/// Default buffer distance in km
pub const DEFAULT_BUFFER_KM: f64 = 0.0;

/// User-supplied segmentation inputs, validated locally before any request
/// is sent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentParams {
    pub grid_area_sqkm: f64,
    pub buffer_km: f64,
}

impl Default for SegmentParams {
    fn default() -> Self {
        Self {
            grid_area_sqkm: DEFAULT_GRID_AREA_SQKM,
            buffer_km: DEFAULT_BUFFER_KM,
        }
    }
}

impl SegmentParams {
    pub fn new(grid_area_sqkm: f64, buffer_km: f64) -> Self {
        Self { grid_area_sqkm, buffer_km }
    }

    /// Check the local preconditions: a positive grid area and a
    /// non-negative buffer. NaN fails both.
    pub fn validate(&self) -> Result<()> {
        if !self.grid_area_sqkm.is_finite() || self.grid_area_sqkm <= 0.0 {
            return Err(GridsketchError::validation(
                "Grid area must be a positive number",
            ));
        }
        if !self.buffer_km.is_finite() || self.buffer_km < 0.0 {
            return Err(GridsketchError::validation(
                "Buffer distance must not be negative",
            ));
        }
        Ok(())
    }
}

/// Wire request for the segmentation endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentRequest {
    pub aoi: FeatureCollection,
    pub grid_area_sqkm: f64,
    pub buffer_km: f64,
}

impl SegmentRequest {
    pub fn new(aoi: &SketchLine, params: SegmentParams) -> Self {
        Self {
            aoi: aoi.to_feature_collection(),
            grid_area_sqkm: params.grid_area_sqkm,
            buffer_km: params.buffer_km,
        }
    }
}

/// The grid the segmentation service returned: polygon cells plus an
/// optional downloadable-artifact name.
///
/// Valid only while derived from the current processed AOI. Never
/// recomputed implicitly when parameters change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentOutcome {
    pub segmented_geojson: FeatureCollection,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
}

impl SegmentOutcome {
    pub fn cell_count(&self) -> usize {
        self.segmented_geojson.features.len()
    }
}
