//! Service port definitions

use async_trait::async_trait;
use geojson::FeatureCollection;
use gridsketch_core::error::Result;
use gridsketch_core::models::{AoiStats, SegmentOutcome, SegmentRequest};

/// Port for the remote geometry-processing service
///
/// All geometry math (closure, area, centroid, grid partitioning) is
/// delegated here; the workflow never computes it locally.
#[async_trait]
pub trait AoiService: Send + Sync {
    /// Validate a sketched line and compute its statistics
    ///
    /// # Arguments
    /// * `aoi` - FeatureCollection holding exactly one LineString feature
    ///
    /// # Returns
    /// The point count, area, closure flag, and centroid for the line
    async fn process_aoi(&self, aoi: &FeatureCollection) -> Result<AoiStats>;

    /// Partition a closed AOI into a grid of cells
    ///
    /// # Arguments
    /// * `request` - the closed AOI plus grid area and buffer parameters
    ///
    /// # Returns
    /// The grid cells and, when the service saved an artifact, its filename
    async fn segment_aoi(&self, request: &SegmentRequest) -> Result<SegmentOutcome>;

    /// Build the retrieval URL for a segmentation artifact
    fn download_url(&self, filename: &str) -> String;
}
