//! Collaborator ports: the drawing surface and the presentation boundary

use geojson::FeatureCollection;
use gridsketch_core::error::Result;
use gridsketch_core::models::{AoiStats, ControlSet, SegmentParams, SketchLine};

/// A geometry or selection event reported by the drawing surface
///
/// Counts are the surface's feature count after the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SketchEvent {
    /// A feature was created
    Created { feature_count: usize },
    /// Feature coordinates changed or the feature was moved
    Updated { feature_count: usize },
    /// All features were removed
    Deleted,
    /// The tool mode changed (draw / select)
    ModeChanged { feature_count: usize },
    /// The selection changed without altering geometry
    SelectionChanged { feature_count: usize },
}

/// Port for the interactive drawing surface
///
/// The surface exclusively owns the raw sketch; the controller reads and
/// replaces it only through this contract.
pub trait DrawingSurface: Send + Sync {
    /// All features currently held by the sketch tool
    fn features(&self) -> Result<Vec<SketchLine>>;

    /// Replace the sketched feature with the given line
    fn replace(&self, line: &SketchLine) -> Result<()>;

    /// Remove every feature from the surface
    fn delete_all(&self) -> Result<()>;
}

/// The two overlays the controller manages on the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Overlay {
    /// Line overlay sourced from the processed AOI
    OriginalAoi,
    /// Filled polygon overlay sourced from the segmentation result
    SegmentedGrid,
}

/// Presentation boundary
///
/// Implementations render whatever the controller pushes and never feed
/// state back. Overlay upserts are idempotent: replace the data in place
/// when the source already exists, create it with the given visibility
/// otherwise. Visibility is user-toggled per overlay and must not be
/// affected by unrelated transitions.
pub trait WorkbenchView {
    fn info(&self, message: &str);
    fn success(&self, message: &str);
    fn error(&self, message: &str);

    fn show_stats(&self, stats: &AoiStats);
    fn clear_stats(&self);

    fn upsert_overlay(&self, overlay: Overlay, data: &FeatureCollection, visible: bool);
    fn remove_overlay(&self, overlay: Overlay);
    fn set_overlay_visibility(&self, overlay: Overlay, visible: bool);

    fn show_download(&self, url: &str);
    fn clear_download(&self);

    /// Reset the numeric inputs to the given defaults
    fn reset_inputs(&self, params: &SegmentParams);

    /// The enabled action controls changed
    fn controls_changed(&self, controls: &ControlSet);
}
