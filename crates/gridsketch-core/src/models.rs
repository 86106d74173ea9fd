//! Domain models for the gridsketch workbench

pub mod geometry;
pub mod segmentation;
pub mod stats;
pub mod workflow;

pub use geometry::SketchLine;
pub use segmentation::{SegmentOutcome, SegmentParams, SegmentRequest};
pub use stats::{AoiStats, Centroid, ProcessedAoi};
pub use workflow::{ControlSet, WorkflowState};
