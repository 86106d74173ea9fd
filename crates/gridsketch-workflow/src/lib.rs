//! Gridsketch Workflow - the sketch-to-grid workflow controller
//!
//! This crate holds the core of the workbench: the `WorkflowController`
//! state machine that reconciles drawing-surface events with round trips
//! to the remote geometry service, plus the `DrawingSurface` and
//! `WorkbenchView` ports it drives. The controller owns the canonical
//! processed AOI and segmentation result and guarantees the displayed
//! geometry and statistics never go out of sync.

pub mod controller;
pub mod ports;
pub mod surface;
pub mod view;

pub use controller::{AoiSubmission, SegmentSubmission, WorkflowController};
pub use ports::{DrawingSurface, Overlay, SketchEvent, WorkbenchView};
pub use surface::MemorySketchSurface;
pub use view::{MessageLevel, NullView, RecordingView, ViewEvent};
