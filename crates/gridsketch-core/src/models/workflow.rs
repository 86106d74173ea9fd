//! Workflow state vocabulary and derived control affordances.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::stats::ProcessedAoi;

/// The workbench states.
///
/// A pure function of {sketch present, processed AOI present and closed,
/// request in flight}, recomputed after every relevant event. `Initial` is
/// reachable from every state via restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    /// No usable sketch, no processed AOI
    Initial,
    /// Sketch exists, not yet server-validated
    DrawComplete,
    /// Finish or close-loop request in flight
    Processing,
    /// Processed AOI exists, not closed
    FinishedOpen,
    /// Processed AOI exists, closed
    FinishedClosed,
    /// Segment request in flight
    Segmenting,
    /// Segmentation result exists
    Segmented,
}

impl WorkflowState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowState::Initial => "initial",
            WorkflowState::DrawComplete => "draw_complete",
            WorkflowState::Processing => "processing",
            WorkflowState::FinishedOpen => "finished_open",
            WorkflowState::FinishedClosed => "finished_closed",
            WorkflowState::Segmenting => "segmenting",
            WorkflowState::Segmented => "segmented",
        }
    }

    /// Whether a request of either kind is outstanding.
    pub fn in_flight(&self) -> bool {
        matches!(self, WorkflowState::Processing | WorkflowState::Segmenting)
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which action controls are enabled.
///
/// Recomputed from state plus data on every transition, never left stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ControlSet {
    pub finish: bool,
    pub close_loop: bool,
    pub segment: bool,
    pub restart: bool,
}

impl ControlSet {
    /// Derive the enabled controls: finish only while a raw sketch awaits
    /// validation; close-loop only on an open AOI with enough points to
    /// form a ring; segment only on a closed AOI that can bound a region
    /// (re-segmentation with new parameters stays available after a grid
    /// exists); restart whenever there is anything to throw away.
    pub fn derive(
        state: WorkflowState,
        sketch_present: bool,
        processed: Option<&ProcessedAoi>,
    ) -> Self {
        Self {
            finish: state == WorkflowState::DrawComplete,
            close_loop: state == WorkflowState::FinishedOpen
                && processed.map(ProcessedAoi::can_close).unwrap_or(false),
            segment: matches!(
                state,
                WorkflowState::FinishedClosed | WorkflowState::Segmented
            ) && processed.map(ProcessedAoi::can_segment).unwrap_or(false),
            restart: sketch_present || processed.is_some(),
        }
    }

    /// Everything disabled.
    pub fn disabled() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::geometry::SketchLine;
    use crate::models::stats::{AoiStats, Centroid};

    fn processed(coords: Vec<[f64; 2]>, is_closed: bool) -> ProcessedAoi {
        let num_points = coords.len();
        ProcessedAoi::new(
            SketchLine::new(coords),
            AoiStats {
                num_points,
                area_sqkm: 0.0,
                is_closed,
                centroid: Centroid::default(),
            },
        )
    }

    #[test]
    fn test_initial_has_nothing_enabled() {
        let controls = ControlSet::derive(WorkflowState::Initial, false, None);
        assert_eq!(controls, ControlSet::disabled());
    }

    #[test]
    fn test_draw_complete_enables_finish_and_restart() {
        let controls = ControlSet::derive(WorkflowState::DrawComplete, true, None);
        assert!(controls.finish);
        assert!(controls.restart);
        assert!(!controls.close_loop);
        assert!(!controls.segment);
    }

    #[test]
    fn test_close_loop_needs_three_points() {
        let two = processed(vec![[0.0, 0.0], [1.0, 1.0]], false);
        let controls = ControlSet::derive(WorkflowState::FinishedOpen, true, Some(&two));
        assert!(!controls.close_loop);

        let three = processed(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]], false);
        let controls = ControlSet::derive(WorkflowState::FinishedOpen, true, Some(&three));
        assert!(controls.close_loop);
    }

    #[test]
    fn test_segment_needs_closed_ring_with_four_points() {
        let small_ring = processed(vec![[0.0, 0.0], [1.0, 0.0], [0.0, 0.0]], true);
        let controls = ControlSet::derive(WorkflowState::FinishedClosed, true, Some(&small_ring));
        assert!(!controls.segment);

        let ring = processed(
            vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]],
            true,
        );
        let controls = ControlSet::derive(WorkflowState::FinishedClosed, true, Some(&ring));
        assert!(controls.segment);

        // Re-segmentation stays available once a grid exists
        let controls = ControlSet::derive(WorkflowState::Segmented, true, Some(&ring));
        assert!(controls.segment);
    }

    #[test]
    fn test_restart_follows_data_presence() {
        let controls = ControlSet::derive(WorkflowState::Processing, true, None);
        assert!(controls.restart);

        let controls = ControlSet::derive(WorkflowState::Processing, false, None);
        assert!(!controls.restart);
    }

    #[test]
    fn test_state_names() {
        assert_eq!(WorkflowState::Initial.as_str(), "initial");
        assert_eq!(WorkflowState::DrawComplete.as_str(), "draw_complete");
        assert_eq!(WorkflowState::FinishedClosed.to_string(), "finished_closed");
        assert!(WorkflowState::Processing.in_flight());
        assert!(WorkflowState::Segmenting.in_flight());
        assert!(!WorkflowState::Segmented.in_flight());
    }
}
