//! The workflow controller: a state machine reconciling drawing-surface
//! events and user actions with round trips to the geometry service.
//!
//! The controller exclusively owns the processed AOI and the segmentation
//! result. Geometry-changing events invalidate derived state before any
//! view update can read it, and every dispatched request carries a
//! generation counter so a response that arrives after an invalidating
//! event is discarded instead of resurrecting stale data.
//!
//! Requests run in two phases: `begin_*` validates preconditions, snapshots
//! the geometry, and moves into the in-flight state; `complete_*` applies
//! the response. The async `finish` / `close_loop` / `segment` wrappers
//! drive both phases against the controller's own service handle; a host
//! with its own event loop can drive the phases separately.

use geojson::FeatureCollection;

use gridsketch_client::AoiService;
use gridsketch_core::error::{GridsketchError, Result};
use gridsketch_core::models::{
    AoiStats, ControlSet, ProcessedAoi, SegmentOutcome, SegmentParams, SegmentRequest, SketchLine,
    WorkflowState,
};

use crate::ports::{DrawingSurface, Overlay, SketchEvent, WorkbenchView};

/// A dispatched process request: the geometry snapshot plus the generation
/// captured at send time. The snapshot is a deep copy, so later edits on
/// the surface cannot mutate an in-flight request.
#[derive(Debug, Clone)]
pub struct AoiSubmission {
    line: SketchLine,
    closing: bool,
    generation: u64,
}

impl AoiSubmission {
    /// The wire payload for the processing endpoint
    pub fn payload(&self) -> FeatureCollection {
        self.line.to_feature_collection()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// A dispatched segmentation request
#[derive(Debug, Clone)]
pub struct SegmentSubmission {
    line: SketchLine,
    params: SegmentParams,
    generation: u64,
}

impl SegmentSubmission {
    /// The wire payload for the segmentation endpoint
    pub fn payload(&self) -> SegmentRequest {
        SegmentRequest::new(&self.line, self.params)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Workflow controller orchestrating the drawing surface, the presentation
/// layer, and the remote geometry service
pub struct WorkflowController<S, V, A>
where
    S: DrawingSurface,
    V: WorkbenchView,
    A: AoiService,
{
    surface: S,
    view: V,
    service: A,

    state: WorkflowState,
    processed: Option<ProcessedAoi>,
    segmented: Option<SegmentOutcome>,
    params: SegmentParams,

    original_visible: bool,
    grid_visible: bool,

    /// Bumped by every invalidating event; in-flight responses whose
    /// captured generation no longer matches are discarded as stale.
    generation: u64,
}

impl<S, V, A> WorkflowController<S, V, A>
where
    S: DrawingSurface,
    V: WorkbenchView,
    A: AoiService,
{
    /// Create a new controller in the initial state
    pub fn new(surface: S, view: V, service: A) -> Self {
        Self {
            surface,
            view,
            service,
            state: WorkflowState::Initial,
            processed: None,
            segmented: None,
            params: SegmentParams::default(),
            original_visible: true,
            grid_visible: true,
            generation: 0,
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn processed_aoi(&self) -> Option<&ProcessedAoi> {
        self.processed.as_ref()
    }

    pub fn segmentation(&self) -> Option<&SegmentOutcome> {
        self.segmented.as_ref()
    }

    pub fn params(&self) -> SegmentParams {
        self.params
    }

    /// Set the segmentation parameters. An existing grid is not recomputed;
    /// only an explicit segment action uses the new values.
    pub fn set_params(&mut self, params: SegmentParams) {
        self.params = params;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The currently enabled action controls
    pub fn controls(&self) -> ControlSet {
        ControlSet::derive(self.state, self.sketch_present(), self.processed.as_ref())
    }

    /// Toggle one overlay. Tracked so a later upsert of the same overlay
    /// keeps the user's choice.
    pub fn set_overlay_visibility(&mut self, overlay: Overlay, visible: bool) {
        match overlay {
            Overlay::OriginalAoi => self.original_visible = visible,
            Overlay::SegmentedGrid => self.grid_visible = visible,
        }
        self.view.set_overlay_visibility(overlay, visible);
    }

    /// React to a drawing-surface event
    pub fn handle_sketch_event(&mut self, event: SketchEvent) {
        tracing::debug!(?event, "sketch event");
        match event {
            SketchEvent::Created { feature_count } | SketchEvent::Updated { feature_count } => {
                // The processed AOI and grid describe geometry that no
                // longer exists; drop them before anything re-renders.
                self.invalidate_derived();
                if feature_count > 0 {
                    self.enter(WorkflowState::DrawComplete);
                } else {
                    self.enter(WorkflowState::Initial);
                }
            }
            SketchEvent::Deleted => {
                self.invalidate_derived();
                self.enter(WorkflowState::Initial);
                self.view.info("Drawing deleted. Draw a new AoI.");
            }
            SketchEvent::ModeChanged { feature_count }
            | SketchEvent::SelectionChanged { feature_count } => {
                // Keeps "Finish" reachable while a raw sketch exists; a
                // validated AOI is not invalidated by tool-mode churn.
                if self.processed.is_none() {
                    if feature_count > 0 {
                        self.enter(WorkflowState::DrawComplete);
                    } else {
                        self.enter(WorkflowState::Initial);
                    }
                }
            }
        }
    }

    /// Validate the raw sketch and dispatch it for processing.
    pub async fn finish(&mut self) -> Result<()> {
        let submission = self.begin_finish()?;
        let response = self.service.process_aoi(&submission.payload()).await;
        self.complete_process(submission, response)
    }

    /// Close the processed AOI's loop, resubmitting unless it is already a
    /// ring.
    pub async fn close_loop(&mut self) -> Result<()> {
        let Some(submission) = self.begin_close_loop()? else {
            return Ok(());
        };
        let response = self.service.process_aoi(&submission.payload()).await;
        self.complete_process(submission, response)
    }

    /// Segment the closed AOI into a grid with the current parameters.
    pub async fn segment(&mut self) -> Result<()> {
        let submission = self.begin_segment()?;
        let response = self.service.segment_aoi(&submission.payload()).await;
        self.complete_segment(submission, response)
    }

    /// Phase one of finish: validate the sketch and snapshot it.
    pub fn begin_finish(&mut self) -> Result<AoiSubmission> {
        let features = match self.surface.features() {
            Ok(features) => features,
            Err(e) => {
                self.view.error("Error: Drawing tool not available.");
                return Err(e);
            }
        };

        let line = match features.into_iter().next() {
            Some(line) if line.point_count() >= 2 => line,
            _ => {
                self.view
                    .error("No valid drawing (LineString >= 2 points) found.");
                self.enter(WorkflowState::Initial);
                return Err(GridsketchError::validation(
                    "finish requires a line with at least 2 points",
                ));
            }
        };

        tracing::info!(points = line.point_count(), "submitting sketch for processing");
        self.enter(WorkflowState::Processing);
        self.view.info("Processing AoI...");
        Ok(AoiSubmission {
            line,
            closing: false,
            generation: self.generation,
        })
    }

    /// Phase one of close-loop. Returns `None` when the loop was already
    /// closed and no request needs to be sent.
    pub fn begin_close_loop(&mut self) -> Result<Option<AoiSubmission>> {
        let line = match self.processed.as_ref() {
            Some(aoi) => aoi.line.clone(),
            None => {
                self.view.error("Error: No processed AoI data found to close.");
                return Err(GridsketchError::validation(
                    "close-loop requires a processed AoI",
                ));
            }
        };

        if line.point_count() < 3 {
            self.view.error("Cannot close loop: Need at least 3 points.");
            return Err(GridsketchError::validation(
                "close-loop requires at least 3 points",
            ));
        }

        if line.is_ring() {
            self.view.info("Loop is already closed.");
            if let Some(aoi) = self.processed.as_mut() {
                aoi.stats.is_closed = true;
            }
            self.enter(WorkflowState::FinishedClosed);
            return Ok(None);
        }

        let closed = line.closed();
        tracing::info!(points = closed.point_count(), "resubmitting force-closed ring");
        self.enter(WorkflowState::Processing);
        self.view.info("Closing loop and reprocessing...");
        Ok(Some(AoiSubmission {
            line: closed,
            closing: true,
            generation: self.generation,
        }))
    }

    /// Phase one of segment: check the preconditions locally, no request
    /// is sent when any of them fails.
    pub fn begin_segment(&mut self) -> Result<SegmentSubmission> {
        let line = match self.processed.as_ref() {
            Some(aoi) if aoi.is_closed() => aoi.line.clone(),
            _ => {
                self.view
                    .error("Cannot segment: Processed AoI is not defined or not closed.");
                return Err(GridsketchError::validation(
                    "segmentation requires a closed, processed AoI",
                ));
            }
        };

        if line.point_count() < 4 {
            self.view
                .error("Cannot segment: Closed AoI needs at least 4 points (first=last).");
            return Err(GridsketchError::validation(
                "segmentation requires at least 4 points",
            ));
        }

        if let Err(e) = self.params.validate() {
            self.view.error(&e.to_string());
            return Err(e);
        }

        tracing::info!(
            grid_area_sqkm = self.params.grid_area_sqkm,
            buffer_km = self.params.buffer_km,
            "dispatching segmentation"
        );
        self.enter(WorkflowState::Segmenting);
        self.view.info("Segmenting AoI...");
        Ok(SegmentSubmission {
            line,
            params: self.params,
            generation: self.generation,
        })
    }

    /// Phase two of finish and close-loop: apply the processing response,
    /// unless it is stale.
    pub fn complete_process(
        &mut self,
        submission: AoiSubmission,
        response: Result<AoiStats>,
    ) -> Result<()> {
        let AoiSubmission { line, closing, generation } = submission;
        if generation != self.generation {
            tracing::warn!(
                sent = generation,
                current = self.generation,
                "discarding stale process response"
            );
            return Ok(());
        }

        match response {
            Ok(mut stats) => {
                if closing && !stats.is_closed {
                    // The geometry is a ring by construction; trust the
                    // local check over the server flag.
                    tracing::warn!(
                        "server reported is_closed=false for a force-closed ring; overriding"
                    );
                    stats.is_closed = true;
                }

                let is_closed = stats.is_closed;
                let aoi = ProcessedAoi::new(line, stats);

                // A fresh AOI supersedes any grid derived from the old one
                if self.segmented.take().is_some() {
                    self.view.remove_overlay(Overlay::SegmentedGrid);
                    self.view.clear_download();
                }

                self.view.show_stats(&aoi.stats);
                self.view.upsert_overlay(
                    Overlay::OriginalAoi,
                    &aoi.line.to_feature_collection(),
                    self.original_visible,
                );

                if closing {
                    // Push the validated ring back so the visible sketch
                    // matches what the server confirmed.
                    if let Err(e) = self.surface.replace(&aoi.line) {
                        tracing::error!("failed to push closed geometry to the surface: {}", e);
                        self.view
                            .error("Warning: Could not update the drawing on the surface.");
                    }
                }

                self.processed = Some(aoi);
                if is_closed {
                    self.enter(WorkflowState::FinishedClosed);
                } else {
                    self.enter(WorkflowState::FinishedOpen);
                }
                Ok(())
            }
            Err(e) if closing => {
                // The prior open AOI is still the last confirmed state;
                // the user can retry closing from it.
                self.view.error(&format!("Error closing loop: {}", e));
                self.enter(WorkflowState::FinishedOpen);
                Err(e)
            }
            Err(e) => {
                self.processed = None;
                if self.segmented.take().is_some() {
                    self.view.remove_overlay(Overlay::SegmentedGrid);
                    self.view.clear_download();
                }
                self.view.error(&format!("Error processing AoI: {}", e));
                if self.sketch_present() {
                    self.enter(WorkflowState::DrawComplete);
                } else {
                    self.enter(WorkflowState::Initial);
                }
                Err(e)
            }
        }
    }

    /// Phase two of segment: apply the segmentation response, unless it is
    /// stale.
    pub fn complete_segment(
        &mut self,
        submission: SegmentSubmission,
        response: Result<SegmentOutcome>,
    ) -> Result<()> {
        if submission.generation != self.generation {
            tracing::warn!(
                sent = submission.generation,
                current = self.generation,
                "discarding stale segmentation response"
            );
            return Ok(());
        }

        match response {
            Ok(outcome) => {
                let message = outcome
                    .message
                    .clone()
                    .unwrap_or_else(|| "Segmentation complete.".to_string());
                self.view.success(&message);
                self.view.upsert_overlay(
                    Overlay::SegmentedGrid,
                    &outcome.segmented_geojson,
                    self.grid_visible,
                );

                match outcome.filename.as_deref() {
                    Some(filename) => {
                        self.view.show_download(&self.service.download_url(filename));
                    }
                    None => {
                        tracing::warn!("segmentation succeeded but no filename was returned");
                        self.view.clear_download();
                    }
                }

                self.segmented = Some(outcome);
                self.enter(WorkflowState::Segmented);
                Ok(())
            }
            Err(e) => {
                self.segmented = None;
                self.view.remove_overlay(Overlay::SegmentedGrid);
                self.view.clear_download();
                self.view.error(&format!("Error during segmentation: {}", e));
                self.enter(WorkflowState::FinishedClosed);
                Err(e)
            }
        }
    }

    /// Discard every raw and derived state item and return to the initial
    /// state. Safe while a request is outstanding: the generation bump
    /// makes its eventual response stale.
    pub fn restart(&mut self) {
        tracing::info!("restarting workflow");
        self.invalidate_derived();
        self.params = SegmentParams::default();
        self.original_visible = true;
        self.grid_visible = true;
        self.view.set_overlay_visibility(Overlay::OriginalAoi, true);
        self.view.set_overlay_visibility(Overlay::SegmentedGrid, true);

        if let Err(e) = self.surface.delete_all() {
            tracing::error!("failed to clear the drawing surface: {}", e);
        }

        self.view.reset_inputs(&self.params);
        self.enter(WorkflowState::Initial);
    }

    /// Drop the processed AOI and segmentation result and bump the
    /// generation. Data goes first; the view updates that follow only ever
    /// see the already-cleared state.
    fn invalidate_derived(&mut self) {
        self.processed = None;
        self.segmented = None;
        self.generation += 1;

        self.view.clear_stats();
        self.view.clear_download();
        self.view.remove_overlay(Overlay::OriginalAoi);
        self.view.remove_overlay(Overlay::SegmentedGrid);
    }

    fn sketch_present(&self) -> bool {
        self.surface
            .features()
            .map(|features| !features.is_empty())
            .unwrap_or(false)
    }

    /// Move to a state and push the recomputed control set.
    fn enter(&mut self, state: WorkflowState) {
        if state != self.state {
            tracing::debug!(from = %self.state, to = %state, "state transition");
        }
        self.state = state;
        let controls = ControlSet::derive(state, self.sketch_present(), self.processed.as_ref());
        self.view.controls_changed(&controls);
    }
}
