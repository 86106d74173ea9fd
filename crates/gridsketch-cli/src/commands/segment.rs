use std::fs;

use anyhow::{bail, Context, Result};

use gridsketch_client::AoiService;
use gridsketch_core::config::LayeredConfig;
use gridsketch_core::models::SegmentParams;
use gridsketch_workflow::{MemorySketchSurface, SketchEvent, WorkflowController};

use crate::cli::SegmentArgs;
use crate::output::OutputWriter;
use crate::progress::create_spinner;
use crate::view::ConsoleView;

pub async fn execute(
    args: SegmentArgs,
    config: &LayeredConfig,
    output: &OutputWriter,
) -> Result<()> {
    let line = super::load_sketch(&args.sketch)?;
    let service = super::service(config)?;

    let surface = MemorySketchSurface::with_sketch(line);
    let mut controller =
        WorkflowController::new(surface, ConsoleView::new(*output), service.clone());
    controller.set_params(SegmentParams::new(
        args.grid_area.unwrap_or(config.grid_area_sqkm.value),
        args.buffer.unwrap_or(config.buffer_km.value),
    ));
    controller.handle_sketch_event(SketchEvent::Created { feature_count: 1 });

    let submission = controller.begin_finish()?;
    let spinner = create_spinner("Waiting for the processing service...");
    let response = service.process_aoi(&submission.payload()).await;
    spinner.finish_and_clear();
    controller.complete_process(submission, response)?;

    let closed = controller
        .processed_aoi()
        .map(|aoi| aoi.is_closed())
        .unwrap_or(false);
    if !closed {
        if !args.close {
            bail!("The sketch is an open line; pass --close to close the loop before segmenting");
        }
        if let Some(submission) = controller.begin_close_loop()? {
            let spinner = create_spinner("Waiting for the processing service...");
            let response = service.process_aoi(&submission.payload()).await;
            spinner.finish_and_clear();
            controller.complete_process(submission, response)?;
        }
    }

    let submission = controller.begin_segment()?;
    let spinner = create_spinner("Waiting for the segmentation service...");
    let response = service.segment_aoi(&submission.payload()).await;
    spinner.finish_and_clear();
    controller.complete_segment(submission, response)?;

    let outcome = controller
        .segmentation()
        .context("segmentation finished without a result")?;
    let grid = serde_json::to_string_pretty(&outcome.segmented_geojson)?;
    fs::write(&args.output, grid)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    output.success(format!(
        "Segmented grid ({} cells) written to {}",
        outcome.cell_count(),
        args.output.display()
    ));

    Ok(())
}
