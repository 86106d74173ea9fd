use anyhow::Result;

use gridsketch_client::AoiService;
use gridsketch_core::config::LayeredConfig;
use gridsketch_workflow::{MemorySketchSurface, SketchEvent, WorkflowController};

use crate::cli::StatsArgs;
use crate::output::OutputWriter;
use crate::progress::create_spinner;
use crate::view::ConsoleView;

pub async fn execute(args: StatsArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let line = super::load_sketch(&args.sketch)?;
    let service = super::service(config)?;

    let surface = MemorySketchSurface::with_sketch(line);
    let mut controller =
        WorkflowController::new(surface, ConsoleView::new(*output), service.clone());
    controller.handle_sketch_event(SketchEvent::Created { feature_count: 1 });

    let submission = controller.begin_finish()?;
    let spinner = create_spinner("Waiting for the processing service...");
    let response = service.process_aoi(&submission.payload()).await;
    spinner.finish_and_clear();
    controller.complete_process(submission, response)?;

    if args.close {
        if let Some(submission) = controller.begin_close_loop()? {
            let spinner = create_spinner("Waiting for the processing service...");
            let response = service.process_aoi(&submission.payload()).await;
            spinner.finish_and_clear();
            controller.complete_process(submission, response)?;
        }
    }

    Ok(())
}
