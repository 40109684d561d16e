use crate::core::models::run_config::RunConfig;
use crate::engine::context::RunContext;
use crate::engine::error::EngineError;
use crate::engine::invoker::{self, RunOutcome};
use crate::engine::locator;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::report::job::{RunReport, StructureView};
use crate::report::page;
use std::fs;
use std::path::PathBuf;
use tracing::{info, instrument, warn};

/// Model whose structure is shown in the run report.
const REPORTED_MODEL: u32 = 0;

#[derive(Debug, Clone)]
pub struct PredictResult {
    pub outcome: RunOutcome,
    pub report_path: PathBuf,
    /// The structure embedded in the report, if the run produced one.
    pub structure: Option<PathBuf>,
}

#[instrument(skip_all, name = "predict_workflow", fields(session = %ctx.session_id(), job = %config.job_name))]
pub fn run(
    ctx: &RunContext,
    config: &RunConfig,
    reporter: &ProgressReporter,
) -> Result<PredictResult, EngineError> {
    let layout = ctx.layout(&config.job_name);

    reporter.report(Progress::PhaseStart {
        name: "Preparing input",
    });
    let prepared = invoker::clear_previous_output(&layout, config)
        .and_then(|_| invoker::stage_input(&layout));
    reporter.report(Progress::PhaseFinish);
    let input = prepared?;

    let outcome = invoker::invoke(ctx, config, &input, reporter)?;

    let structure = if outcome.is_success() {
        let found = locator::find_structure(&layout, REPORTED_MODEL);
        if found.is_none() {
            warn!("No model PDB file found under {}", layout.job_dir().display());
        }
        found
    } else {
        None
    };

    let pdb_text = match &structure {
        Some(path) => Some(fs::read_to_string(path).map_err(|e| EngineError::io(path, e))?),
        None => None,
    };
    let view = match (&pdb_text, outcome.is_success()) {
        (Some(text), _) => StructureView::Embedded(text),
        (None, true) => StructureView::NotFound,
        (None, false) => StructureView::Skipped,
    };

    let report_path = layout.run_report();
    let html = RunReport::new(&config.job_name, &outcome, view).render();
    page::write_html(&report_path, &html)?;
    info!("Run report written to {}", report_path.display());

    Ok(PredictResult {
        outcome,
        report_path,
        structure,
    })
}
