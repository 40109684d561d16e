use crate::cli::PredictArgs;
use crate::config::builder::build_run_config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use boltzkit::engine::context::RunContext;
use boltzkit::engine::invoker::RunOutcome;
use boltzkit::engine::progress::ProgressReporter;
use boltzkit::workflows;
use tracing::{info, warn};

pub async fn run(args: PredictArgs, ctx: RunContext) -> Result<()> {
    info!("Merging run parameters from file and CLI arguments...");
    let config = build_run_config(&args, ctx.work_dir())?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Starting prediction for job '{}'...", config.job_name);
    info!("Invoking the prediction workflow...");

    let result =
        tokio::task::block_in_place(|| workflows::predict::run(&ctx, &config, &reporter))?;

    match result.outcome {
        RunOutcome::Succeeded { .. } => {
            match &result.structure {
                Some(path) => println!("✓ Predicted structure: {}", path.display()),
                None => {
                    warn!("Prediction finished without a model structure file.");
                    println!("Warning: the predictor finished but no model PDB file was found.");
                }
            }
            println!("✓ Run report written to: {}", result.report_path.display());
            Ok(())
        }
        RunOutcome::Failed { exit_code, .. } => Err(CliError::PredictionFailed {
            exit_code,
            report: result.report_path,
        }),
    }
}
