use crate::cli::AnalyzeArgs;
use crate::config::builder::resolve_job_name;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use boltzkit::engine::context::RunContext;
use boltzkit::engine::progress::ProgressReporter;
use boltzkit::workflows;
use tracing::{info, warn};

pub async fn run(args: AnalyzeArgs, ctx: RunContext) -> Result<()> {
    let job_name = resolve_job_name(&args, ctx.work_dir())?;
    info!("Analysing model {} of job '{}'", args.model, job_name);

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let result = tokio::task::block_in_place(|| {
        workflows::analyze::run(&ctx, &job_name, args.model, &reporter)
    })?;

    if result.chains == 0 {
        warn!("Confidence section unavailable; see the notice in the report.");
    } else {
        println!(
            "✓ Confidence plots for {} chain(s) exported ({} file(s)).",
            result.chains,
            result.exported.len()
        );
    }
    if result.has_affinity {
        println!("✓ Affinity results included.");
    }
    println!(
        "✓ Analysis report written to: {}",
        result.report_path.display()
    );
    Ok(())
}
