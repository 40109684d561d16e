mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod utils;

use crate::cli::{Cli, Commands};
use crate::error::{CliError, Result};
use boltzkit::engine::context::RunContext;
use clap::Parser;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run_app().await {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.clone())?;

    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    eyre_hook.install().map_err(|e| CliError::Other(e.into()))?;
    std::panic::set_hook(Box::new(move |pi| {
        error!("{}", panic_hook.panic_report(pi));
    }));

    info!("🚀 boltzkit CLI v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let ctx = RunContext::new(&cli.work_dir).with_predictor(cli.predictor.as_str());
    debug!("Session {} in {}", ctx.session_id(), ctx.work_dir().display());

    let command_result = match cli.command {
        Commands::Prepare(args) => {
            info!("Dispatching to 'prepare' command.");
            commands::prepare::run(args, ctx.work_dir()).await
        }
        Commands::Predict(args) => {
            info!("Dispatching to 'predict' command.");
            commands::predict::run(args, ctx).await
        }
        Commands::Analyze(args) => {
            info!("Dispatching to 'analyze' command.");
            commands::analyze::run(args, ctx).await
        }
    };

    match &command_result {
        Ok(_) => info!("✅ Command completed successfully."),
        Err(e) => error!("❌ Command failed: {}", e),
    }

    command_result
}
