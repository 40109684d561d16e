use super::context::RunContext;
use super::error::EngineError;
use super::progress::{Progress, ProgressReporter};
use crate::core::io::yaml::fold_block_sequences;
use crate::core::models::artifacts::OutputLayout;
use crate::core::models::run_config::RunConfig;
use crate::core::utils::ansi::strip_ansi_codes;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

/// How a predictor process ended. Output is captured in full and stripped of
/// terminal escape codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Succeeded {
        stdout: String,
        stderr: String,
    },
    Failed {
        /// `None` when the process was terminated by a signal.
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    },
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Succeeded { .. })
    }

    /// The text shown in the job log section of the report.
    pub fn log_text(&self) -> String {
        match self {
            RunOutcome::Succeeded { stdout, stderr } => {
                format!("STDOUT:\n{}\n\nSTDERR:\n{}", stdout, stderr)
            }
            RunOutcome::Failed {
                exit_code,
                stdout,
                stderr,
            } => {
                let code = exit_code
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "terminated by signal".to_string());
                format!("Exit Code: {}\n\n{}\n{}", code, stdout, stderr)
            }
        }
    }
}

/// Builds the predictor arguments for `input`, a path relative to the work dir.
pub fn build_args(config: &RunConfig, input: &Path) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "predict".into(),
        input.display().to_string(),
        "--use_msa_server".into(),
        "--out_dir".into(),
        config.job_name.clone(),
        "--recycling_steps".into(),
        config.recycling_steps.to_string(),
        "--sampling_steps".into(),
        config.sampling_steps.to_string(),
        "--diffusion_samples".into(),
        config.diffusion_samples.to_string(),
        "--step_scale".into(),
        format!("{:?}", config.step_scale),
        "--max_msa_seqs".into(),
        config.max_msa_seqs.to_string(),
        "--msa_pairing_strategy".into(),
        config.msa_pairing_strategy.to_string(),
        "--output_format".into(),
        "pdb".into(),
    ];
    if config.use_potentials {
        args.push("--use_potentials".into());
    }
    if config.override_existing {
        args.push("--override".into());
    }
    if config.subsample_msa {
        args.push("--subsample_msa".into());
        args.push("--num_subsampled_msa".into());
        args.push(config.num_subsampled_msa.to_string());
    }
    args
}

/// Deletes a previous job output tree when the run is set to override it.
pub fn clear_previous_output(
    layout: &OutputLayout,
    config: &RunConfig,
) -> Result<(), EngineError> {
    let job_dir = layout.job_dir();
    if !config.override_existing || !job_dir.exists() {
        return Ok(());
    }
    warn!("Removing previous output directory {}", job_dir.display());
    fs::remove_dir_all(&job_dir).map_err(|e| EngineError::io(&job_dir, e))
}

/// Produces `<job>.yaml` for the predictor.
///
/// A `params.yaml` from the preparation step takes precedence and is copied
/// with block sequence scalars folded onto one line; otherwise `<job>.yaml`
/// must already exist.
pub fn stage_input(layout: &OutputLayout) -> Result<PathBuf, EngineError> {
    let source = layout.staged_source();
    let target = layout.job_input();

    if source.is_file() {
        let text = fs::read_to_string(&source).map_err(|e| EngineError::io(&source, e))?;
        fs::write(&target, fold_block_sequences(&text)).map_err(|e| EngineError::io(&target, e))?;
        info!("Staged {} as {}", source.display(), target.display());
    } else if !target.is_file() {
        return Err(EngineError::MissingInput { path: target });
    } else {
        debug!("Using existing predictor input {}", target.display());
    }

    Ok(target)
}

/// Runs the predictor to completion in the context's working directory.
///
/// A nonzero exit is a [`RunOutcome::Failed`], not an error; only failing to
/// start the process is.
pub fn invoke(
    ctx: &RunContext,
    config: &RunConfig,
    input: &Path,
    reporter: &ProgressReporter,
) -> Result<RunOutcome, EngineError> {
    let relative_input = input.strip_prefix(ctx.work_dir()).unwrap_or(input);
    let args = build_args(config, relative_input);
    info!("Running: {} {}", ctx.predictor(), args.join(" "));

    let output = reporter.phase("Running Boltz2 prediction...", || {
        Command::new(ctx.predictor())
            .args(&args)
            .current_dir(ctx.work_dir())
            .stdin(Stdio::null())
            .output()
    });
    let output = output.map_err(|source| EngineError::Spawn {
        program: ctx.predictor().to_string(),
        source,
    })?;

    let stdout = strip_ansi_codes(&String::from_utf8_lossy(&output.stdout));
    let stderr = strip_ansi_codes(&String::from_utf8_lossy(&output.stderr));

    if output.status.success() {
        info!("Predictor finished successfully");
        Ok(RunOutcome::Succeeded { stdout, stderr })
    } else {
        let exit_code = output.status.code();
        warn!("Predictor exited with status {:?}", exit_code);
        reporter.report(Progress::Message(format!(
            "Predictor failed with exit code {}",
            exit_code.map_or_else(|| "(signal)".to_string(), |c| c.to_string())
        )));
        Ok(RunOutcome::Failed {
            exit_code,
            stdout,
            stderr,
        })
    }
}
