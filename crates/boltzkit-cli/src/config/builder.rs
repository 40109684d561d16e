use super::defaults::DefaultsConfig;
use crate::cli::{AnalyzeArgs, ParamsSource, PredictArgs};
use crate::error::{CliError, Result};
use crate::utils::parser;
use boltzkit::core::io::params::{ParamsFile, parse_value};
use boltzkit::core::models::run_config::{
    ConfigError, KNOWN_KEYS, PairingStrategy, RunConfig, RunConfigBuilder,
};
use boltzkit::engine::error::EngineError;
use std::path::Path;
use tracing::{debug, info};

fn config_error(e: ConfigError) -> CliError {
    CliError::Config(e.to_string())
}

/// Loads the run-parameter file and applies `--set` overrides on top.
///
/// An explicit `--config` path must exist. Without one, `run_params.txt` in
/// the work dir is read if present and built-in defaults are used otherwise.
pub fn load_params(source: &ParamsSource, work_dir: &Path) -> Result<ParamsFile> {
    let defaults = DefaultsConfig::default();

    let params = match &source.config {
        Some(path) => ParamsFile::read_from_path(path).map_err(EngineError::from)?,
        None => {
            let path = work_dir.join(&defaults.params_file);
            if path.is_file() {
                ParamsFile::read_from_path(&path).map_err(EngineError::from)?
            } else {
                info!(
                    "No parameter file at {}, using built-in defaults.",
                    path.display()
                );
                ParamsFile::new()
            }
        }
    };
    debug!("Loaded {} run parameter(s) from file.", params.len());

    apply_set_values(params, &source.set_values)
}

/// Builds the run configuration for `predict`: defaults, then the parameter
/// file, then `--set` values, then dedicated flags.
pub fn build_run_config(args: &PredictArgs, work_dir: &Path) -> Result<RunConfig> {
    let params = load_params(&args.params, work_dir)?;
    let mut builder = RunConfigBuilder::from_params(&params).map_err(config_error)?;

    if let Some(name) = &args.job_name {
        builder = builder.job_name(name.as_str());
    }
    if let Some(steps) = args.recycling_steps {
        builder = builder.recycling_steps(steps);
    }
    if let Some(steps) = args.sampling_steps {
        builder = builder.sampling_steps(steps);
    }
    if let Some(samples) = args.diffusion_samples {
        builder = builder.diffusion_samples(samples);
    }
    if let Some(scale) = args.step_scale {
        builder = builder.step_scale(scale);
    }
    if let Some(n) = args.max_msa_seqs {
        builder = builder.max_msa_seqs(n);
    }
    if let Some(raw) = &args.msa_pairing_strategy {
        let strategy: PairingStrategy = raw
            .parse()
            .map_err(|e: ConfigError| CliError::Argument(e.to_string()))?;
        builder = builder.msa_pairing_strategy(strategy);
    }
    if let Some(n) = args.num_subsampled_msa {
        builder = builder.num_subsampled_msa(n);
    }
    match (args.subsample.subsample_msa, args.subsample.no_subsample_msa) {
        (true, false) => builder = builder.subsample_msa(true),
        (false, true) => builder = builder.subsample_msa(false),
        _ => {}
    }

    match (
        args.override_existing.override_existing,
        args.override_existing.no_override,
    ) {
        (true, false) => builder = builder.override_existing(true),
        (false, true) => builder = builder.override_existing(false),
        _ => {}
    }
    match (args.potentials.use_potentials, args.potentials.no_potentials) {
        (true, false) => builder = builder.use_potentials(true),
        (false, true) => builder = builder.use_potentials(false),
        _ => {}
    }

    let config = builder.build().map_err(config_error)?;
    debug!("Final run configuration: {:?}", config);
    Ok(config)
}

/// Resolves the job to analyse from `--job-name` or the parameter file.
pub fn resolve_job_name(args: &AnalyzeArgs, work_dir: &Path) -> Result<String> {
    let params = load_params(&args.params, work_dir)?;
    let mut builder = RunConfigBuilder::from_params(&params).map_err(config_error)?;
    if let Some(name) = &args.job_name {
        builder = builder.job_name(name.as_str());
    }
    Ok(builder.build().map_err(config_error)?.job_name)
}

fn apply_set_values(mut params: ParamsFile, set_values: &[String]) -> Result<ParamsFile> {
    for kv_pair in set_values {
        let (key, value) =
            parser::parse_key_value(kv_pair).map_err(|e| CliError::Config(e.to_string()))?;
        if !KNOWN_KEYS.contains(key) {
            return Err(CliError::Config(format!(
                "Unsupported configuration key for --set: '{}'",
                key
            )));
        }
        debug!("Applying --set {} = {}", key, value);
        params.insert(key, parse_value(value));
    }
    Ok(params)
}
