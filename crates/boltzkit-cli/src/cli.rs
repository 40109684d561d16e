use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "boltzkit - Prepare, run and analyse Boltz biomolecular structure predictions.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Directory holding the job inputs; the predictor runs here and job
    /// output trees are created under it.
    #[arg(short = 'w', long, global = true, value_name = "DIR", default_value = ".")]
    pub work_dir: PathBuf,

    /// Predictor executable to invoke.
    #[arg(long, global = true, value_name = "PROGRAM", default_value = "boltz")]
    pub predictor: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a sequence/ligand description (JSON or YAML) into predictor input YAML.
    Prepare(PrepareArgs),
    /// Run the predictor for a job and write its run report.
    Predict(PredictArgs),
    /// Render confidence plots and affinity cards for a finished job.
    Analyze(AnalyzeArgs),
}

/// Arguments for the `prepare` subcommand.
#[derive(Args, Debug)]
pub struct PrepareArgs {
    /// Path to the sequence description (JSON or YAML).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the generated YAML. Defaults to `params.yaml` in the work dir.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Where run parameters are read from, shared by `predict` and `analyze`.
#[derive(Args, Debug, Clone, Default)]
pub struct ParamsSource {
    /// Path to the `key = value` run-parameter file.
    /// Defaults to `run_params.txt` in the work dir, if present.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a run parameter, overriding the parameter file.
    /// Can be used multiple times. Example: -S sampling_steps=100
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `predict` subcommand.
#[derive(Args, Debug, Default)]
pub struct PredictArgs {
    #[command(flatten)]
    pub params: ParamsSource,

    // --- Run Overrides ---
    /// Override the job name.
    #[arg(short, long, value_name = "NAME")]
    pub job_name: Option<String>,

    /// Override the number of recycling steps.
    #[arg(long, value_name = "INT")]
    pub recycling_steps: Option<u32>,

    /// Override the number of diffusion sampling steps.
    #[arg(long, value_name = "INT")]
    pub sampling_steps: Option<u32>,

    /// Override the number of diffusion samples.
    #[arg(long, value_name = "INT")]
    pub diffusion_samples: Option<u32>,

    /// Override the diffusion step scale.
    #[arg(long, value_name = "FLOAT")]
    pub step_scale: Option<f64>,

    /// Override the maximum number of MSA sequences.
    #[arg(long, value_name = "INT")]
    pub max_msa_seqs: Option<u32>,

    /// Override the MSA pairing strategy ('greedy', 'complete' or 'unpaired_paired').
    #[arg(long, value_name = "STRATEGY")]
    pub msa_pairing_strategy: Option<String>,

    /// Override the number of MSA sequences kept when subsampling.
    #[arg(long, value_name = "INT")]
    pub num_subsampled_msa: Option<u32>,

    /// Override `subsample_msa` from the parameter file.
    #[command(flatten)]
    pub subsample: SubsampleMsa,

    /// Override `override` from the parameter file.
    #[command(flatten)]
    pub override_existing: OverrideExisting,

    /// Override `use_potentials` from the parameter file.
    #[command(flatten)]
    pub potentials: Potentials,
}

/// Mutually exclusive flags for deleting a previous job output tree.
#[derive(Args, Debug, Clone, Copy, Default)]
#[group(required = false, multiple = false)]
pub struct OverrideExisting {
    /// Delete any previous output of this job before running.
    #[arg(long = "override")]
    pub override_existing: bool,
    /// Keep any previous output of this job.
    #[arg(long)]
    pub no_override: bool,
}

/// Mutually exclusive flags for MSA subsampling.
#[derive(Args, Debug, Clone, Copy, Default)]
#[group(required = false, multiple = false)]
pub struct SubsampleMsa {
    /// Subsample the MSA before inference.
    #[arg(long)]
    pub subsample_msa: bool,
    /// Use the full MSA.
    #[arg(long)]
    pub no_subsample_msa: bool,
}

/// Mutually exclusive flags for inference-time potentials.
#[derive(Args, Debug, Clone, Copy, Default)]
#[group(required = false, multiple = false)]
pub struct Potentials {
    /// Enable inference-time potentials.
    #[arg(long)]
    pub use_potentials: bool,
    /// Disable inference-time potentials.
    #[arg(long)]
    pub no_potentials: bool,
}

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug, Default)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub params: ParamsSource,

    /// Override the job name from the parameter file.
    #[arg(short, long, value_name = "NAME")]
    pub job_name: Option<String>,

    /// Index of the predicted model to analyse.
    #[arg(short, long, value_name = "INT", default_value_t = 0)]
    pub model: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn author_comes_from_package_metadata() {
        let cmd = Cli::command();
        assert_eq!(cmd.get_author(), Some(env!("CARGO_PKG_AUTHORS")));
    }

    #[test]
    fn subsample_flags_parse_and_conflict() {
        let cli = Cli::try_parse_from([
            "boltzkit",
            "predict",
            "--subsample-msa",
            "--num-subsampled-msa",
            "128",
            "--msa-pairing-strategy",
            "unpaired_paired",
        ])
        .unwrap();
        let Commands::Predict(args) = cli.command else {
            panic!("expected predict");
        };
        assert!(args.subsample.subsample_msa);
        assert_eq!(args.num_subsampled_msa, Some(128));

        let conflict = Cli::try_parse_from([
            "boltzkit",
            "predict",
            "--subsample-msa",
            "--no-subsample-msa",
        ]);
        assert!(conflict.is_err());
    }
}
