use crate::core::io::params::{ParamValue, ParamsFile};
use phf::phf_set;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_JOB_NAME: &str = "boltz2_job";
pub const DEFAULT_RECYCLING_STEPS: u32 = 3;
pub const DEFAULT_SAMPLING_STEPS: u32 = 200;
pub const DEFAULT_DIFFUSION_SAMPLES: u32 = 1;
pub const DEFAULT_STEP_SCALE: f64 = 1.638;
pub const DEFAULT_MAX_MSA_SEQS: u32 = 8192;
pub const DEFAULT_NUM_SUBSAMPLED_MSA: u32 = 1024;

/// Keys understood by [`RunConfigBuilder::from_params`].
pub static KNOWN_KEYS: phf::Set<&'static str> = phf_set! {
    "job_name",
    "use_potentials",
    "override",
    "recycling_steps",
    "sampling_steps",
    "diffusion_samples",
    "step_scale",
    "max_msa_seqs",
    "msa_pairing_strategy",
    "subsample_msa",
    "num_subsampled_msa",
};

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Parameter '{key}' expects a {expected} value, found {found}")]
    InvalidType {
        key: &'static str,
        expected: &'static str,
        found: String,
    },
    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: &'static str, reason: String },
    #[error("Invalid job name '{name}': {reason}")]
    InvalidJobName { name: String, reason: &'static str },
    #[error("Unknown MSA pairing strategy '{0}'. Expected 'greedy', 'complete' or 'unpaired_paired'.")]
    UnknownPairingStrategy(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PairingStrategy {
    #[default]
    Greedy,
    Complete,
    UnpairedPaired,
}

impl PairingStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PairingStrategy::Greedy => "greedy",
            PairingStrategy::Complete => "complete",
            PairingStrategy::UnpairedPaired => "unpaired_paired",
        }
    }
}

impl FromStr for PairingStrategy {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "greedy" => Ok(PairingStrategy::Greedy),
            "complete" => Ok(PairingStrategy::Complete),
            "unpaired_paired" => Ok(PairingStrategy::UnpairedPaired),
            _ => Err(ConfigError::UnknownPairingStrategy(s.to_string())),
        }
    }
}

impl fmt::Display for PairingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated settings for one prediction job.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub job_name: String,
    pub use_potentials: bool,
    pub override_existing: bool,
    pub recycling_steps: u32,
    pub sampling_steps: u32,
    pub diffusion_samples: u32,
    pub step_scale: f64,
    pub max_msa_seqs: u32,
    pub msa_pairing_strategy: PairingStrategy,
    pub subsample_msa: bool,
    pub num_subsampled_msa: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            job_name: DEFAULT_JOB_NAME.to_string(),
            use_potentials: false,
            override_existing: false,
            recycling_steps: DEFAULT_RECYCLING_STEPS,
            sampling_steps: DEFAULT_SAMPLING_STEPS,
            diffusion_samples: DEFAULT_DIFFUSION_SAMPLES,
            step_scale: DEFAULT_STEP_SCALE,
            max_msa_seqs: DEFAULT_MAX_MSA_SEQS,
            msa_pairing_strategy: PairingStrategy::default(),
            subsample_msa: false,
            num_subsampled_msa: DEFAULT_NUM_SUBSAMPLED_MSA,
        }
    }
}

impl RunConfig {
    pub fn from_params(params: &ParamsFile) -> Result<Self, ConfigError> {
        RunConfigBuilder::from_params(params)?.build()
    }
}

/// Replaces whitespace runs with `_` and rejects names that cannot serve as a
/// single directory component.
pub fn normalize_job_name(raw: &str) -> Result<String, ConfigError> {
    let name = raw.split_whitespace().collect::<Vec<_>>().join("_");
    let invalid = |reason| ConfigError::InvalidJobName {
        name: raw.to_string(),
        reason,
    };
    if name.is_empty() {
        return Err(invalid("name is empty"));
    }
    if name == "." || name == ".." {
        return Err(invalid("name is a relative directory reference"));
    }
    if name.contains(['/', '\\']) {
        return Err(invalid("name contains a path separator"));
    }
    Ok(name)
}

#[derive(Default, Debug, Clone)]
pub struct RunConfigBuilder {
    job_name: Option<String>,
    use_potentials: Option<bool>,
    override_existing: Option<bool>,
    recycling_steps: Option<u32>,
    sampling_steps: Option<u32>,
    diffusion_samples: Option<u32>,
    step_scale: Option<f64>,
    max_msa_seqs: Option<u32>,
    msa_pairing_strategy: Option<PairingStrategy>,
    subsample_msa: Option<bool>,
    num_subsampled_msa: Option<u32>,
}

impl RunConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_params(params: &ParamsFile) -> Result<Self, ConfigError> {
        let mut builder = Self::new();
        for (key, value) in params.iter() {
            match key {
                "job_name" => builder.job_name = Some(expect_name(key_ref(key), value)?),
                "use_potentials" => {
                    builder.use_potentials = Some(expect_bool(key_ref(key), value)?)
                }
                "override" => builder.override_existing = Some(expect_bool(key_ref(key), value)?),
                "recycling_steps" => {
                    builder.recycling_steps = Some(expect_count(key_ref(key), value)?)
                }
                "sampling_steps" => {
                    builder.sampling_steps = Some(expect_count(key_ref(key), value)?)
                }
                "diffusion_samples" => {
                    builder.diffusion_samples = Some(expect_count(key_ref(key), value)?)
                }
                "step_scale" => builder.step_scale = Some(expect_float(key_ref(key), value)?),
                "max_msa_seqs" => builder.max_msa_seqs = Some(expect_count(key_ref(key), value)?),
                "msa_pairing_strategy" => {
                    let raw = expect_str(key_ref(key), value)?;
                    builder.msa_pairing_strategy = Some(raw.parse()?);
                }
                "subsample_msa" => builder.subsample_msa = Some(expect_bool(key_ref(key), value)?),
                "num_subsampled_msa" => {
                    builder.num_subsampled_msa = Some(expect_count(key_ref(key), value)?)
                }
                _ => debug!("Ignoring unknown run parameter '{}' = {}", key, value),
            }
        }
        Ok(builder)
    }

    pub fn job_name(mut self, name: impl Into<String>) -> Self {
        self.job_name = Some(name.into());
        self
    }
    pub fn use_potentials(mut self, enabled: bool) -> Self {
        self.use_potentials = Some(enabled);
        self
    }
    pub fn override_existing(mut self, enabled: bool) -> Self {
        self.override_existing = Some(enabled);
        self
    }
    pub fn recycling_steps(mut self, steps: u32) -> Self {
        self.recycling_steps = Some(steps);
        self
    }
    pub fn sampling_steps(mut self, steps: u32) -> Self {
        self.sampling_steps = Some(steps);
        self
    }
    pub fn diffusion_samples(mut self, samples: u32) -> Self {
        self.diffusion_samples = Some(samples);
        self
    }
    pub fn step_scale(mut self, scale: f64) -> Self {
        self.step_scale = Some(scale);
        self
    }
    pub fn max_msa_seqs(mut self, n: u32) -> Self {
        self.max_msa_seqs = Some(n);
        self
    }
    pub fn msa_pairing_strategy(mut self, strategy: PairingStrategy) -> Self {
        self.msa_pairing_strategy = Some(strategy);
        self
    }
    pub fn subsample_msa(mut self, enabled: bool) -> Self {
        self.subsample_msa = Some(enabled);
        self
    }
    pub fn num_subsampled_msa(mut self, n: u32) -> Self {
        self.num_subsampled_msa = Some(n);
        self
    }

    pub fn build(self) -> Result<RunConfig, ConfigError> {
        let defaults = RunConfig::default();
        let config = RunConfig {
            job_name: normalize_job_name(self.job_name.as_deref().unwrap_or(DEFAULT_JOB_NAME))?,
            use_potentials: self.use_potentials.unwrap_or(defaults.use_potentials),
            override_existing: self.override_existing.unwrap_or(defaults.override_existing),
            recycling_steps: self.recycling_steps.unwrap_or(defaults.recycling_steps),
            sampling_steps: self.sampling_steps.unwrap_or(defaults.sampling_steps),
            diffusion_samples: self.diffusion_samples.unwrap_or(defaults.diffusion_samples),
            step_scale: self.step_scale.unwrap_or(defaults.step_scale),
            max_msa_seqs: self.max_msa_seqs.unwrap_or(defaults.max_msa_seqs),
            msa_pairing_strategy: self
                .msa_pairing_strategy
                .unwrap_or(defaults.msa_pairing_strategy),
            subsample_msa: self.subsample_msa.unwrap_or(defaults.subsample_msa),
            num_subsampled_msa: self.num_subsampled_msa.unwrap_or(defaults.num_subsampled_msa),
        };

        for (key, value) in [
            ("recycling_steps", config.recycling_steps),
            ("sampling_steps", config.sampling_steps),
            ("diffusion_samples", config.diffusion_samples),
            ("max_msa_seqs", config.max_msa_seqs),
            ("num_subsampled_msa", config.num_subsampled_msa),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    key,
                    reason: "must be at least 1".to_string(),
                });
            }
        }
        if !(config.step_scale.is_finite() && config.step_scale > 0.0) {
            return Err(ConfigError::InvalidValue {
                key: "step_scale",
                reason: format!("must be a positive number, got {}", config.step_scale),
            });
        }

        Ok(config)
    }
}

fn key_ref(key: &str) -> &'static str {
    KNOWN_KEYS.get_key(key).copied().unwrap_or("<unknown>")
}

fn type_error(key: &'static str, expected: &'static str, value: &ParamValue) -> ConfigError {
    ConfigError::InvalidType {
        key,
        expected,
        found: format!("{} {}", value.type_name(), value),
    }
}

fn expect_bool(key: &'static str, value: &ParamValue) -> Result<bool, ConfigError> {
    match value {
        ParamValue::Bool(b) => Ok(*b),
        other => Err(type_error(key, "boolean", other)),
    }
}

fn expect_str<'v>(key: &'static str, value: &'v ParamValue) -> Result<&'v str, ConfigError> {
    match value {
        ParamValue::Str(s) => Ok(s),
        other => Err(type_error(key, "string", other)),
    }
}

fn expect_name(key: &'static str, value: &ParamValue) -> Result<String, ConfigError> {
    match value {
        ParamValue::Str(s) => Ok(s.clone()),
        ParamValue::Int(i) => Ok(i.to_string()),
        other => Err(type_error(key, "string", other)),
    }
}

fn expect_count(key: &'static str, value: &ParamValue) -> Result<u32, ConfigError> {
    match value {
        ParamValue::Int(i) => u32::try_from(*i).map_err(|_| ConfigError::InvalidValue {
            key,
            reason: format!("{} is out of range", i),
        }),
        other => Err(type_error(key, "integer", other)),
    }
}

fn expect_float(key: &'static str, value: &ParamValue) -> Result<f64, ConfigError> {
    match value {
        ParamValue::Float(x) => Ok(*x),
        ParamValue::Int(i) => Ok(*i as f64),
        other => Err(type_error(key, "float", other)),
    }
}
