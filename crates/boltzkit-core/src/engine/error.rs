use crate::core::io::params::ParamsError;
use crate::core::models::artifacts::ArtifactError;
use crate::core::models::run_config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Params(#[from] ParamsError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Cannot proceed: the parameter file '{}' does not exist.", path.display())]
    MissingInput { path: PathBuf },

    #[error("Failed to start predictor '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File operation on '{}' failed: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    #[error("Failed to render figure '{figure}': {message}")]
    Figure { figure: String, message: String },

    #[error("No data found to generate a report.")]
    NoReportData,
}

impl EngineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EngineError::Io {
            path: path.into(),
            source,
        }
    }
}
