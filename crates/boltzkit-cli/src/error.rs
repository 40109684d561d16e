use boltzkit::engine::error::EngineError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error("Prediction failed ({}); see '{}'", describe_exit(.exit_code), .report.display())]
    PredictionFailed {
        exit_code: Option<i32>,
        report: PathBuf,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("exit code {}", c),
        None => "terminated by signal".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prediction_failure_names_exit_code_and_report() {
        let err = CliError::PredictionFailed {
            exit_code: Some(2),
            report: PathBuf::from("T1/T1_run_report.html"),
        };
        assert_eq!(
            err.to_string(),
            "Prediction failed (exit code 2); see 'T1/T1_run_report.html'"
        );
    }

    #[test]
    fn engine_errors_are_shown_verbatim() {
        let err: CliError = EngineError::NoReportData.into();
        assert_eq!(err.to_string(), "No data found to generate a report.");
    }
}
