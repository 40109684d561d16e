use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Artifact not found: {}", path.display())]
    Missing { path: PathBuf },
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Malformed artifact '{}': {message}", path.display())]
    Malformed { path: PathBuf, message: String },
    #[error("Residue index {index} is out of range for {what} of length {len}")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },
}

impl ArtifactError {
    /// Maps an I/O failure on `path`, reporting a missing file as [`ArtifactError::Missing`].
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => ArtifactError::Missing {
                path: path.to_path_buf(),
            },
            _ => ArtifactError::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }

    pub fn malformed(path: &Path, message: impl ToString) -> Self {
        ArtifactError::Malformed {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }
}

/// Paths of everything a prediction job reads or writes, derived from the
/// working directory and the job name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    work_dir: PathBuf,
    job_name: String,
}

impl OutputLayout {
    pub fn new(work_dir: impl Into<PathBuf>, job_name: impl Into<String>) -> Self {
        Self {
            work_dir: work_dir.into(),
            job_name: job_name.into(),
        }
    }

    pub fn job_name(&self) -> &str {
        &self.job_name
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// `params.yaml`, written by the preparation step.
    pub fn staged_source(&self) -> PathBuf {
        self.work_dir.join("params.yaml")
    }

    /// `<job>.yaml`, the file handed to the predictor.
    pub fn job_input(&self) -> PathBuf {
        self.work_dir.join(format!("{}.yaml", self.job_name))
    }

    /// `<job>/`, the predictor's `--out_dir`.
    pub fn job_dir(&self) -> PathBuf {
        self.work_dir.join(&self.job_name)
    }

    pub fn results_dir(&self) -> PathBuf {
        self.job_dir()
            .join(format!("boltz_results_{}", self.job_name))
    }

    pub fn predictions_dir(&self) -> PathBuf {
        self.results_dir().join("predictions").join(&self.job_name)
    }

    pub fn plots_dir(&self) -> PathBuf {
        self.results_dir().join("plots")
    }

    pub fn model_stem(&self, model: u32) -> String {
        format!("{}_model_{}", self.job_name, model)
    }

    pub fn structure(&self, model: u32) -> PathBuf {
        self.predictions_dir()
            .join(format!("{}.pdb", self.model_stem(model)))
    }

    pub fn plddt(&self, model: u32) -> PathBuf {
        self.predictions_dir()
            .join(format!("plddt_{}.npz", self.model_stem(model)))
    }

    pub fn pae(&self, model: u32) -> PathBuf {
        self.predictions_dir()
            .join(format!("pae_{}.npz", self.model_stem(model)))
    }

    pub fn affinity(&self) -> PathBuf {
        self.predictions_dir()
            .join(format!("affinity_{}.json", self.job_name))
    }

    pub fn run_report(&self) -> PathBuf {
        self.job_dir()
            .join(format!("{}_run_report.html", self.job_name))
    }

    pub fn analysis_report(&self) -> PathBuf {
        self.job_dir()
            .join(format!("{}_analysis_report.html", self.job_name))
    }

    /// Glob pattern matching the structure of `model` anywhere in the job tree.
    /// Recursive search pattern for `model`'s structure. The job directory is
    /// escaped so bracketed or starred names match literally.
    pub fn structure_glob(&self, model: u32) -> String {
        format!(
            "{}/**/*_model_{}.pdb",
            glob::Pattern::escape(&self.job_dir().display().to_string()),
            model
        )
    }
}
