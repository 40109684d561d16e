use crate::core::models::artifacts::OutputLayout;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const DEFAULT_PREDICTOR: &str = "boltz";

/// Everything a run needs from its surroundings, passed explicitly instead of
/// changing the process working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    work_dir: PathBuf,
    session_id: Uuid,
    predictor: String,
}

impl RunContext {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            session_id: Uuid::new_v4(),
            predictor: DEFAULT_PREDICTOR.to_string(),
        }
    }

    pub fn with_predictor(mut self, program: impl Into<String>) -> Self {
        self.predictor = program.into();
        self
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn predictor(&self) -> &str {
        &self.predictor
    }

    pub fn layout(&self, job_name: &str) -> OutputLayout {
        OutputLayout::new(&self.work_dir, job_name)
    }
}
