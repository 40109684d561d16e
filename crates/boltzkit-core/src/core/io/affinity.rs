use crate::core::models::affinity::AffinityRecord;
use crate::core::models::artifacts::ArtifactError;
use std::fs;
use std::path::Path;

pub fn read_affinity(path: &Path) -> Result<AffinityRecord, ArtifactError> {
    let text = fs::read_to_string(path).map_err(|e| ArtifactError::from_io(path, e))?;
    serde_json::from_str(&text).map_err(|e| ArtifactError::malformed(path, e))
}
