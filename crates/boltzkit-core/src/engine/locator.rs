use crate::core::models::artifacts::OutputLayout;
use glob::glob;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Artifact files found for one model of a job. Absent files are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocatedArtifacts {
    pub structure: Option<PathBuf>,
    pub plddt: Option<PathBuf>,
    pub pae: Option<PathBuf>,
    pub affinity: Option<PathBuf>,
}

impl LocatedArtifacts {
    /// Names of the files the confidence section cannot do without.
    pub fn missing_confidence_inputs(&self) -> Vec<&'static str> {
        [
            ("structure", &self.structure),
            ("pLDDT", &self.plddt),
            ("PAE", &self.pae),
        ]
        .into_iter()
        .filter(|(_, path)| path.is_none())
        .map(|(name, _)| name)
        .collect()
    }
}

/// Finds the structure file for `model`: the canonical prediction path first,
/// then any match in the job tree.
pub fn find_structure(layout: &OutputLayout, model: u32) -> Option<PathBuf> {
    let canonical = layout.structure(model);
    if canonical.is_file() {
        return Some(canonical);
    }

    let pattern = layout.structure_glob(model);
    debug!("Canonical structure missing, searching {}", pattern);
    let entries = match glob(&pattern) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Invalid structure search pattern '{}': {}", pattern, e);
            return None;
        }
    };
    let mut matches: Vec<PathBuf> = entries.filter_map(Result::ok).collect();
    matches.sort();
    matches.into_iter().next()
}

pub fn locate(layout: &OutputLayout, model: u32) -> LocatedArtifacts {
    let existing = |path: PathBuf| path.is_file().then_some(path);
    let located = LocatedArtifacts {
        structure: find_structure(layout, model),
        plddt: existing(layout.plddt(model)),
        pae: existing(layout.pae(model)),
        affinity: existing(layout.affinity()),
    };
    debug!("Located artifacts for model {}: {:?}", model, located);
    located
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn canonical_structure_path_is_preferred() {
        let dir = tempdir().unwrap();
        let layout = OutputLayout::new(dir.path(), "T1");
        fs::create_dir_all(layout.predictions_dir()).unwrap();
        fs::write(layout.structure(0), "END\n").unwrap();
        fs::create_dir_all(layout.job_dir().join("aaa")).unwrap();
        fs::write(layout.job_dir().join("aaa/other_model_0.pdb"), "END\n").unwrap();

        assert_eq!(find_structure(&layout, 0), Some(layout.structure(0)));
    }

    #[test]
    fn structure_elsewhere_in_job_tree_is_found_by_glob() {
        let dir = tempdir().unwrap();
        let layout = OutputLayout::new(dir.path(), "T1");
        let nested = layout.job_dir().join("boltz_results_T1/predictions/renamed");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("renamed_model_0.pdb"), "END\n").unwrap();

        assert_eq!(
            find_structure(&layout, 0),
            Some(nested.join("renamed_model_0.pdb"))
        );
        assert_eq!(find_structure(&layout, 1), None);
    }

    #[test]
    fn bracketed_work_dir_and_job_name_are_searched_literally() {
        let dir = tempdir().unwrap();
        let cases = [
            (dir.path().join("run[1]"), "T1"),
            (dir.path().to_path_buf(), "T[1]"),
        ];
        for (work_dir, job) in cases {
            let layout = OutputLayout::new(work_dir, job);
            let nested = layout.job_dir().join("predictions/renamed");
            fs::create_dir_all(&nested).unwrap();
            fs::write(nested.join("renamed_model_0.pdb"), "END\n").unwrap();

            assert_eq!(
                find_structure(&layout, 0),
                Some(nested.join("renamed_model_0.pdb"))
            );
        }
    }

    #[test]
    fn empty_job_tree_locates_nothing() {
        let dir = tempdir().unwrap();
        let layout = OutputLayout::new(dir.path(), "T1");

        let located = locate(&layout, 0);

        assert_eq!(located, LocatedArtifacts::default());
        assert_eq!(
            located.missing_confidence_inputs(),
            vec!["structure", "pLDDT", "PAE"]
        );
    }

    #[test]
    fn affinity_is_optional_for_confidence_inputs() {
        let dir = tempdir().unwrap();
        let layout = OutputLayout::new(dir.path(), "T1");
        fs::create_dir_all(layout.predictions_dir()).unwrap();
        for path in [layout.structure(0), layout.plddt(0), layout.pae(0)] {
            fs::write(path, b"").unwrap();
        }

        let located = locate(&layout, 0);

        assert!(located.missing_confidence_inputs().is_empty());
        assert!(located.affinity.is_none());
    }
}
