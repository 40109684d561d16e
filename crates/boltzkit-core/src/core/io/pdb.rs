use crate::core::models::artifacts::ArtifactError;
use std::fs;
use std::path::Path;
use tracing::{debug, trace};

/// A predicted structure: its raw PDB text and the chain layout of its first model.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureFile {
    pub text: String,
    /// Chains in order of first appearance, each with the global token indices
    /// of its polymer (`ATOM`) residues.
    pub chains: Vec<(String, Vec<usize>)>,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

#[derive(Default)]
struct ChainResidues {
    id: String,
    residues: Vec<(String, String)>,
}

impl StructureFile {
    pub fn read_from_path(path: &Path) -> Result<Self, ArtifactError> {
        let text = fs::read_to_string(path).map_err(|e| ArtifactError::from_io(path, e))?;
        let structure = Self::parse(text);
        if structure.chains.is_empty() {
            return Err(ArtifactError::malformed(path, "no ATOM or HETATM records"));
        }
        debug!(
            "Read structure {} with {} chain(s)",
            path.display(),
            structure.chains.len()
        );
        Ok(structure)
    }

    pub fn parse(text: String) -> Self {
        let mut chains: Vec<ChainResidues> = Vec::new();

        for line in text.lines() {
            let record = slice_and_trim(line, 0, 6);
            if record == "ENDMDL" {
                trace!("Stopping at the end of the first model");
                break;
            }
            let is_polymer = match record {
                "ATOM" => true,
                "HETATM" => false,
                _ => continue,
            };

            let chain_id = slice_and_trim(line, 21, 22);
            let chain_pos = match chains.iter().position(|c| c.id == chain_id) {
                Some(pos) => pos,
                None => {
                    chains.push(ChainResidues {
                        id: chain_id.to_string(),
                        ..Default::default()
                    });
                    chains.len() - 1
                }
            };
            if !is_polymer {
                continue;
            }

            let key = (
                slice_and_trim(line, 22, 26).to_string(),
                slice_and_trim(line, 26, 27).to_string(),
            );
            let residues = &mut chains[chain_pos].residues;
            if !residues.contains(&key) {
                residues.push(key);
            }
        }

        let mut next_index = 0;
        let chains = chains
            .into_iter()
            .map(|chain| {
                let indices: Vec<usize> = (next_index..next_index + chain.residues.len()).collect();
                next_index += chain.residues.len();
                (chain.id, indices)
            })
            .collect();

        Self { text, chains }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PDB: &str = "\
HEADER    TEST
ATOM      1  N   MET A   1      11.104   6.134  -6.504  1.00 91.20           N
ATOM      2  CA  MET A   1      11.639   6.071  -5.147  1.00 91.20           C
ATOM      3  N   LYS A   2      12.104   7.134  -6.504  1.00 85.00           N
ATOM      4  N   LYS A   2A     12.104   7.134  -6.504  1.00 85.00           N
HETATM    5  C1  SAH B   1       1.000   2.000   3.000  1.00 70.00           C
ATOM      6  N   GLY C   5       1.000   2.000   3.000  1.00 60.00           N
ATOM      7  CA  GLY C   5       1.000   2.000   3.000  1.00 60.00           C
ENDMDL
ATOM      8  N   ALA D   1       1.000   2.000   3.000  1.00 60.00           N
END
";

    #[test]
    fn polymer_residues_get_sequential_global_indices() {
        let structure = StructureFile::parse(PDB.to_string());

        assert_eq!(
            structure.chains,
            vec![
                ("A".to_string(), vec![0, 1, 2]),
                ("B".to_string(), vec![]),
                ("C".to_string(), vec![3]),
            ]
        );
    }

    #[test]
    fn raw_text_is_kept_for_the_viewer() {
        let structure = StructureFile::parse(PDB.to_string());
        assert!(structure.text.starts_with("HEADER"));
    }

    #[test]
    fn interleaved_chain_records_are_grouped_by_chain() {
        let text = "\
ATOM      1  N   MET A   1      11.104   6.134  -6.504  1.00 91.20           N
ATOM      2  N   MET B   1      11.104   6.134  -6.504  1.00 91.20           N
ATOM      3  N   LYS A   2      11.104   6.134  -6.504  1.00 91.20           N
";
        let structure = StructureFile::parse(text.to_string());
        assert_eq!(
            structure.chains,
            vec![
                ("A".to_string(), vec![0, 1]),
                ("B".to_string(), vec![2]),
            ]
        );
    }

    #[test]
    fn missing_structure_file_is_reported_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("T1_model_0.pdb");
        let err = StructureFile::read_from_path(&path).unwrap_err();
        assert!(matches!(err, ArtifactError::Missing { .. }));
    }

    #[test]
    fn file_without_coordinates_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.pdb");
        fs::write(&path, "HEADER\nEND\n").unwrap();
        let err = StructureFile::read_from_path(&path).unwrap_err();
        assert!(matches!(err, ArtifactError::Malformed { .. }));
    }
}
