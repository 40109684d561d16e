use serde::Deserialize;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SpecError {
    #[error("Invalid data structure: \"sequences\" key missing.")]
    MissingSequences,
    #[error("Invalid data structure: {0}")]
    Malformed(String),
    #[error("Entry {index} has no chain IDs")]
    EmptyIds { index: usize },
    #[error("Entry {index} has an empty chain ID")]
    BlankId { index: usize },
    #[error("Protein entry {index} has an empty sequence")]
    EmptySequence { index: usize },
    #[error("Ligand entry {index} must define exactly one of 'ccd' or 'smiles'")]
    LigandSource { index: usize },
    #[error("Chain ID '{0}' is used by more than one entry")]
    DuplicateId(String),
    #[error("Only one affinity property is supported, found {0}")]
    MultipleAffinity(usize),
    #[error("Affinity binder '{0}' does not name a ligand chain")]
    BinderNotLigand(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LigandSource {
    Ccd(String),
    Smiles(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Protein { ids: Vec<String>, sequence: String },
    Ligand { ids: Vec<String>, source: LigandSource },
}

impl Entry {
    pub fn ids(&self) -> &[String] {
        match self {
            Entry::Protein { ids, .. } | Entry::Ligand { ids, .. } => ids,
        }
    }

    pub fn is_ligand(&self) -> bool {
        matches!(self, Entry::Ligand { .. })
    }
}

/// A normalized, validated description of the molecules in a prediction job.
///
/// Chain IDs are unique across all entries, and the optional affinity binder
/// always names a ligand chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceSpec {
    entries: Vec<Entry>,
    affinity_binder: Option<String>,
}

impl SequenceSpec {
    pub fn new(entries: Vec<Entry>, affinity_binder: Option<String>) -> Result<Self, SpecError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            for id in entry.ids() {
                if !seen.insert(id.as_str()) {
                    return Err(SpecError::DuplicateId(id.clone()));
                }
            }
        }

        if let Some(binder) = &affinity_binder {
            let is_ligand_chain = entries
                .iter()
                .filter(|e| e.is_ligand())
                .any(|e| e.ids().iter().any(|id| id == binder));
            if !is_ligand_chain {
                return Err(SpecError::BinderNotLigand(binder.clone()));
            }
        }

        Ok(Self {
            entries,
            affinity_binder,
        })
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn affinity_binder(&self) -> Option<&str> {
        self.affinity_binder.as_deref()
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawIds {
    One(String),
    Many(Vec<String>),
}

impl RawIds {
    fn into_vec(self) -> Vec<String> {
        match self {
            RawIds::One(id) => vec![id],
            RawIds::Many(ids) => ids,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawProtein {
    id: Option<RawIds>,
    #[serde(default)]
    sequence: String,
}

#[derive(Debug, Deserialize)]
struct RawLigand {
    id: Option<RawIds>,
    ccd: Option<String>,
    smiles: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RawEntry {
    Protein(RawProtein),
    Ligand(RawLigand),
}

#[derive(Debug, Deserialize)]
struct RawBinder {
    binder: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RawProperty {
    Affinity(RawBinder),
}

/// The sequence description as submitted, before normalization.
#[derive(Debug, Deserialize)]
pub struct RawSequenceSpec {
    sequences: Option<Vec<RawEntry>>,
    #[serde(default)]
    properties: Vec<RawProperty>,
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

fn normalize_ids(raw: Option<RawIds>, index: usize) -> Result<Vec<String>, SpecError> {
    let ids: Vec<String> = raw
        .map(RawIds::into_vec)
        .unwrap_or_default()
        .iter()
        .map(|id| strip_whitespace(id).to_uppercase())
        .collect();
    if ids.is_empty() {
        return Err(SpecError::EmptyIds { index });
    }
    if ids.iter().any(String::is_empty) {
        return Err(SpecError::BlankId { index });
    }
    Ok(ids)
}

impl TryFrom<RawSequenceSpec> for SequenceSpec {
    type Error = SpecError;

    fn try_from(raw: RawSequenceSpec) -> Result<Self, Self::Error> {
        let raw_entries = raw.sequences.ok_or(SpecError::MissingSequences)?;

        let mut entries = Vec::with_capacity(raw_entries.len());
        for (index, raw_entry) in raw_entries.into_iter().enumerate() {
            let entry = match raw_entry {
                RawEntry::Protein(p) => {
                    let ids = normalize_ids(p.id, index)?;
                    let sequence = strip_whitespace(&p.sequence).to_uppercase();
                    if sequence.is_empty() {
                        return Err(SpecError::EmptySequence { index });
                    }
                    Entry::Protein { ids, sequence }
                }
                RawEntry::Ligand(l) => {
                    let ids = normalize_ids(l.id, index)?;
                    let ccd = l.ccd.map(|c| strip_whitespace(&c).to_uppercase());
                    let smiles = l.smiles.map(|s| strip_whitespace(&s));
                    let source = match (ccd, smiles) {
                        (Some(ccd), None) if !ccd.is_empty() => LigandSource::Ccd(ccd),
                        (None, Some(smiles)) if !smiles.is_empty() => LigandSource::Smiles(smiles),
                        _ => return Err(SpecError::LigandSource { index }),
                    };
                    Entry::Ligand { ids, source }
                }
            };
            entries.push(entry);
        }

        if raw.properties.len() > 1 {
            return Err(SpecError::MultipleAffinity(raw.properties.len()));
        }
        let binder = raw
            .properties
            .into_iter()
            .map(|RawProperty::Affinity(b)| strip_whitespace(&b.binder).to_uppercase())
            .next();

        SequenceSpec::new(entries, binder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<SequenceSpec, SpecError> {
        let raw: RawSequenceSpec = serde_json::from_str(json).unwrap();
        SequenceSpec::try_from(raw)
    }

    #[test]
    fn protein_ids_and_sequence_are_normalized() {
        let spec = parse(r#"{"sequences":[{"protein":{"id":["a ", " b"],"sequence":"mkt av\nlg"}}]}"#)
            .unwrap();
        assert_eq!(
            spec.entries(),
            &[Entry::Protein {
                ids: vec!["A".to_string(), "B".to_string()],
                sequence: "MKTAVLG".to_string(),
            }]
        );
    }

    #[test]
    fn ligand_ccd_is_uppercased_and_smiles_keeps_case() {
        let spec = parse(
            r#"{"sequences":[
                {"ligand":{"id":["c"],"ccd":"sah"}},
                {"ligand":{"id":"d","smiles":"N[C@@H](Cc1ccc(O) cc1)C(=O)O"}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(
            spec.entries()[0],
            Entry::Ligand {
                ids: vec!["C".to_string()],
                source: LigandSource::Ccd("SAH".to_string()),
            }
        );
        assert_eq!(
            spec.entries()[1],
            Entry::Ligand {
                ids: vec!["D".to_string()],
                source: LigandSource::Smiles("N[C@@H](Cc1ccc(O)cc1)C(=O)O".to_string()),
            }
        );
    }

    #[test]
    fn missing_sequences_key_is_rejected() {
        assert_eq!(parse(r#"{"properties":[]}"#), Err(SpecError::MissingSequences));
        assert_eq!(
            SpecError::MissingSequences.to_string(),
            "Invalid data structure: \"sequences\" key missing."
        );
    }

    #[test]
    fn duplicate_chain_ids_across_entries_are_rejected() {
        let result = parse(
            r#"{"sequences":[
                {"protein":{"id":["A"],"sequence":"MK"}},
                {"ligand":{"id":["a"],"ccd":"ATP"}}
            ]}"#,
        );
        assert_eq!(result, Err(SpecError::DuplicateId("A".to_string())));
    }

    #[test]
    fn empty_ids_and_sequences_are_rejected() {
        assert_eq!(
            parse(r#"{"sequences":[{"protein":{"id":[],"sequence":"MK"}}]}"#),
            Err(SpecError::EmptyIds { index: 0 })
        );
        assert_eq!(
            parse(r#"{"sequences":[{"protein":{"id":[" "],"sequence":"MK"}}]}"#),
            Err(SpecError::BlankId { index: 0 })
        );
        assert_eq!(
            parse(r#"{"sequences":[{"protein":{"id":["A"],"sequence":"  "}}]}"#),
            Err(SpecError::EmptySequence { index: 0 })
        );
    }

    #[test]
    fn ligand_needs_exactly_one_source() {
        assert_eq!(
            parse(r#"{"sequences":[{"ligand":{"id":["L"]}}]}"#),
            Err(SpecError::LigandSource { index: 0 })
        );
        assert_eq!(
            parse(r#"{"sequences":[{"ligand":{"id":["L"],"ccd":"ATP","smiles":"CCO"}}]}"#),
            Err(SpecError::LigandSource { index: 0 })
        );
    }

    #[test]
    fn affinity_binder_must_name_a_ligand_chain() {
        let ok = parse(
            r#"{"sequences":[
                {"protein":{"id":["A"],"sequence":"MK"}},
                {"ligand":{"id":["B"],"ccd":"ATP"}}
            ],"properties":[{"affinity":{"binder":"b"}}]}"#,
        )
        .unwrap();
        assert_eq!(ok.affinity_binder(), Some("B"));

        let protein_binder = parse(
            r#"{"sequences":[{"protein":{"id":["A"],"sequence":"MK"}}],
                "properties":[{"affinity":{"binder":"A"}}]}"#,
        );
        assert_eq!(
            protein_binder,
            Err(SpecError::BinderNotLigand("A".to_string()))
        );
    }

    #[test]
    fn more_than_one_affinity_property_is_rejected() {
        let result = parse(
            r#"{"sequences":[
                {"ligand":{"id":["B"],"ccd":"ATP"}},
                {"ligand":{"id":["C"],"ccd":"SAH"}}
            ],"properties":[{"affinity":{"binder":"B"}},{"affinity":{"binder":"C"}}]}"#,
        );
        assert_eq!(result, Err(SpecError::MultipleAffinity(2)));
    }
}
