use crate::core::models::sequence::{Entry, LigandSource, RawSequenceSpec, SequenceSpec, SpecError};
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum YamlError {
    #[error("Invalid data structure: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error(transparent)]
    Spec(#[from] SpecError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Outcome of [`emit_params`], serialized as `{"status": "ok", "filename": ...}`
/// or `{"status": "error", "message": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum EmitStatus {
    Ok { filename: String },
    Error { message: String },
}

impl EmitStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, EmitStatus::Ok { .. })
    }
}

/// Parses a JSON or YAML sequence description into a validated [`SequenceSpec`].
pub fn parse_spec_document(text: &str) -> Result<SequenceSpec, YamlError> {
    let value: serde_yaml::Value = serde_yaml::from_str(text)?;
    match &value {
        serde_yaml::Value::Mapping(map) if !map.contains_key("sequences") => {
            return Err(SpecError::MissingSequences.into());
        }
        serde_yaml::Value::Mapping(_) => {}
        _ => return Err(SpecError::MissingSequences.into()),
    }
    // Entries use the single-key map form, which only the text deserializer decodes.
    let raw: RawSequenceSpec = serde_yaml::from_str(text)?;
    Ok(SequenceSpec::try_from(raw)?)
}

/// Reads the description at `input`, writes the predictor YAML to `output`,
/// and reports the result as a status object instead of an error.
pub fn emit_params(input: &Path, output: &Path) -> EmitStatus {
    let result = fs::read_to_string(input)
        .map_err(YamlError::from)
        .and_then(|text| parse_spec_document(&text))
        .and_then(|spec| {
            let mut buffer = Vec::new();
            write_spec(&spec, &mut buffer)?;
            fs::write(output, buffer)?;
            Ok(spec)
        });

    match result {
        Ok(spec) => {
            info!(
                "Wrote {} sequence entries to {}",
                spec.entries().len(),
                output.display()
            );
            EmitStatus::Ok {
                filename: output
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| output.display().to_string()),
            }
        }
        Err(e) => {
            warn!("Failed to emit predictor input: {}", e);
            EmitStatus::Error {
                message: e.to_string(),
            }
        }
    }
}

pub fn write_spec(spec: &SequenceSpec, writer: &mut impl Write) -> io::Result<()> {
    writeln!(writer, "version: 1")?;
    writeln!(writer, "sequences:")?;
    for entry in spec.entries() {
        match entry {
            Entry::Protein { ids, sequence } => {
                writeln!(writer, "- protein:")?;
                writeln!(writer, "    id: {}", flow_list(ids))?;
                writeln!(writer, "    sequence: {}", plain_scalar(sequence))?;
            }
            Entry::Ligand { ids, source } => {
                writeln!(writer, "- ligand:")?;
                writeln!(writer, "    id: {}", flow_list(ids))?;
                match source {
                    LigandSource::Ccd(code) => writeln!(writer, "    ccd: {}", plain_scalar(code))?,
                    LigandSource::Smiles(smiles) => {
                        writeln!(writer, "    smiles: {}", single_quoted(smiles))?
                    }
                }
            }
        }
    }
    if let Some(binder) = spec.affinity_binder() {
        writeln!(writer, "properties:")?;
        writeln!(writer, "- affinity:")?;
        writeln!(writer, "    binder: {}", plain_scalar(binder))?;
    }
    Ok(())
}

/// Joins a `sequence: |-` block scalar header with the line that follows it.
pub fn fold_block_sequences(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut lines = text.lines();
    while let Some(line) = lines.next() {
        if let Some(head) = line.trim_end().strip_suffix("sequence: |-") {
            if let Some(next) = lines.next() {
                debug!("Folding block sequence scalar onto one line");
                out.push_str(head);
                out.push_str("sequence: ");
                out.push_str(next.trim_start());
                out.push('\n');
                continue;
            }
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}

const RESERVED_WORDS: [&str; 10] = [
    "y", "n", "yes", "no", "on", "off", "true", "false", "null", "~",
];

fn needs_quoting(value: &str, in_flow: bool) -> bool {
    let Some(first) = value.chars().next() else {
        return true;
    };
    if RESERVED_WORDS.contains(&value.to_lowercase().as_str()) {
        return true;
    }
    if first.is_ascii_digit() || value.parse::<f64>().is_ok() {
        return true;
    }
    if "-?:,[]{}#&*!|>'\"%@`".contains(first) || first.is_whitespace() {
        return true;
    }
    if value.ends_with(char::is_whitespace) || value.contains(": ") || value.contains(" #") {
        return true;
    }
    in_flow && value.contains([',', '[', ']', '{', '}'])
}

fn single_quoted(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn plain_scalar(value: &str) -> String {
    if needs_quoting(value, false) {
        single_quoted(value)
    } else {
        value.to_string()
    }
}

fn flow_list(ids: &[String]) -> String {
    let items: Vec<String> = ids
        .iter()
        .map(|id| {
            if needs_quoting(id, true) {
                single_quoted(id)
            } else {
                id.clone()
            }
        })
        .collect();
    format!("[{}]", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn emit(spec: &SequenceSpec) -> String {
        let mut buf = Vec::new();
        write_spec(spec, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn writes_keys_in_fixed_order_with_flow_id_lists() {
        let spec = parse_spec_document(
            r#"{"properties":[{"affinity":{"binder":"C"}}],
                "sequences":[
                  {"protein":{"id":["A","B"],"sequence":"MKT"}},
                  {"ligand":{"id":["C"],"ccd":"sah"}}
                ]}"#,
        )
        .unwrap();

        assert_eq!(
            emit(&spec),
            "version: 1\n\
             sequences:\n\
             - protein:\n    id: [A, B]\n    sequence: MKT\n\
             - ligand:\n    id: [C]\n    ccd: SAH\n\
             properties:\n\
             - affinity:\n    binder: C\n"
        );
    }

    #[test]
    fn smiles_is_whitespace_free_and_single_quoted() {
        let spec = parse_spec_document(
            "sequences:\n  - ligand:\n      id: [L]\n      smiles: \"CC(=O) O\"\n",
        )
        .unwrap();
        let text = emit(&spec);
        assert!(text.contains("    smiles: 'CC(=O)O'\n"));
    }

    #[test]
    fn ambiguous_scalars_are_quoted_so_they_read_back_as_strings() {
        let spec = parse_spec_document(
            r#"{"sequences":[
                {"protein":{"id":["y","1"],"sequence":"NO"}},
                {"ligand":{"id":["L"],"smiles":"O'C"}}
            ]}"#,
        )
        .unwrap();
        let text = emit(&spec);

        let value: serde_yaml::Value = serde_yaml::from_str(&text).unwrap();
        let protein = &value["sequences"][0]["protein"];
        assert_eq!(protein["id"][0].as_str(), Some("Y"));
        assert_eq!(protein["id"][1].as_str(), Some("1"));
        assert_eq!(protein["sequence"].as_str(), Some("NO"));
        assert_eq!(
            value["sequences"][1]["ligand"]["smiles"].as_str(),
            Some("O'C")
        );
        assert_eq!(value["version"].as_u64(), Some(1));
    }

    #[test]
    fn entries_in_single_key_map_form_are_decoded() {
        let json = parse_spec_document(r#"{"sequences":[{"protein":{"id":["a","b"],"sequence":"mk t"}}]}"#)
            .unwrap();
        assert_eq!(
            json.entries(),
            &[Entry::Protein {
                ids: vec!["A".to_string(), "B".to_string()],
                sequence: "MKT".to_string(),
            }]
        );

        let yaml = parse_spec_document(
            "sequences:\n\
             - protein:\n    id: [A]\n    sequence: MKT\n\
             - ligand:\n    id: B\n    ccd: atp\n\
             properties:\n\
             - affinity:\n    binder: b\n",
        )
        .unwrap();
        assert_eq!(yaml.entries().len(), 2);
        assert_eq!(yaml.affinity_binder(), Some("B"));
    }

    #[test]
    fn unknown_entry_kind_is_a_parse_error() {
        let err = parse_spec_document(r#"{"sequences":[{"dna":{"id":["A"],"sequence":"ACGT"}}]}"#)
            .unwrap_err();
        assert!(matches!(err, YamlError::Parse(_)));
    }

    #[test]
    fn document_without_sequences_is_reported_as_missing() {
        let err = parse_spec_document("properties: []\n").unwrap_err();
        assert!(matches!(err, YamlError::Spec(SpecError::MissingSequences)));
    }

    #[test]
    fn emit_params_reports_ok_status_with_filename() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("spec.json");
        let output = dir.path().join("params.yaml");
        fs::write(
            &input,
            r#"{"sequences":[{"protein":{"id":["A"],"sequence":"mk"}}]}"#,
        )
        .unwrap();

        let status = emit_params(&input, &output);

        assert_eq!(
            status,
            EmitStatus::Ok {
                filename: "params.yaml".to_string()
            }
        );
        let written = fs::read_to_string(&output).unwrap();
        assert!(written.contains("sequence: MK"));
        assert_eq!(
            serde_json::to_string(&status).unwrap(),
            r#"{"status":"ok","filename":"params.yaml"}"#
        );
    }

    #[test]
    fn emit_params_reports_duplicate_ids_without_writing() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("spec.json");
        let output = dir.path().join("params.yaml");
        fs::write(
            &input,
            r#"{"sequences":[
                {"protein":{"id":["A"],"sequence":"MK"}},
                {"protein":{"id":["A"],"sequence":"GG"}}
            ]}"#,
        )
        .unwrap();

        let status = emit_params(&input, &output);

        assert_eq!(
            status,
            EmitStatus::Error {
                message: "Chain ID 'A' is used by more than one entry".to_string()
            }
        );
        assert!(!output.exists());
    }

    #[test]
    fn unwritable_output_reports_error_and_leaves_no_file() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("spec.json");
        let output = dir.path().join("missing/params.yaml");
        fs::write(
            &input,
            r#"{"sequences":[{"protein":{"id":["A"],"sequence":"MK"}}]}"#,
        )
        .unwrap();

        let status = emit_params(&input, &output);

        assert!(!status.is_ok());
        assert!(!output.exists());
    }

    #[test]
    fn missing_sequences_status_matches_the_form_message() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("spec.json");
        fs::write(&input, "{}").unwrap();

        let status = emit_params(&input, &dir.path().join("params.yaml"));

        assert_eq!(
            serde_json::to_value(&status).unwrap(),
            serde_json::json!({
                "status": "error",
                "message": "Invalid data structure: \"sequences\" key missing."
            })
        );
    }

    #[test]
    fn fold_block_sequences_joins_header_with_next_line() {
        let text = "- protein:\n    id: [A]\n    sequence: |-\n      MKTAYIAK\n- ligand:\n";
        assert_eq!(
            fold_block_sequences(text),
            "- protein:\n    id: [A]\n    sequence: MKTAYIAK\n- ligand:\n"
        );
    }

    #[test]
    fn fold_block_sequences_leaves_plain_scalars_alone() {
        let text = "    sequence: MKT\n";
        assert_eq!(fold_block_sequences(text), text);
    }
}
