use crate::cli::PrepareArgs;
use crate::config::defaults::DefaultsConfig;
use crate::error::{CliError, Result};
use boltzkit::core::io::yaml::{self, EmitStatus};
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub async fn run(args: PrepareArgs, work_dir: &Path) -> Result<()> {
    let output = output_path(&args, work_dir);
    info!(
        "Converting {} into predictor input {}",
        args.input.display(),
        output.display()
    );

    let status = yaml::emit_params(&args.input, &output);
    let json = serde_json::to_string(&status).map_err(|e| CliError::Other(e.into()))?;
    println!("{}", json);

    match status {
        EmitStatus::Ok { .. } => Ok(()),
        EmitStatus::Error { message } => {
            error!("Parameter preparation failed: {}", message);
            Err(CliError::FileParsing {
                path: args.input,
                source: anyhow::anyhow!(message),
            })
        }
    }
}

fn output_path(args: &PrepareArgs, work_dir: &Path) -> PathBuf {
    args.output
        .clone()
        .unwrap_or_else(|| work_dir.join(DefaultsConfig::default().prepared_yaml))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn valid_description_is_written_to_the_default_output() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("spec.json");
        fs::write(
            &input,
            r#"{"sequences": [{"protein": {"id": "a", "sequence": "mkt aa"}}]}"#,
        )
        .unwrap();

        run(
            PrepareArgs {
                input,
                output: None,
            },
            dir.path(),
        )
        .await
        .unwrap();

        let yaml = fs::read_to_string(dir.path().join("params.yaml")).unwrap();
        assert!(yaml.contains("MKTAA"));
    }

    #[tokio::test]
    async fn invalid_description_is_an_error() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("spec.json");
        fs::write(&input, r#"{"proteins": []}"#).unwrap();

        let err = run(
            PrepareArgs {
                input,
                output: Some(dir.path().join("out.yaml")),
            },
            dir.path(),
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("\"sequences\" key missing"));
        assert!(!dir.path().join("out.yaml").exists());
    }
}
