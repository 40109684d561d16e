use crate::core::io::affinity::read_affinity;
use crate::core::io::npz::{read_pae, read_plddt};
use crate::core::io::pdb::StructureFile;
use crate::core::models::affinity::AffinityRecord;
use crate::core::models::artifacts::{ArtifactError, OutputLayout};
use crate::core::models::confidence::{ChainConfidence, split_by_chain};
use crate::engine::context::RunContext;
use crate::engine::error::EngineError;
use crate::engine::locator::{self, LocatedArtifacts};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::report::analysis::{AnalysisReport, ConfidenceSection};
use crate::report::confidence::{ChainCard, write_stats_csv};
use crate::report::{figures, page};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument, warn};

#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub report_path: PathBuf,
    /// Number of chains with a confidence card.
    pub chains: usize,
    pub has_affinity: bool,
    /// SVG figures and the statistics CSV written next to the report.
    pub exported: Vec<PathBuf>,
}

#[instrument(skip_all, name = "analysis_workflow", fields(session = %ctx.session_id(), job = job_name, model = model))]
pub fn run(
    ctx: &RunContext,
    job_name: &str,
    model: u32,
    reporter: &ProgressReporter,
) -> Result<AnalysisResult, EngineError> {
    let layout = ctx.layout(job_name);

    reporter.report(Progress::PhaseStart {
        name: "Loading results",
    });
    let located = locator::locate(&layout, model);
    let confidence = load_confidence(&located);
    let affinity = load_affinity(&located);
    reporter.report(Progress::PhaseFinish);

    if confidence.is_err() && affinity.is_none() {
        return Err(EngineError::NoReportData);
    }

    let mut exported = Vec::new();
    let (section, chains) = match &confidence {
        Ok(chains) => {
            let cards = reporter.phase("Rendering confidence plots", || {
                render_cards(&layout, model, chains, reporter, &mut exported)
            })?;
            (ConfidenceSection::Cards(cards), chains.len())
        }
        Err(message) => (ConfidenceSection::Unavailable(message.clone()), 0),
    };

    let report = AnalysisReport {
        job_name,
        confidence: section,
        affinity,
    };
    let report_path = layout.analysis_report();
    page::write_html(&report_path, &report.render())?;
    info!("Analysis report written to {}", report_path.display());

    Ok(AnalysisResult {
        report_path,
        chains,
        has_affinity: affinity.is_some(),
        exported,
    })
}

/// Reads and splits the confidence arrays, or explains why they are unusable.
fn load_confidence(located: &LocatedArtifacts) -> Result<Vec<ChainConfidence>, String> {
    let (Some(structure), Some(plddt), Some(pae)) =
        (&located.structure, &located.plddt, &located.pae)
    else {
        let message = format!(
            "Missing required files: {}",
            located.missing_confidence_inputs().join(", ")
        );
        error!("{}", message);
        return Err(message);
    };

    let read = || -> Result<Vec<ChainConfidence>, ArtifactError> {
        let structure = StructureFile::read_from_path(structure)?;
        let plddt = read_plddt(plddt)?;
        let pae = read_pae(pae)?;
        split_by_chain(&structure.chains, &plddt, &pae)
    };

    match read() {
        Ok(chains) if chains.is_empty() => {
            let message = "No protein chains found in the predicted structure.".to_string();
            error!("{}", message);
            Err(message)
        }
        Ok(chains) => Ok(chains),
        Err(e) => {
            error!("Failed to load confidence data: {}", e);
            Err(format!("Could not load confidence data: {}", e))
        }
    }
}

fn load_affinity(located: &LocatedArtifacts) -> Option<AffinityRecord> {
    let path = located.affinity.as_ref()?;
    match read_affinity(path) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!("Skipping affinity section: {}", e);
            None
        }
    }
}

fn render_cards<'a>(
    layout: &OutputLayout,
    model: u32,
    chains: &'a [ChainConfidence],
    reporter: &ProgressReporter,
    exported: &mut Vec<PathBuf>,
) -> Result<Vec<ChainCard<'a>>, EngineError> {
    let plots_dir = layout.plots_dir();
    fs::create_dir_all(&plots_dir).map_err(|e| EngineError::io(&plots_dir, e))?;
    let stem = layout.model_stem(model);

    reporter.report(Progress::TaskStart {
        total_steps: chains.len() as u64,
    });
    let mut cards = Vec::with_capacity(chains.len());
    for chain in chains {
        let plddt_svg = figures::plddt_chart(chain)?;
        let pae_svg = figures::pae_heatmap(chain)?;

        for (kind, svg) in [("plddt", &plddt_svg), ("pae", &pae_svg)] {
            let path = plots_dir.join(format!("{}_chain_{}_{}.svg", stem, chain.chain_id, kind));
            write_file(&path, svg)?;
            exported.push(path);
        }

        cards.push(ChainCard {
            chain,
            plddt_svg,
            pae_svg,
        });
        reporter.report(Progress::TaskIncrement);
    }
    reporter.report(Progress::TaskFinish);

    let csv_path = plots_dir.join(format!("{}_chain_stats.csv", stem));
    let file = File::create(&csv_path).map_err(|e| EngineError::io(&csv_path, e))?;
    write_stats_csv(file, chains).map_err(|e| EngineError::io(&csv_path, e.into()))?;
    exported.push(csv_path);

    Ok(cards)
}

fn write_file(path: &Path, contents: &str) -> Result<(), EngineError> {
    fs::write(path, contents).map_err(|e| EngineError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, array};
    use ndarray_npy::NpzWriter;
    use tempfile::tempdir;

    const PDB: &str = "\
ATOM      1  N   MET A   1      11.104   6.134  -6.504  1.00 91.20           N
ATOM      2  N   LYS A   2      12.104   7.134  -6.504  1.00 85.00           N
ATOM      3  N   GLY B   1       1.000   2.000   3.000  1.00 60.00           N
END
";

    const AFFINITY: &str = r#"{
        "affinity_pred_value": -1.5, "affinity_probability_binary": 0.82,
        "affinity_pred_value1": -0.4, "affinity_probability_binary1": 0.55,
        "affinity_pred_value2": 1.2, "affinity_probability_binary2": 0.3
    }"#;

    fn write_confidence(layout: &OutputLayout) {
        fs::create_dir_all(layout.predictions_dir()).unwrap();
        fs::write(layout.structure(0), PDB).unwrap();

        let mut npz = NpzWriter::new_compressed(File::create(layout.plddt(0)).unwrap());
        npz.add_array("plddt", &array![0.95f32, 0.8, 0.5]).unwrap();
        npz.finish().unwrap();

        let mut npz = NpzWriter::new_compressed(File::create(layout.pae(0)).unwrap());
        npz.add_array("pae", &Array2::<f32>::from_elem((3, 3), 2.0))
            .unwrap();
        npz.finish().unwrap();
    }

    #[test]
    fn full_results_produce_cards_plots_and_affinity() {
        let dir = tempdir().unwrap();
        let ctx = RunContext::new(dir.path());
        let layout = ctx.layout("T1");
        write_confidence(&layout);
        fs::write(layout.affinity(), AFFINITY).unwrap();

        let result = run(&ctx, "T1", 0, &ProgressReporter::new()).unwrap();

        assert_eq!(result.chains, 2);
        assert!(result.has_affinity);
        assert_eq!(result.exported.len(), 5);
        assert!(layout.plots_dir().join("T1_model_0_chain_A_pae.svg").is_file());
        assert!(layout.plots_dir().join("T1_model_0_chain_stats.csv").is_file());

        let html = fs::read_to_string(result.report_path).unwrap();
        assert!(html.contains("<h3>Chain A</h3>"));
        assert!(html.contains("<h3>Chain B</h3>"));
        assert!(html.contains("Affinity Result: T1"));
    }

    #[test]
    fn missing_pae_degrades_to_a_notice_when_affinity_exists() {
        let dir = tempdir().unwrap();
        let ctx = RunContext::new(dir.path());
        let layout = ctx.layout("T1");
        write_confidence(&layout);
        fs::remove_file(layout.pae(0)).unwrap();
        fs::write(layout.affinity(), AFFINITY).unwrap();

        let result = run(&ctx, "T1", 0, &ProgressReporter::new()).unwrap();

        assert_eq!(result.chains, 0);
        let html = fs::read_to_string(result.report_path).unwrap();
        assert!(html.contains("Missing required files: PAE"));
        assert!(html.contains("Ensemble Model Analysis"));
    }

    #[test]
    fn malformed_affinity_is_skipped() {
        let dir = tempdir().unwrap();
        let ctx = RunContext::new(dir.path());
        let layout = ctx.layout("T1");
        write_confidence(&layout);
        fs::write(layout.affinity(), "{ not json").unwrap();

        let result = run(&ctx, "T1", 0, &ProgressReporter::new()).unwrap();

        assert!(!result.has_affinity);
        assert_eq!(result.chains, 2);
    }

    #[test]
    fn nothing_to_report_is_an_error() {
        let dir = tempdir().unwrap();
        let ctx = RunContext::new(dir.path());

        let err = run(&ctx, "T1", 0, &ProgressReporter::new()).unwrap_err();

        assert!(matches!(err, EngineError::NoReportData));
    }
}
