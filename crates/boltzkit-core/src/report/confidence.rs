use crate::core::models::confidence::ChainConfidence;
use crate::core::utils::html::escape;
use serde::Serialize;
use std::io::Write;

pub const CONFIDENCE_STYLES: &str = r#"
    .dashboard-container { background-color: #f8f9fa; border: 1px solid #dee2e6; border-radius: 12px; padding: 25px; }
    .dashboard-header h2 { color: var(--primary); border-bottom: 2px solid var(--accent); padding-bottom: 10px; font-size: 1.8em; margin-top: 0; }
    .dashboard-header p { margin-bottom: 25px; color: var(--muted); line-height: 1.6; }
    .chain-card { background-color: #ffffff; border: 1px solid #e9ecef; border-radius: 10px; margin-bottom: 25px; box-shadow: 0 4px 12px rgba(0,0,0,0.05); overflow: hidden; }
    .card-header { padding: 15px 20px; background-color: #f8f9fa; display: flex; justify-content: space-between; align-items: center; border-bottom: 1px solid #e9ecef; }
    .card-header h3 { margin: 0; color: #343a40; font-size: 1.4em; }
    .stats-container { display: flex; gap: 20px; }
    .stat-item { color: #495057; font-size: 0.95em; }
    .stat-item span { font-weight: 700; padding: 4px 8px; border-radius: 5px; color: #fff; }
    .plddt-high { background-color: #28a745; }
    .plddt-medium { background-color: #fd7e14; }
    .plddt-low { background-color: #dc3545; }
    .plot-grid { display: grid; grid-template-columns: 65% 35%; gap: 0; padding: 20px; }
    .plot-item { text-align: center; }
    .plot-item svg { max-width: 100%; height: auto; }
"#;

/// A chain's confidence data together with its rendered figures.
pub struct ChainCard<'a> {
    pub chain: &'a ChainConfidence,
    pub plddt_svg: String,
    pub pae_svg: String,
}

impl ChainCard<'_> {
    pub fn render(&self) -> String {
        let stats = &self.chain.stats;
        format!(
            r#"<div class="chain-card">
    <div class="card-header">
        <h3>Chain {chain_id}</h3>
        <div class="stats-container">
            <div class="stat-item"><strong>Mean pLDDT:</strong> <span class="{tier}">{mean:.2}</span></div>
            <div class="stat-item"><strong>Confident (&gt;70):</strong> {confident:.1}%</div>
            <div class="stat-item"><strong>Very High (&gt;90):</strong> {very_high:.1}%</div>
        </div>
    </div>
    <div class="plot-grid">
        <div class="plot-item">{plddt}</div>
        <div class="plot-item">{pae}</div>
    </div>
</div>
"#,
            chain_id = escape(&self.chain.chain_id),
            tier = stats.tier().css_class(),
            mean = stats.mean_plddt,
            confident = stats.pct_confident,
            very_high = stats.pct_very_high,
            plddt = self.plddt_svg,
            pae = self.pae_svg,
        )
    }
}

pub fn render_section(job_name: &str, cards: &[ChainCard]) -> String {
    let cards_html: String = cards.iter().map(ChainCard::render).collect();
    format!(
        r#"<div class="dashboard-header">
    <h2>Model Confidence: {}</h2>
    <p>
        Summary statistics and confidence plots for each predicted protein chain.
        Higher pLDDT scores and lower PAE values indicate a more reliable prediction.
    </p>
</div>
{}"#,
        escape(job_name),
        cards_html
    )
}

#[derive(Debug, Serialize)]
struct StatsRow<'a> {
    chain_id: &'a str,
    residues: usize,
    mean_plddt: f64,
    pct_confident: f64,
    pct_very_high: f64,
    tier: &'a str,
}

/// Writes one CSV row of summary statistics per chain.
pub fn write_stats_csv<W: Write>(writer: W, chains: &[ChainConfidence]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for chain in chains {
        csv_writer.serialize(StatsRow {
            chain_id: &chain.chain_id,
            residues: chain.plddt.len(),
            mean_plddt: chain.stats.mean_plddt,
            pct_confident: chain.stats.pct_confident,
            pct_very_high: chain.stats.pct_very_high,
            tier: chain.stats.tier().css_class().trim_start_matches("plddt-"),
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}
