use super::artifacts::ArtifactError;
use crate::core::utils::color::Rgb;
use ndarray::{Array1, Array2};
use phf::phf_map;

pub const CONFIDENT_THRESHOLD: f64 = 70.0;
pub const VERY_HIGH_THRESHOLD: f64 = 90.0;

/// Categorical palette assigned to chains in file order.
pub const CHAIN_PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Heatmap gradient (low error, high error) matching each palette color.
static PAE_GRADIENTS: phf::Map<&'static str, (&'static str, &'static str)> = phf_map! {
    "#1f77b4" => ("#08306b", "#f7fbff"),
    "#ff7f0e" => ("#7f2704", "#fff5eb"),
    "#2ca02c" => ("#00441b", "#f7fcf5"),
    "#d62728" => ("#67000d", "#fff5f0"),
    "#9467bd" => ("#3f007d", "#fcfbfd"),
    "#8c564b" => ("#662506", "#ffffe5"),
    "#e377c2" => ("#49006a", "#fff7f3"),
    "#7f7f7f" => ("#000000", "#ffffff"),
    "#bcbd22" => ("#ffff66", "#008066"),
    "#17becf" => ("#084081", "#f7fcf0"),
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainStyle {
    pub line: Rgb,
    pub gradient_low: Rgb,
    pub gradient_high: Rgb,
}

impl ChainStyle {
    /// Style for the chain at `position` in file order; the palette wraps around.
    pub fn for_position(position: usize) -> Self {
        let hex = CHAIN_PALETTE[position % CHAIN_PALETTE.len()];
        let (low, high) = PAE_GRADIENTS
            .get(hex)
            .copied()
            .unwrap_or(("#08306b", "#f7fbff"));
        let parse = |h: &str| Rgb::from_hex(h).unwrap_or(Rgb::new(0, 0, 0));
        Self {
            line: parse(hex),
            gradient_low: parse(low),
            gradient_high: parse(high),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl ConfidenceTier {
    pub fn from_mean(mean_plddt: f64) -> Self {
        if mean_plddt >= VERY_HIGH_THRESHOLD {
            ConfidenceTier::High
        } else if mean_plddt >= CONFIDENT_THRESHOLD {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::Low
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            ConfidenceTier::High => "plddt-high",
            ConfidenceTier::Medium => "plddt-medium",
            ConfidenceTier::Low => "plddt-low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainStats {
    pub mean_plddt: f64,
    /// Percentage of residues strictly above 70.
    pub pct_confident: f64,
    /// Percentage of residues strictly above 90.
    pub pct_very_high: f64,
}

impl ChainStats {
    pub fn from_scores(scores: &[f64]) -> Option<Self> {
        if scores.is_empty() {
            return None;
        }
        let n = scores.len() as f64;
        let pct_above =
            |threshold: f64| scores.iter().filter(|&&s| s > threshold).count() as f64 / n * 100.0;
        Some(Self {
            mean_plddt: scores.iter().sum::<f64>() / n,
            pct_confident: pct_above(CONFIDENT_THRESHOLD),
            pct_very_high: pct_above(VERY_HIGH_THRESHOLD),
        })
    }

    pub fn tier(&self) -> ConfidenceTier {
        ConfidenceTier::from_mean(self.mean_plddt)
    }
}

/// Confidence data for one polymer chain: pLDDT on a 0-100 scale and the
/// symmetrized intra-chain PAE block.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainConfidence {
    pub chain_id: String,
    pub style: ChainStyle,
    pub plddt: Vec<f64>,
    pub pae: Array2<f64>,
    pub stats: ChainStats,
}

/// Splits whole-structure arrays into per-chain blocks.
///
/// `chains` lists each chain with the global token indices of its polymer
/// residues, in file order. Chains without polymer residues are skipped but
/// still consume a palette slot.
pub fn split_by_chain(
    chains: &[(String, Vec<usize>)],
    plddt: &Array1<f64>,
    pae: &Array2<f64>,
) -> Result<Vec<ChainConfidence>, ArtifactError> {
    let (rows, cols) = pae.dim();
    let mut result = Vec::new();

    for (position, (chain_id, indices)) in chains.iter().enumerate() {
        let Some(stats_scores) = gather(indices, plddt)? else {
            continue;
        };
        for &i in indices {
            if i >= rows.min(cols) {
                return Err(ArtifactError::IndexOutOfRange {
                    what: "the PAE matrix",
                    index: i,
                    len: rows.min(cols),
                });
            }
        }

        let n = indices.len();
        let block = Array2::from_shape_fn((n, n), |(a, b)| {
            let (i, j) = (indices[a], indices[b]);
            (pae[[i, j]] + pae[[j, i]]) / 2.0
        });

        let Some(stats) = ChainStats::from_scores(&stats_scores) else {
            continue;
        };
        result.push(ChainConfidence {
            chain_id: chain_id.clone(),
            style: ChainStyle::for_position(position),
            plddt: stats_scores,
            pae: block,
            stats,
        });
    }

    Ok(result)
}

fn gather(indices: &[usize], plddt: &Array1<f64>) -> Result<Option<Vec<f64>>, ArtifactError> {
    if indices.is_empty() {
        return Ok(None);
    }
    indices
        .iter()
        .map(|&i| {
            plddt.get(i).copied().ok_or(ArtifactError::IndexOutOfRange {
                what: "the pLDDT array",
                index: i,
                len: plddt.len(),
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}
