use crate::core::utils::color::Rgb;
use serde::Deserialize;

/// Card color at binding probability 0.
pub const LOW_PROBABILITY_COLOR: Rgb = Rgb::new(0xF6, 0x3A, 0x3A);
/// Card color at binding probability 1.
pub const HIGH_PROBABILITY_COLOR: Rgb = Rgb::new(0x0A, 0x9C, 0xEB);

/// Range of log10(IC50 / uM) covered by the strength gauge.
pub const GAUGE_RANGE: (f64, f64) = (-3.0, 2.0);

/// The affinity record written by the predictor, one pair per model variant.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct AffinityRecord {
    pub affinity_probability_binary: f64,
    pub affinity_pred_value: f64,
    pub affinity_probability_binary1: f64,
    pub affinity_pred_value1: f64,
    pub affinity_probability_binary2: f64,
    pub affinity_pred_value2: f64,
}

impl AffinityRecord {
    /// Ensemble estimate followed by the two component models.
    pub fn estimates(&self) -> [AffinityEstimate; 3] {
        [
            AffinityEstimate::new(
                "Ensemble Model Analysis",
                self.affinity_probability_binary,
                self.affinity_pred_value,
            ),
            AffinityEstimate::new(
                "Model 1 Analysis",
                self.affinity_probability_binary1,
                self.affinity_pred_value1,
            ),
            AffinityEstimate::new(
                "Model 2 Analysis",
                self.affinity_probability_binary2,
                self.affinity_pred_value2,
            ),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbabilityBucket {
    High,
    Moderate,
    Low,
}

impl ProbabilityBucket {
    pub fn from_probability(p: f64) -> Self {
        if p > 0.75 {
            ProbabilityBucket::High
        } else if p > 0.4 {
            ProbabilityBucket::Moderate
        } else {
            ProbabilityBucket::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProbabilityBucket::High => "High Confidence Binder",
            ProbabilityBucket::Moderate => "Moderate Confidence Binder",
            ProbabilityBucket::Low => "Low Confidence Binder",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AffinityBucket {
    Strong,
    Moderate,
    Weak,
}

impl AffinityBucket {
    pub fn from_log_affinity(v: f64) -> Self {
        if v < -1.0 {
            AffinityBucket::Strong
        } else if v < 1.0 {
            AffinityBucket::Moderate
        } else {
            AffinityBucket::Weak
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AffinityBucket::Strong => "Strong Binder",
            AffinityBucket::Moderate => "Moderate Binder",
            AffinityBucket::Weak => "Weak Binder / Decoy",
        }
    }
}

/// One binding probability and log-affinity pair, with derived quantities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffinityEstimate {
    pub title: &'static str,
    pub probability: f64,
    /// log10 of the predicted IC50 in micromolar.
    pub log_affinity: f64,
}

impl AffinityEstimate {
    pub fn new(title: &'static str, probability: f64, log_affinity: f64) -> Self {
        Self {
            title,
            probability,
            log_affinity,
        }
    }

    pub fn ic50_um(&self) -> f64 {
        10f64.powf(self.log_affinity)
    }

    /// Binding free energy in kcal/mol.
    pub fn delta_g(&self) -> f64 {
        (6.0 - self.log_affinity) * 1.364
    }

    pub fn probability_bucket(&self) -> ProbabilityBucket {
        ProbabilityBucket::from_probability(self.probability)
    }

    pub fn affinity_bucket(&self) -> AffinityBucket {
        AffinityBucket::from_log_affinity(self.log_affinity)
    }

    /// Fill fraction of the strength gauge; stronger binders fill more.
    pub fn gauge_fill(&self) -> f64 {
        let (lo, hi) = GAUGE_RANGE;
        let norm = (self.log_affinity - lo) / (hi - lo);
        (1.0 - norm).clamp(0.0, 1.0)
    }

    pub fn color(&self) -> Rgb {
        LOW_PROBABILITY_COLOR.lerp(HIGH_PROBABILITY_COLOR, self.probability)
    }
}
