//! Heuristic "which factor matters most" ranking shown next to a run.
//!
//! Scores are the normalised parameter values themselves plus fixed weights
//! for comorbidities. They are not fitted, and stand in for a surrogate-model
//! attribution.

use hiv_core::{ModuleTag, SimulationParameters};
use serde::{Deserialize, Serialize};

/// Score assigned to an active diabetes comorbidity.
pub const DIABETES_INFLUENCE: f64 = 0.75;

/// Score assigned to an active hypertension comorbidity.
pub const HYPERTENSION_INFLUENCE: f64 = 0.65;

/// Qualitative strength of an influence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InfluenceBand {
    /// Score above 0.75.
    VeryStrong,
    /// Score above 0.5.
    Moderate,
    /// Everything else.
    Lower,
}

impl InfluenceBand {
    /// Classifies a score.
    pub fn classify(score: f64) -> Self {
        if score > 0.75 {
            InfluenceBand::VeryStrong
        } else if score > 0.5 {
            InfluenceBand::Moderate
        } else {
            InfluenceBand::Lower
        }
    }

    /// Human readable description.
    pub fn describe(&self) -> &'static str {
        match self {
            InfluenceBand::VeryStrong => "very strong influence",
            InfluenceBand::Moderate => "moderate to strong",
            InfluenceBand::Lower => "lower influence",
        }
    }
}

/// One ranked factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Influence {
    /// Factor label.
    pub factor: String,
    /// Heuristic score.
    pub score: f64,
    /// Band derived from `score`.
    pub band: InfluenceBand,
}

/// Ranks the factors relevant to `module`, strongest first.
///
/// Equal scores keep their insertion order.
pub fn influence_scores(module: ModuleTag, params: &SimulationParameters) -> Vec<Influence> {
    let mut raw: Vec<(&str, f64)> = vec![
        ("Drug Pressure", params.drug_pressure),
        ("Adherence", params.adherence),
    ];
    if module == ModuleTag::HostProtein {
        raw.push(("Host Protein Activity", params.host_activity));
    }
    if params.gene_editing {
        raw.push(("Gene Editing Effect", params.gene_effect));
    }
    if module == ModuleTag::Resistance {
        raw.push(("Mutation Rate", params.mutation_rate));
    }
    if params.diabetes {
        raw.push(("Diabetes Comorbidity", DIABETES_INFLUENCE));
    }
    if params.hypertension {
        raw.push(("Hypertension Comorbidity", HYPERTENSION_INFLUENCE));
    }

    let mut ranked: Vec<Influence> = raw
        .into_iter()
        .map(|(factor, score)| Influence {
            factor: factor.to_string(),
            score,
            band: InfluenceBand::classify(score),
        })
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}

/// The `n` strongest influences.
pub fn top_influences(ranked: &[Influence], n: usize) -> &[Influence] {
    &ranked[..n.min(ranked.len())]
}
