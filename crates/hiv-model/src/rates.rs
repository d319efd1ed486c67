use hiv_core::SimulationParameters;
use serde::{Deserialize, Serialize};

use crate::config::ModelConstants;

/// Largest fractional infectivity reduction achievable by drugs.
pub const DRUG_REDUCTION: f64 = 0.8;

/// Largest fractional infectivity reduction achievable by gene editing.
pub const GENE_REDUCTION: f64 = 0.7;

/// Rate constants derived from user-facing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rates {
    /// Effective infectivity after drug and gene-editing reductions.
    pub beta_eff: f64,
    /// Virion production per infected cell per day after comorbidity boosts.
    pub production_rate: f64,
    /// `drug_pressure * adherence`.
    pub drug_efficacy: f64,
    /// Gene suppression applied (zero when editing is off).
    pub gene_suppression: f64,
    /// Product of the active comorbidity multipliers.
    pub comorbidity_boost: f64,
}

/// Maps simulation parameters onto model rate constants.
///
/// The mapping is pure and deterministic. Unit-interval inputs are clamped
/// again here so that `beta_eff` stays strictly positive even when a caller
/// skipped [`SimulationParameters::validated`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateMapper {
    beta_base: f64,
    base_production_rate: f64,
}

impl Default for RateMapper {
    fn default() -> Self {
        Self::new(&ModelConstants::default())
    }
}

impl RateMapper {
    /// Creates a mapper from the model constants.
    pub fn new(constants: &ModelConstants) -> Self {
        Self {
            beta_base: constants.beta_base,
            base_production_rate: constants.base_production_rate,
        }
    }

    /// Baseline infectivity.
    pub fn beta_base(&self) -> f64 {
        self.beta_base
    }

    /// Converts parameters into rates.
    pub fn map_to_rates(&self, params: &SimulationParameters) -> Rates {
        let drug_efficacy = params.drug_efficacy().clamp(0.0, 1.0);
        let gene_suppression = params.gene_suppression().clamp(0.0, 1.0);
        let comorbidity_boost = params.comorbidities().boost();
        Rates {
            beta_eff: self.effective_infectivity(drug_efficacy, gene_suppression),
            production_rate: self.base_production_rate * comorbidity_boost,
            drug_efficacy,
            gene_suppression,
            comorbidity_boost,
        }
    }

    /// `beta_base * (1 - 0.8 * drug_eff) * (1 - 0.7 * gene_sup)`.
    pub fn effective_infectivity(&self, drug_efficacy: f64, gene_suppression: f64) -> f64 {
        self.beta_base
            * (1.0 - DRUG_REDUCTION * drug_efficacy)
            * (1.0 - GENE_REDUCTION * gene_suppression)
    }
}

/// Maps parameters with the default literature constants.
pub fn map_to_rates(params: &SimulationParameters) -> Rates {
    RateMapper::default().map_to_rates(params)
}
