//! User-facing simulation parameters and their validation rules.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, HivError};

/// Antiretroviral drugs that may be selected for a run.
pub const DRUG_CATALOG: [&str; 4] = ["Tenofovir", "Lamivudine", "Dolutegravir", "Efavirenz"];

/// Longest simulation horizon accepted, in days.
pub const MAX_DURATION_DAYS: u32 = 300;

/// Lower bound of the per-day mutation rate.
pub const MIN_MUTATION_RATE: f64 = 0.001;

/// Upper bound of the per-day mutation rate.
pub const MAX_MUTATION_RATE: f64 = 0.05;

/// Returns `true` when `drug` names an entry of [`DRUG_CATALOG`].
pub fn is_catalog_drug(drug: &str) -> bool {
    DRUG_CATALOG.contains(&drug)
}

/// Parameters of one simulation run.
///
/// This is also the on-disk scenario format: the JSON keys are the field
/// names, every key is optional and unknown keys are rejected. Values read from
/// any external source must go through [`SimulationParameters::validated`]
/// before they reach a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationParameters {
    /// Selected drugs in selection order.
    pub selected_drugs: Vec<String>,
    /// Combined antiretroviral suppressive strength in `[0, 1]`.
    pub drug_pressure: f64,
    /// Fraction of prescribed doses actually taken, in `[0, 1]`.
    pub adherence: f64,
    /// Host immune/activity level in `[0, 1]`.
    pub host_activity: f64,
    /// Whether a gene-editing intervention (e.g. CCR5 knockout) is active.
    pub gene_editing: bool,
    /// Gene-editing effectiveness in `[0, 1]`; ignored unless `gene_editing`.
    pub gene_effect: f64,
    /// Diabetes comorbidity.
    pub diabetes: bool,
    /// Hypertension comorbidity.
    pub hypertension: bool,
    /// Obesity comorbidity.
    pub obesity: bool,
    /// Simulation horizon in days.
    pub duration: u32,
    /// Per-day mutation rate (resistance model only).
    pub mutation_rate: f64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            selected_drugs: vec!["Tenofovir".to_string()],
            drug_pressure: 0.6,
            adherence: 0.8,
            host_activity: 0.5,
            gene_editing: false,
            gene_effect: 0.5,
            diabetes: false,
            hypertension: false,
            obesity: false,
            duration: 120,
            mutation_rate: 0.01,
        }
    }
}

impl SimulationParameters {
    /// Defaults used by the resistance module (shorter horizon).
    pub fn resistance_defaults() -> Self {
        Self {
            duration: 100,
            ..Self::default()
        }
    }

    /// Clamps the unit-interval fields and checks every other rule.
    ///
    /// `drug_pressure`, `adherence`, `host_activity` and `gene_effect` are
    /// clamped to `[0, 1]`. Non-finite values, an empty or out-of-bounds
    /// duration, a mutation rate outside `[0.001, 0.05]`, unknown drugs and
    /// duplicate drugs are rejected.
    pub fn validated(mut self) -> Result<Self, HivError> {
        self.drug_pressure = clamp_unit("drug_pressure", self.drug_pressure)?;
        self.adherence = clamp_unit("adherence", self.adherence)?;
        self.host_activity = clamp_unit("host_activity", self.host_activity)?;
        self.gene_effect = clamp_unit("gene_effect", self.gene_effect)?;

        if self.duration == 0 || self.duration > MAX_DURATION_DAYS {
            return Err(HivError::InvalidParameter(
                ErrorInfo::new("params.duration", "duration must be between 1 and 300 days")
                    .with_context("field", "duration")
                    .with_context("value", self.duration.to_string()),
            ));
        }

        if !self.mutation_rate.is_finite()
            || !(MIN_MUTATION_RATE..=MAX_MUTATION_RATE).contains(&self.mutation_rate)
        {
            return Err(HivError::InvalidParameter(
                ErrorInfo::new(
                    "params.mutation_rate",
                    "mutation rate must lie within [0.001, 0.05]",
                )
                .with_context("field", "mutation_rate")
                .with_context("value", self.mutation_rate.to_string()),
            ));
        }

        let mut seen = BTreeSet::new();
        for drug in &self.selected_drugs {
            if !is_catalog_drug(drug) {
                return Err(HivError::InvalidParameter(
                    ErrorInfo::new("params.selected_drugs", "drug is not in the catalog")
                        .with_context("drug", drug.clone())
                        .with_hint(DRUG_CATALOG.join(", ")),
                ));
            }
            if !seen.insert(drug.as_str()) {
                return Err(HivError::InvalidParameter(
                    ErrorInfo::new("params.selected_drugs", "drug selected more than once")
                        .with_context("drug", drug.clone()),
                ));
            }
        }

        Ok(self)
    }

    /// Effective drug efficacy, `drug_pressure * adherence`.
    pub fn drug_efficacy(&self) -> f64 {
        self.drug_pressure * self.adherence
    }

    /// Gene suppression actually applied: `gene_effect` when editing is on.
    pub fn gene_suppression(&self) -> f64 {
        if self.gene_editing {
            self.gene_effect
        } else {
            0.0
        }
    }

    /// Comorbidity flags as a standalone value.
    pub fn comorbidities(&self) -> Comorbidities {
        Comorbidities {
            diabetes: self.diabetes,
            hypertension: self.hypertension,
            obesity: self.obesity,
        }
    }
}

fn clamp_unit(field: &str, value: f64) -> Result<f64, HivError> {
    if !value.is_finite() {
        return Err(HivError::invalid_parameter(field, "value must be finite"));
    }
    Ok(value.clamp(0.0, 1.0))
}

/// Comorbidity flags that raise viral fitness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Comorbidities {
    /// Diabetes (x1.20 production).
    pub diabetes: bool,
    /// Hypertension (x1.15 production).
    pub hypertension: bool,
    /// Obesity (x1.10 production).
    pub obesity: bool,
}

impl Comorbidities {
    /// Production multiplier for diabetes.
    pub const DIABETES_BOOST: f64 = 1.20;
    /// Production multiplier for hypertension.
    pub const HYPERTENSION_BOOST: f64 = 1.15;
    /// Production multiplier for obesity.
    pub const OBESITY_BOOST: f64 = 1.10;

    /// Product of the multipliers of every active comorbidity.
    pub fn boost(&self) -> f64 {
        let mut boost = 1.0;
        if self.diabetes {
            boost *= Self::DIABETES_BOOST;
        }
        if self.hypertension {
            boost *= Self::HYPERTENSION_BOOST;
        }
        if self.obesity {
            boost *= Self::OBESITY_BOOST;
        }
        boost
    }

    /// Names of the active comorbidities, in a fixed order.
    pub fn active(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.diabetes {
            names.push("diabetes");
        }
        if self.hypertension {
            names.push("hypertension");
        }
        if self.obesity {
            names.push("obesity");
        }
        names
    }
}
