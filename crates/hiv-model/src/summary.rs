use std::fmt;

use hiv_core::SimulationParameters;
use serde::{Deserialize, Serialize};

/// Plain-language digest of a virtual patient's settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientSummary {
    /// Selected drugs.
    pub drugs: Vec<String>,
    /// `drug_pressure * adherence`.
    pub effective_drug_efficacy: f64,
    /// Host immune/activity level.
    pub host_activity: f64,
    /// Gene-editing effect, present only when editing is on.
    pub gene_effect: Option<f64>,
    /// Active comorbidities.
    pub comorbidities: Vec<String>,
}

impl PatientSummary {
    /// Builds the summary from run parameters.
    pub fn from_params(params: &SimulationParameters) -> Self {
        Self {
            drugs: params.selected_drugs.clone(),
            effective_drug_efficacy: params.drug_efficacy(),
            host_activity: params.host_activity,
            gene_effect: params.gene_editing.then_some(params.gene_effect),
            comorbidities: params
                .comorbidities()
                .active()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

impl fmt::Display for PatientSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Drugs: {}", self.drugs.join(", "))?;
        writeln!(
            f,
            "Effective Drug + Adherence: {:.2}",
            self.effective_drug_efficacy
        )?;
        writeln!(f, "Host Activity: {:.2}", self.host_activity)?;
        if let Some(effect) = self.gene_effect {
            writeln!(f, "Gene Editing Effect: {effect:.2}")?;
        }
        if self.comorbidities.is_empty() {
            write!(f, "Comorbidities: None")
        } else {
            write!(f, "Comorbidities: {}", self.comorbidities.join(", "))
        }
    }
}
