use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use hiv_core::{ModuleTag, SimulationParameters};
use hiv_store::ScenarioStore;

use crate::config::AppConfig;

/// Parameter overrides shared by every command that runs a model.
#[derive(Args, Debug, Default, Clone)]
pub struct ParamArgs {
    /// JSON file with simulation parameters; the flags below override it.
    #[arg(long = "params", value_name = "PATH")]
    pub params_file: Option<PathBuf>,
    /// Drug to include; repeat for combination therapy.
    #[arg(long = "drug", value_name = "NAME")]
    pub drugs: Vec<String>,
    /// Combined antiretroviral strength in [0, 1].
    #[arg(long)]
    pub drug_pressure: Option<f64>,
    /// Fraction of doses taken in [0, 1].
    #[arg(long)]
    pub adherence: Option<f64>,
    /// Host immune/activity level in [0, 1].
    #[arg(long)]
    pub host_activity: Option<f64>,
    /// Enable the gene-editing intervention (`--gene-editing=false` overrides `--params`).
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub gene_editing: Option<bool>,
    /// Gene-editing effectiveness in [0, 1].
    #[arg(long)]
    pub gene_effect: Option<f64>,
    /// Diabetes comorbidity (`--diabetes=false` overrides `--params`).
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub diabetes: Option<bool>,
    /// Hypertension comorbidity (`--hypertension=false` overrides `--params`).
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub hypertension: Option<bool>,
    /// Obesity comorbidity (`--obesity=false` overrides `--params`).
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub obesity: Option<bool>,
    /// Horizon in days (1 to 300).
    #[arg(long)]
    pub duration: Option<u32>,
    /// Per-day mutation rate (resistance only).
    #[arg(long)]
    pub mutation_rate: Option<f64>,
}

impl ParamArgs {
    /// Module defaults or the `--params` file, then flag overrides, validated.
    pub fn resolve(&self, module: ModuleTag) -> Result<SimulationParameters, Box<dyn Error>> {
        let mut params = match &self.params_file {
            Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
            None => module_defaults(module),
        };
        if !self.drugs.is_empty() {
            params.selected_drugs = self.drugs.clone();
        }
        if let Some(value) = self.drug_pressure {
            params.drug_pressure = value;
        }
        if let Some(value) = self.adherence {
            params.adherence = value;
        }
        if let Some(value) = self.host_activity {
            params.host_activity = value;
        }
        if let Some(value) = self.gene_effect {
            params.gene_effect = value;
        }
        if let Some(value) = self.duration {
            params.duration = value;
        }
        if let Some(value) = self.mutation_rate {
            params.mutation_rate = value;
        }
        let switches = [
            (self.gene_editing, &mut params.gene_editing),
            (self.diabetes, &mut params.diabetes),
            (self.hypertension, &mut params.hypertension),
            (self.obesity, &mut params.obesity),
        ];
        for (flag, field) in switches {
            if let Some(value) = flag {
                *field = value;
            }
        }
        Ok(params.validated()?)
    }
}

/// Default parameters of a module's dashboard.
pub fn module_defaults(module: ModuleTag) -> SimulationParameters {
    match module {
        ModuleTag::HostProtein => SimulationParameters::default(),
        ModuleTag::Resistance => SimulationParameters::resistance_defaults(),
    }
}

/// Resolved configuration handed to every command.
#[derive(Debug, Clone)]
pub struct Context {
    /// Effective configuration.
    pub config: AppConfig,
}

impl Context {
    /// Filesystem store below the configured root.
    pub fn store(&self) -> ScenarioStore {
        ScenarioStore::open(self.config.store_root.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_module_defaults() {
        let args = ParamArgs {
            drugs: vec!["Lamivudine".into(), "Dolutegravir".into()],
            adherence: Some(1.4),
            diabetes: Some(true),
            ..ParamArgs::default()
        };
        let params = args.resolve(ModuleTag::Resistance).expect("params");
        assert_eq!(params.duration, 100);
        assert_eq!(params.adherence, 1.0);
        assert!(params.diabetes);
        assert_eq!(params.selected_drugs, vec!["Lamivudine", "Dolutegravir"]);
    }

    #[test]
    fn params_file_is_the_base() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("p.json");
        fs::write(&path, r#"{"duration": 30, "obesity": true}"#).expect("write");
        let args = ParamArgs {
            params_file: Some(path),
            duration: Some(45),
            ..ParamArgs::default()
        };
        let params = args.resolve(ModuleTag::HostProtein).expect("params");
        assert_eq!(params.duration, 45);
        assert!(params.obesity);
    }

    #[test]
    fn false_flag_clears_a_file_value() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("p.json");
        fs::write(&path, r#"{"obesity": true, "diabetes": true}"#).expect("write");
        let args = ParamArgs {
            params_file: Some(path),
            obesity: Some(false),
            ..ParamArgs::default()
        };
        let params = args.resolve(ModuleTag::HostProtein).expect("params");
        assert!(!params.obesity);
        assert!(params.diabetes);
    }

    #[derive(clap::Parser, Debug)]
    struct Harness {
        #[command(flatten)]
        params: ParamArgs,
    }

    #[test]
    fn switches_parse_bare_and_explicit_forms() {
        use clap::Parser;
        let parsed = Harness::try_parse_from(["hiv-sim", "--diabetes", "--obesity=false"])
            .expect("parse");
        assert_eq!(parsed.params.diabetes, Some(true));
        assert_eq!(parsed.params.obesity, Some(false));
        assert_eq!(parsed.params.hypertension, None);
        assert_eq!(parsed.params.gene_editing, None);
    }

    #[test]
    fn unknown_drug_is_rejected() {
        let args = ParamArgs {
            drugs: vec!["Aspirin".into()],
            ..ParamArgs::default()
        };
        assert!(args.resolve(ModuleTag::HostProtein).is_err());
    }
}
