use std::error::Error;

use clap::Subcommand;
use hiv_core::ModuleTag;
use hiv_model::PatientSummary;
use serde_json::json;

use crate::args::{Context, ParamArgs};
use crate::print_json;

#[derive(Subcommand, Debug)]
pub enum ScenarioCommand {
    /// Save a parameter set under a `.json` name.
    Save {
        /// Module namespace: `host` or `resistance`.
        #[arg(long)]
        module: ModuleTag,
        /// Scenario name, e.g. `baseline.json`.
        #[arg(long)]
        name: String,
        #[command(flatten)]
        params: ParamArgs,
    },
    /// List saved scenario names.
    List {
        /// Module namespace: `host` or `resistance`.
        #[arg(long)]
        module: ModuleTag,
    },
    /// Print a saved scenario.
    Show {
        /// Module namespace: `host` or `resistance`.
        #[arg(long)]
        module: ModuleTag,
        /// Scenario name.
        #[arg(long)]
        name: String,
    },
}

pub fn run(command: &ScenarioCommand, ctx: &Context) -> Result<(), Box<dyn Error>> {
    let store = ctx.store();
    match command {
        ScenarioCommand::Save {
            module,
            name,
            params,
        } => {
            let params = params.resolve(*module)?;
            let receipt = store.save(*module, name, &params)?;
            print_json(&receipt)
        }
        ScenarioCommand::List { module } => {
            for name in store.list(*module)? {
                println!("{name}");
            }
            Ok(())
        }
        ScenarioCommand::Show { module, name } => {
            let params = store.load(*module, name)?;
            let summary = PatientSummary::from_params(&params).to_string();
            print_json(&json!({
                "module": module.label(),
                "name": name,
                "params": params,
                "summary": summary.lines().collect::<Vec<_>>(),
            }))
        }
    }
}
