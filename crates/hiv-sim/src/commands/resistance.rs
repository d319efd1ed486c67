use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use hiv_core::{ModuleTag, RngHandle};
use hiv_model::{compute_panel, influence_scores, top_influences, RunSeries};
use hiv_store::RunHistory;
use serde_json::json;
use tracing::info;

use crate::args::{Context, ParamArgs};
use crate::{print_json, write_record};

#[derive(Args, Debug)]
pub struct ResistanceArgs {
    #[command(flatten)]
    pub params: ParamArgs,
    /// Seed for the perturbation draws; defaults to the config seed.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Write the run here (`.csv` for long-format series, JSON otherwise).
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub fn run(
    args: &ResistanceArgs,
    ctx: &Context,
    history: &mut RunHistory,
) -> Result<(), Box<dyn Error>> {
    let params = args.params.resolve(ModuleTag::Resistance)?;
    let seed = ctx.config.resolve_seed(args.seed);
    let mut rng = RngHandle::from_seed(seed);
    let panel = compute_panel(&params, &mut rng)?;
    info!(seed, drugs = panel.curves.len(), "resistance panel computed");

    let finals: Vec<_> = panel
        .curves
        .iter()
        .map(|curve| {
            json!({
                "drug": curve.drug,
                "growth_rate": curve.growth_rate(),
                "final_index": curve.final_index(),
            })
        })
        .collect();
    let ranked = influence_scores(ModuleTag::Resistance, &params);

    let record = history.record_run(
        ModuleTag::Resistance,
        params,
        Some(RunSeries::Resistance(panel)),
    );
    if let Some(path) = &args.out {
        write_record(path, record)?;
    }

    print_json(&json!({
        "run": record.display_name,
        "seed": seed,
        "curves": finals,
        "top_influences": top_influences(&ranked, 3),
    }))
}
