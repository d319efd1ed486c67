use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use hiv_core::ModuleTag;
use hiv_model::{influence_scores, simulate_host, top_influences, PatientSummary, RunSeries};
use hiv_store::RunHistory;
use serde_json::json;

use crate::args::{Context, ParamArgs};
use crate::{print_json, write_record};

#[derive(Args, Debug)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub params: ParamArgs,
    /// Number of output samples; defaults to `sample_count` from the config.
    #[arg(long)]
    pub samples: Option<usize>,
    /// Write the run here (`.csv` for long-format series, JSON otherwise).
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub fn run(
    args: &SimulateArgs,
    ctx: &Context,
    history: &mut RunHistory,
) -> Result<(), Box<dyn Error>> {
    let params = args.params.resolve(ModuleTag::HostProtein)?;
    let samples = args.samples.unwrap_or(ctx.config.sample_count);
    let trajectory = simulate_host(&params, &ctx.config.model, &ctx.config.solver, samples)?;

    let peak = trajectory.peak_virus().map(|sample| (sample.t, sample.state.virus));
    let last = trajectory.final_state();
    let ranked = influence_scores(ModuleTag::HostProtein, &params);
    let summary = PatientSummary::from_params(&params);

    let record = history.record_run(
        ModuleTag::HostProtein,
        params,
        Some(RunSeries::Dynamics(trajectory)),
    );
    if let Some(path) = &args.out {
        write_record(path, record)?;
    }

    print_json(&json!({
        "run": record.display_name,
        "created_at": record.created_at,
        "peak": peak.map(|(day, virus)| json!({"day": day, "virus": virus})),
        "final": last,
        "top_influences": top_influences(&ranked, 3),
        "summary": summary,
    }))
}
