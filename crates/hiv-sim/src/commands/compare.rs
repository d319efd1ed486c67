use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use hiv_compare::{export_series_csv, write_bytes, HorizonPolicy, ScenarioComparator};
use hiv_core::ModuleTag;
use hiv_model::RunSeries;
use serde_json::{json, Value};

use crate::args::Context;
use crate::print_json;

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Module namespace: `host` or `resistance`.
    #[arg(long)]
    pub module: ModuleTag,
    /// Scenario names to compare, in display order.
    #[arg(required = true, num_args = 1..)]
    pub names: Vec<String>,
    /// Master seed for the resistance draws.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Run dynamics over a fixed horizon instead of each stored duration.
    #[arg(long, value_name = "DAYS", num_args = 0..=1, default_missing_value = "100")]
    pub legacy_horizon: Option<u32>,
    /// Samples per dynamics run; defaults to the config value.
    #[arg(long)]
    pub samples: Option<usize>,
    /// Write every compared series as long-format CSV.
    #[arg(long)]
    pub series_out: Option<PathBuf>,
}

fn headline(series: &RunSeries) -> Value {
    match series {
        RunSeries::Dynamics(trajectory) => json!({
            "peak": trajectory
                .peak_virus()
                .map(|sample| json!({"day": sample.t, "virus": sample.state.virus})),
            "final": trajectory.final_state(),
        }),
        RunSeries::Resistance(panel) => Value::Object(
            panel
                .curves
                .iter()
                .map(|curve| (curve.drug.clone(), json!(curve.final_index())))
                .collect(),
        ),
    }
}

pub fn run(args: &CompareArgs, ctx: &Context) -> Result<(), Box<dyn Error>> {
    let store = ctx.store();
    let horizon = match args.legacy_horizon {
        Some(fixed_days) => HorizonPolicy::Legacy { fixed_days },
        None => ctx.config.compare.horizon,
    };
    let seed = ctx.config.resolve_seed(args.seed);
    let compared = ScenarioComparator::new(&store)
        .with_model(ctx.config.model.clone(), ctx.config.solver.clone())
        .with_sample_count(args.samples.unwrap_or(ctx.config.sample_count))
        .with_horizon(horizon)
        .compare(args.module, &args.names, seed)?;

    if let Some(path) = &args.series_out {
        write_bytes(path, &export_series_csv(&compared)?)?;
    }

    let rows: Vec<_> = compared
        .iter()
        .map(|entry| {
            json!({
                "name": entry.name,
                "horizon": entry.series.horizon(),
                "last_time": entry.series.last_time(),
                "headline": headline(&entry.series),
            })
        })
        .collect();
    print_json(&json!({
        "module": args.module.label(),
        "seed": seed,
        "horizon": horizon,
        "scenarios": rows,
    }))
}
