use std::error::Error;

use clap::Args;
use hiv_core::ModuleTag;
use hiv_model::{influence_scores, top_influences, PatientSummary};
use serde_json::json;

use crate::args::ParamArgs;
use crate::print_json;

#[derive(Args, Debug)]
pub struct ExplainArgs {
    /// Module whose factors are ranked: `host` or `resistance`.
    #[arg(long, default_value = "host")]
    pub module: ModuleTag,
    #[command(flatten)]
    pub params: ParamArgs,
    /// How many factors to report.
    #[arg(long, default_value_t = 3)]
    pub top: usize,
}

pub fn run(args: &ExplainArgs) -> Result<(), Box<dyn Error>> {
    let params = args.params.resolve(args.module)?;
    let ranked = influence_scores(args.module, &params);
    let top: Vec<_> = top_influences(&ranked, args.top)
        .iter()
        .map(|influence| {
            json!({
                "factor": influence.factor,
                "score": influence.score,
                "band": influence.band,
                "reading": format!("{} ({})", influence.factor, influence.band.describe()),
            })
        })
        .collect();
    let summary = PatientSummary::from_params(&params);
    print_json(&json!({
        "module": args.module.label(),
        "top_influences": top,
        "summary": summary,
    }))
}
