use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use hiv_compare::{export_params, write_bytes, ExportFormat};
use hiv_core::{ModuleTag, SimulationParameters};
use tracing::info;

use crate::args::Context;

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Module namespace: `host` or `resistance`.
    #[arg(long)]
    pub module: ModuleTag,
    /// Scenario names to export, in row order.
    #[arg(required = true, num_args = 1..)]
    pub names: Vec<String>,
    /// Output encoding: `csv` or `json`.
    #[arg(long, default_value = "csv")]
    pub format: ExportFormat,
    /// Destination file.
    #[arg(long)]
    pub out: PathBuf,
}

pub fn run(args: &ExportArgs, ctx: &Context) -> Result<(), Box<dyn Error>> {
    let store = ctx.store();
    let params: Vec<SimulationParameters> = store
        .load_all(args.module, &args.names)?
        .into_iter()
        .map(|(_, params)| params)
        .collect();
    let bytes = export_params(&params, args.format)?;
    write_bytes(&args.out, &bytes)?;
    info!(
        path = %args.out.display(),
        format = %args.format,
        rows = params.len(),
        "scenarios exported"
    );
    Ok(())
}
