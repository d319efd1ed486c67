use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use hiv_compare::{export_series_csv, write_bytes, ComparedScenario};
use hiv_store::{to_canonical_json_bytes, RunHistory, ScenarioRecord};

use crate::args::Context;
use crate::commands::{
    compare::{self, CompareArgs},
    explain::{self, ExplainArgs},
    export::{self, ExportArgs},
    resistance::{self, ResistanceArgs},
    scenario::{self, ScenarioCommand},
    simulate::{self, SimulateArgs},
};
use crate::config::AppConfig;

mod args;
mod commands;
mod config;
mod logging;

#[derive(Parser, Debug)]
#[command(name = "hiv-sim", about = "Virtual HIV resistance and host-dynamics simulator")]
struct Cli {
    /// YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Scenario store root; overrides `store_root` from the config.
    #[arg(long, global = true)]
    store: Option<PathBuf>,
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Integrate the host dynamics model for one virtual patient.
    Simulate(SimulateArgs),
    /// Draw resistance curves for the selected drugs.
    Resistance(ResistanceArgs),
    /// Save, list or show named scenarios.
    #[command(subcommand)]
    Scenario(ScenarioCommand),
    /// Re-run saved scenarios side by side.
    Compare(CompareArgs),
    /// Export the parameters of saved scenarios as CSV or JSON.
    Export(ExportArgs),
    /// Rank the factors driving a scenario.
    Explain(ExplainArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(root) = &cli.store {
        config.store_root = root.clone();
    }
    let level = logging::resolve_level(cli.verbose, &config.logging)?;
    logging::init(level, cli.log_json || config.logging.json)?;

    let ctx = Context { config };
    let mut history = RunHistory::new();
    match cli.command {
        Command::Simulate(args) => simulate::run(&args, &ctx, &mut history),
        Command::Resistance(args) => resistance::run(&args, &ctx, &mut history),
        Command::Scenario(command) => scenario::run(&command, &ctx),
        Command::Compare(args) => compare::run(&args, &ctx),
        Command::Export(args) => export::run(&args, &ctx),
        Command::Explain(args) => explain::run(&args),
    }
}

/// Writes a recorded run: long-format CSV for `.csv` paths, JSON otherwise.
pub(crate) fn write_record(path: &Path, record: &ScenarioRecord) -> Result<(), Box<dyn Error>> {
    let is_csv = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    let bytes = match (&record.trajectory, is_csv) {
        (Some(series), true) => export_series_csv(&[ComparedScenario {
            name: record.display_name.clone(),
            params: record.params.clone(),
            series: series.clone(),
        }])?,
        _ => to_canonical_json_bytes(record)?,
    };
    write_bytes(path, &bytes)?;
    Ok(())
}

/// Prints `value` as pretty JSON on stdout.
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "hiv-sim",
            "compare",
            "--module",
            "resistance",
            "a.json",
            "b.json",
            "--legacy-horizon",
            "-vv",
            "--store",
            "/tmp/s",
        ])
        .expect("parse");
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.store, Some(PathBuf::from("/tmp/s")));
        match cli.command {
            Command::Compare(args) => {
                assert_eq!(args.names, vec!["a.json", "b.json"]);
                assert_eq!(args.legacy_horizon, Some(100));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn scenario_save_requires_name() {
        assert!(Cli::try_parse_from(["hiv-sim", "scenario", "save", "--module", "host"]).is_err());
    }
}
