//! Genesis snapshot command

use std::fs;
use std::path::PathBuf;

use basketsnap_core::render::render_snapshot;
use basketsnap_ledger::parse_scenario_file;
use basketsnap_ledger::scenario::scenario_harness;
use clap::Args;

#[derive(Debug, Args)]
pub struct SnapshotArgs {
    /// Scenario file (YAML, schema_version 0)
    pub scenario: PathBuf,

    /// Snapshot label, also used as the table column header
    #[arg(long, default_value = "genesis")]
    pub label: String,

    /// Write the snapshot as JSON to this file instead of printing a table
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub fn execute(args: SnapshotArgs) -> Result<(), Box<dyn std::error::Error>> {
    let scenario = parse_scenario_file(&args.scenario)?;
    let ledger = scenario.build_ledger()?;
    let harness = scenario_harness(&scenario, &ledger)?;

    let snapshot = harness.capture_snapshot(&args.label)?;

    match args.output {
        Some(path) => {
            fs::write(&path, snapshot.to_json()?)?;
            println!("Snapshot '{}' ({} records) written to {}", args.label, snapshot.len(), path.display());
        }
        None => print!("{}", render_snapshot(&snapshot, &args.label)),
    }
    Ok(())
}
