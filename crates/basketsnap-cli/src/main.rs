//! basketsnap CLI
//!
//! Command-line interface for balance-snapshot verification runs

use basketsnap_core::logging_facility::{init, Profile};
use clap::{Parser, Subcommand, ValueEnum};

mod commands;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    /// Human-readable logs
    Pretty,
    /// JSON structured logs
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "basketsnap")]
#[command(about = "Balance-snapshot verification for basket mint and burn", long_about = None)]
struct Cli {
    /// Log output format (logs go to stderr; RUST_LOG overrides the level)
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run every operation of a scenario bracketed by snapshots
    Run(commands::run::RunArgs),
    /// Capture the genesis balances of a scenario
    Snapshot(commands::snapshot::SnapshotArgs),
    /// Diff two saved snapshots
    Diff(commands::diff::DiffArgs),
}

fn main() {
    let cli = Cli::parse();

    init(match cli.log_format {
        LogFormat::Pretty => Profile::Development,
        LogFormat::Json => Profile::Production,
    });

    let result = match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Snapshot(args) => commands::snapshot::execute(args),
        Commands::Diff(args) => commands::diff::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
