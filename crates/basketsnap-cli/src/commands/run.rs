//! Scenario run command

use std::fs;
use std::path::{Path, PathBuf};

use basketsnap_core::render::{render_diff, render_json};
use basketsnap_core::BalanceSnapshot;
use basketsnap_ledger::{parse_scenario_file, run_scenario, OperationOutcome, OperationReport};
use clap::Args;

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Scenario file (YAML, schema_version 0)
    pub scenario: PathBuf,

    /// Print the full report as JSON instead of tables
    #[arg(long)]
    pub json: bool,

    /// Write each operation's before/after snapshots as JSON into this directory
    #[arg(long)]
    pub save_dir: Option<PathBuf>,
}

pub fn execute(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let scenario = parse_scenario_file(&args.scenario)?;
    let report = run_scenario(&scenario)?;

    if let Some(dir) = &args.save_dir {
        fs::create_dir_all(dir)?;
        for (index, op) in report.operations.iter().enumerate() {
            save_snapshots(dir, index, op)?;
        }
    }

    if args.json {
        println!("{}", render_json(&report)?);
    } else {
        println!("Scenario: {} (run {})\n", report.name, report.run_id);
        for op in &report.operations {
            print_operation(op);
        }
        println!(
            "{}/{} operations passed",
            report.operations.len() - report.failed_count(),
            report.operations.len()
        );
    }

    if !report.passed() {
        return Err(format!("{} operation(s) failed", report.failed_count()).into());
    }
    Ok(())
}

fn print_operation(op: &OperationReport) {
    let status = if op.passed() { "PASS" } else { "FAIL" };
    println!("[{}] {}: {} by {}", status, op.name, op.call, op.caller);

    match &op.outcome {
        OperationOutcome::Completed {
            diff,
            expectation_failures,
            conservation_violations,
            ..
        } => {
            println!("{}", render_diff(diff, &op.name));
            if let Some(expected) = &op.expect_revert {
                println!("  expected revert \"{}\" but the call succeeded", expected);
            }
            for failure in expectation_failures {
                println!("  expectation failed: {}", failure);
            }
            for violation in conservation_violations {
                println!("  conservation violated: {}", violation);
            }
        }
        OperationOutcome::Reverted { reason, .. } => match &op.expect_revert {
            Some(expected) if expected == reason => println!("  reverted as expected: {}\n", reason),
            Some(expected) => println!("  reverted with \"{}\", expected \"{}\"\n", reason, expected),
            None => println!("  unexpected revert: {}\n", reason),
        },
    }
}

/// `03-mint-100-dai` style file stem
fn file_stem(index: usize, name: &str) -> String {
    let slug: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    let slug = slug
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    format!("{:02}-{}", index, slug)
}

fn write_snapshot(path: &Path, snapshot: &BalanceSnapshot) -> Result<(), Box<dyn std::error::Error>> {
    fs::write(path, snapshot.to_json()?)?;
    Ok(())
}

fn save_snapshots(dir: &Path, index: usize, op: &OperationReport) -> Result<(), Box<dyn std::error::Error>> {
    let stem = file_stem(index, &op.name);
    match &op.outcome {
        OperationOutcome::Completed { before, after, .. } => {
            write_snapshot(&dir.join(format!("{}-before.json", stem)), before)?;
            write_snapshot(&dir.join(format!("{}-after.json", stem)), after)?;
        }
        OperationOutcome::Reverted {
            before: Some(before),
            ..
        } => write_snapshot(&dir.join(format!("{}-before.json", stem)), before)?,
        OperationOutcome::Reverted { before: None, .. } => {}
    }
    tracing::debug!(dir = %dir.display(), stem = %stem, "snapshots saved");
    Ok(())
}
