//! Saved snapshot diff command

use std::fs;
use std::path::{Path, PathBuf};

use basketsnap_core::render::{render_change_summary, render_diff, render_json};
use basketsnap_core::{compute_diff, BalanceSnapshot};
use clap::Args;

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Earlier snapshot (JSON written by `snapshot --output` or `run --save-dir`)
    pub before: PathBuf,

    /// Later snapshot
    pub after: PathBuf,

    /// Print the structured diff as JSON
    #[arg(long, conflicts_with = "summary")]
    pub json: bool,

    /// Print a Markdown summary of changed metrics only
    #[arg(long)]
    pub summary: bool,
}

fn load(path: &Path) -> Result<BalanceSnapshot, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read snapshot {}: {}", path.display(), e))?;
    Ok(BalanceSnapshot::from_json(&content)?)
}

pub fn execute(args: DiffArgs) -> Result<(), Box<dyn std::error::Error>> {
    let before = load(&args.before)?;
    let after = load(&args.after)?;
    let diff = compute_diff(&before, &after)?;

    if args.json {
        println!("{}", render_json(&diff)?);
    } else if args.summary {
        print!("{}", render_change_summary(&diff));
    } else {
        let title = format!("{} -> {}", diff.before_label, diff.after_label);
        print!("{}", render_diff(&diff, &title));
    }
    Ok(())
}
