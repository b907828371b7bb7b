//! Reporter
//!
//! Pure formatting of snapshots and diffs. Nothing here queries a ledger or
//! reorders records.
//!
//! - `table`: grid tables for terminals and test logs
//! - `json`: machine-readable form via `serde_json`
//! - `summary`: Markdown list of the metrics that moved

pub mod json;
pub mod summary;
pub mod table;

pub use json::render_json;
pub use summary::render_change_summary;
pub use table::{render_diff, render_report, render_snapshot};
