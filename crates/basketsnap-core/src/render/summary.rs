//! Markdown summary of the metrics that moved between two snapshots.

use crate::diff::SnapshotDiff;
use crate::model::Delta;

/// Render a Markdown summary listing only changed metrics
///
/// Informational only; the structured diff remains the source of truth.
pub fn render_change_summary(diff: &SnapshotDiff) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "## Balance Diff: {} -> {}\n\n",
        diff.before_label, diff.after_label
    ));

    if diff.is_noop() {
        out.push_str("_No balance changes detected._\n");
        return out;
    }

    let mut moved = Vec::new();
    let mut not_comparable = Vec::new();
    for entry in diff.changes() {
        match &entry.delta {
            Delta::Numeric(delta) => moved.push(format!("- `{}`: {}\n", entry.metric(), delta)),
            Delta::NotComparable => not_comparable.push(format!(
                "- `{}`: {} -> {}\n",
                entry.metric(),
                entry.before,
                entry.after
            )),
        }
    }

    if !moved.is_empty() {
        out.push_str(&format!("### Changed ({})\n\n", moved.len()));
        out.extend(moved);
        out.push('\n');
    }

    if !not_comparable.is_empty() {
        out.push_str(&format!("### Not comparable ({})\n\n", not_comparable.len()));
        out.extend(not_comparable);
        out.push('\n');
    }

    out.push_str(&format!(
        "_{} of {} metrics unchanged._\n",
        diff.len() - diff.changes().count(),
        diff.len()
    ));
    out
}
