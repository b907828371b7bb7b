//! Grid table rendering
//!
//! Layout follows the common "grid" plain-text style:
//!
//! ```text
//! +------------------------------+-----------+
//! | metric                       |    before |
//! +==============================+===========+
//! | randomUser balance of DAI    |       100 |
//! +------------------------------+-----------+
//! ```
//!
//! Columns where every cell is a number (or the `-` placeholder) are
//! right-aligned; everything else is left-aligned.

use crate::diff::SnapshotDiff;
use crate::snapshot::BalanceSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
}

fn is_numeric_cell(cell: &str) -> bool {
    if cell == "-" {
        return true;
    }
    let digits = cell.strip_prefix(['+', '-']).unwrap_or(cell);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

struct Grid {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Grid {
    fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
        widths
    }

    fn alignments(&self) -> Vec<Align> {
        (0..self.headers.len())
            .map(|i| {
                let numeric = !self.rows.is_empty()
                    && self.rows.iter().all(|row| is_numeric_cell(&row[i]));
                if numeric {
                    Align::Right
                } else {
                    Align::Left
                }
            })
            .collect()
    }

    fn render(&self) -> String {
        let widths = self.widths();
        let aligns = self.alignments();

        let rule = |fill: char| {
            let mut line = String::from("+");
            for w in &widths {
                line.extend(std::iter::repeat(fill).take(w + 2));
                line.push('+');
            }
            line.push('\n');
            line
        };

        let line = |cells: &[String]| {
            let mut out = String::from("|");
            for ((cell, w), align) in cells.iter().zip(&widths).zip(&aligns) {
                match align {
                    Align::Left => out.push_str(&format!(" {:<w$} |", cell, w = w)),
                    Align::Right => out.push_str(&format!(" {:>w$} |", cell, w = w)),
                }
            }
            out.push('\n');
            out
        };

        let mut out = rule('-');
        out.push_str(&line(&self.headers));
        out.push_str(&rule('='));
        for row in &self.rows {
            out.push_str(&line(row));
            out.push_str(&rule('-'));
        }
        out
    }
}

/// Two-column grid `[metric, <label>]`, one row per record in snapshot order
pub fn render_snapshot(snapshot: &BalanceSnapshot, label: &str) -> String {
    let mut grid = Grid::new(&["metric", label]);
    for record in snapshot {
        grid.push(vec![record.metric(), record.value.to_string()]);
    }
    grid.render()
}

/// Title line plus grid `[metric, before, after, delta]`
///
/// Numeric deltas carry an explicit sign; non-comparable metrics show `-`.
pub fn render_diff(diff: &SnapshotDiff, label: &str) -> String {
    let mut grid = Grid::new(&["metric", "before", "after", "delta"]);
    for entry in diff.entries() {
        grid.push(vec![
            entry.metric(),
            entry.before.to_string(),
            entry.after.to_string(),
            entry.delta.to_string(),
        ]);
    }
    format!("{}\n{}", label, grid.render())
}

/// Before table, after table and diff table, each only when available
pub fn render_report(
    before: Option<&BalanceSnapshot>,
    after: Option<&BalanceSnapshot>,
    diff: Option<&SnapshotDiff>,
) -> String {
    let mut sections = Vec::new();
    if let Some(before) = before {
        sections.push(render_snapshot(before, "before"));
    }
    if let Some(after) = after {
        sections.push(render_snapshot(after, "after"));
    }
    if let Some(diff) = diff {
        sections.push(render_diff(diff, &format!("{} -> {}", diff.before_label, diff.after_label)));
    }
    sections.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::compute_diff;
    use crate::model::MetricValue;
    use crate::snapshot::BalanceRecord;
    use alloy_primitives::U256;

    fn snap(label: &str, cells: Vec<BalanceRecord>) -> BalanceSnapshot {
        BalanceSnapshot::from_records(label, cells).unwrap()
    }

    #[test]
    fn test_render_snapshot_grid_layout() {
        let snapshot = snap(
            "before",
            vec![
                BalanceRecord::new("quad", "DAI", U256::from(0u64)),
                BalanceRecord::new("randomUser", "DAI", U256::from(1500u64)),
            ],
        );

        let expected = "\
+---------------------------+--------+
| metric                    | before |
+===========================+========+
| quad balance of DAI       |      0 |
+---------------------------+--------+
| randomUser balance of DAI |   1500 |
+---------------------------+--------+
";
        assert_eq!(render_snapshot(&snapshot, "before"), expected);
    }

    #[test]
    fn test_render_diff_signs_and_placeholder() {
        let before = snap(
            "before",
            vec![
                BalanceRecord::new("u", "A", U256::from(10u64)),
                BalanceRecord::new("u", "B", U256::from(5u64)),
                BalanceRecord::new("u", "C", MetricValue::Opaque("on".into())),
            ],
        );
        let after = snap(
            "after",
            vec![
                BalanceRecord::new("u", "A", U256::from(4u64)),
                BalanceRecord::new("u", "B", U256::from(5u64)),
                BalanceRecord::new("u", "C", MetricValue::Opaque("off".into())),
            ],
        );
        let diff = compute_diff(&before, &after).unwrap();
        let rendered = render_diff(&diff, "mint");

        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "mint");
        assert!(lines[2].starts_with("| metric"));
        assert!(lines[4].ends_with("|    -6 |"));
        assert!(lines[6].ends_with("|     0 |"));
        assert!(lines[8].contains("| on     | off   |     - |"));
    }

    #[test]
    fn test_render_report_skips_missing_sections() {
        let before = snap("before", vec![BalanceRecord::new("u", "A", U256::from(1u64))]);
        let report = render_report(Some(&before), None, None);
        assert!(report.contains("| before |"));
        assert!(!report.contains("after"));
    }
}
