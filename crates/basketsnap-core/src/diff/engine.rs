//! Snapshot diff computation engine.

use crate::diff::model::{DiffEntry, SnapshotDiff};
use crate::errors::{HarnessError, Result};
use crate::model::{Delta, MetricValue, SignedAmount};
use crate::snapshot::model::{metric_key, BalanceSnapshot};

const DIFF_SCHEMA_VERSION: u32 = 1;

/// Delta between two cell values, dispatched on the value variants
pub fn delta_between(before: &MetricValue, after: &MetricValue) -> Delta {
    match (before, after) {
        (MetricValue::Numeric(b), MetricValue::Numeric(a)) => {
            Delta::Numeric(SignedAmount::between(*b, *a))
        }
        _ => Delta::NotComparable,
    }
}

/// Verify both snapshots carry the same metric keys in the same order.
fn check_shape(before: &BalanceSnapshot, after: &BalanceSnapshot) -> Result<()> {
    for (position, (b, a)) in before.keys().zip(after.keys()).enumerate() {
        if b != a {
            return Err(HarnessError::ShapeMismatch {
                position,
                expected: metric_key(b.0, b.1),
                found: metric_key(a.0, a.1),
            });
        }
    }

    if before.len() != after.len() {
        let position = before.len().min(after.len());
        let describe = |snapshot: &BalanceSnapshot| {
            snapshot
                .records()
                .get(position)
                .map(|r| r.metric())
                .unwrap_or_else(|| format!("end of snapshot ({} records)", snapshot.len()))
        };
        return Err(HarnessError::ShapeMismatch {
            position,
            expected: describe(before),
            found: describe(after),
        });
    }

    Ok(())
}

/// Compute the per-metric diff `after - before`.
///
/// # Errors
///
/// - `ShapeMismatch`: the snapshots do not share the same ordered metric
///   keys (different entities, assets, or registration order)
pub fn compute_diff(before: &BalanceSnapshot, after: &BalanceSnapshot) -> Result<SnapshotDiff> {
    check_shape(before, after)?;

    let entries = before
        .iter()
        .zip(after.iter())
        .map(|(b, a)| DiffEntry {
            entity_name: b.entity_name.clone(),
            asset_name: b.asset_name.clone(),
            before: b.value.clone(),
            after: a.value.clone(),
            delta: delta_between(&b.value, &a.value),
        })
        .collect();

    Ok(SnapshotDiff {
        diff_schema_version: DIFF_SCHEMA_VERSION,
        before_label: before.label().to_string(),
        after_label: after.label().to_string(),
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::model::BalanceRecord;
    use alloy_primitives::U256;

    fn snap(label: &str, cells: &[(&str, &str, u64)]) -> BalanceSnapshot {
        BalanceSnapshot::from_records(
            label,
            cells
                .iter()
                .map(|(e, a, v)| BalanceRecord::new(*e, *a, U256::from(*v)))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_delta_between_variants() {
        let one = MetricValue::Numeric(U256::from(1u64));
        let opaque = MetricValue::Opaque("0xabc".into());
        assert_eq!(delta_between(&one, &opaque), Delta::NotComparable);
        assert_eq!(delta_between(&opaque, &opaque), Delta::NotComparable);
        assert!(delta_between(&one, &one).is_zero());
    }

    #[test]
    fn test_length_mismatch_reports_first_missing_position() {
        let before = snap("before", &[("a", "X", 1), ("a", "Y", 2)]);
        let after = snap("after", &[("a", "X", 1)]);

        match compute_diff(&before, &after).unwrap_err() {
            HarnessError::ShapeMismatch {
                position,
                expected,
                found,
            } => {
                assert_eq!(position, 1);
                assert_eq!(expected, "a balance of Y");
                assert!(found.starts_with("end of snapshot"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_labels_are_carried() {
        let before = snap("before", &[("a", "X", 1)]);
        let after = snap("after", &[("a", "X", 4)]);
        let diff = compute_diff(&before, &after).unwrap();
        assert_eq!(diff.before_label, "before");
        assert_eq!(diff.after_label, "after");
        assert_eq!(diff.diff_schema_version, 1);
    }
}
