use serde::Serialize;

use crate::errors::Result;

/// Pretty-printed JSON for a snapshot, diff or receipt
///
/// Amounts are encoded as decimal strings so 256-bit values survive
/// consumers with 64-bit numbers.
///
/// # Errors
///
/// Returns `Serialization` if encoding fails.
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::compute_diff;
    use crate::snapshot::{BalanceRecord, BalanceSnapshot};
    use alloy_primitives::U256;

    #[test]
    fn test_diff_json_shape() {
        let before = BalanceSnapshot::from_records(
            "before",
            vec![BalanceRecord::new("randomUser", "DAI", U256::from(100u64))],
        )
        .unwrap();
        let after = BalanceSnapshot::from_records(
            "after",
            vec![BalanceRecord::new("randomUser", "DAI", U256::from(40u64))],
        )
        .unwrap();
        let diff = compute_diff(&before, &after).unwrap();

        let value: serde_json::Value = serde_json::from_str(&render_json(&diff).unwrap()).unwrap();
        assert_eq!(value["diff_schema_version"], 1);
        assert_eq!(value["entries"][0]["entity_name"], "randomUser");
        assert_eq!(
            value["entries"][0]["delta"],
            serde_json::json!({"kind": "numeric", "value": "-60"})
        );
    }
}
