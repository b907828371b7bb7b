use std::collections::HashSet;

use alloy_primitives::U256;
use basketsnap_core_types::RunId;
use serde::{Deserialize, Serialize};

use crate::errors::{HarnessError, Result};
use crate::model::MetricValue;

/// Display key for a metric, e.g. `randomUser balance of DAI`
pub fn metric_key(entity_name: &str, asset_name: &str) -> String {
    format!("{} balance of {}", entity_name, asset_name)
}

/// One cell of the balance grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceRecord {
    pub entity_name: String,
    pub asset_name: String,
    pub value: MetricValue,
}

impl BalanceRecord {
    pub fn new(
        entity_name: impl Into<String>,
        asset_name: impl Into<String>,
        value: impl Into<MetricValue>,
    ) -> Self {
        Self {
            entity_name: entity_name.into(),
            asset_name: asset_name.into(),
            value: value.into(),
        }
    }

    pub fn metric(&self) -> String {
        metric_key(&self.entity_name, &self.asset_name)
    }

    pub fn key(&self) -> (&str, &str) {
        (&self.entity_name, &self.asset_name)
    }

    /// Numeric balance, if this record holds one
    pub fn balance(&self) -> Option<U256> {
        self.value.as_numeric()
    }
}

/// An immutable, ordered balance grid
///
/// Constructed only through `capture` or the validating constructors, so
/// every instance has unique `(entity, asset)` keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    label: String,
    run_id: Option<RunId>,
    records: Vec<BalanceRecord>,
}

impl BalanceSnapshot {
    /// Build a snapshot from records, rejecting duplicate keys
    ///
    /// # Errors
    ///
    /// Returns `InvalidSnapshot` if two records share an `(entity, asset)` key.
    pub fn from_records(label: impl Into<String>, records: Vec<BalanceRecord>) -> Result<Self> {
        validate_unique_keys(&records)?;
        Ok(Self {
            label: label.into(),
            run_id: None,
            records,
        })
    }

    /// Parse and validate a snapshot previously written with `to_json`
    ///
    /// # Errors
    ///
    /// Returns `Serialization` for malformed JSON and `InvalidSnapshot` for
    /// duplicate keys.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: BalanceSnapshot = serde_json::from_str(json)?;
        validate_unique_keys(&snapshot.records)?;
        Ok(snapshot)
    }

    /// Pretty-printed JSON form
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if encoding fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub(crate) fn captured(label: String, run_id: Option<RunId>, records: Vec<BalanceRecord>) -> Self {
        Self {
            label,
            run_id,
            records,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn run_id(&self) -> Option<&RunId> {
        self.run_id.as_ref()
    }

    pub fn records(&self) -> &[BalanceRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BalanceRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a single cell
    pub fn get(&self, entity_name: &str, asset_name: &str) -> Option<&BalanceRecord> {
        self.records
            .iter()
            .find(|r| r.entity_name == entity_name && r.asset_name == asset_name)
    }

    /// Numeric balance of one cell
    pub fn balance_of(&self, entity_name: &str, asset_name: &str) -> Option<U256> {
        self.get(entity_name, asset_name).and_then(BalanceRecord::balance)
    }

    /// Ordered metric keys, the snapshot's shape
    pub fn keys(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.records.iter().map(BalanceRecord::key)
    }
}

impl<'a> IntoIterator for &'a BalanceSnapshot {
    type Item = &'a BalanceRecord;
    type IntoIter = std::slice::Iter<'a, BalanceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

fn validate_unique_keys(records: &[BalanceRecord]) -> Result<()> {
    let mut seen = HashSet::new();
    for record in records {
        if !seen.insert(record.key()) {
            return Err(HarnessError::InvalidSnapshot {
                reason: format!("duplicate metric `{}`", record.metric()),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_key_format() {
        assert_eq!(metric_key("quad", "DAI"), "quad balance of DAI");
    }

    #[test]
    fn test_from_records_rejects_duplicates() {
        let records = vec![
            BalanceRecord::new("quad", "DAI", U256::from(1u64)),
            BalanceRecord::new("quad", "DAI", U256::from(2u64)),
        ];
        let err = BalanceSnapshot::from_records("before", records).unwrap_err();
        assert!(matches!(err, HarnessError::InvalidSnapshot { .. }));
    }

    #[test]
    fn test_json_round_trip_preserves_order_and_label() {
        let snapshot = BalanceSnapshot::from_records(
            "after",
            vec![
                BalanceRecord::new("randomUser", "USDT", U256::from(3u64)),
                BalanceRecord::new("randomUser", "DAI", U256::from(1u64)),
                BalanceRecord::new("quad", "flag", MetricValue::Opaque("paused".into())),
            ],
        )
        .unwrap();

        let parsed = BalanceSnapshot::from_json(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(parsed, snapshot);
        assert_eq!(parsed.label(), "after");
        assert_eq!(parsed.balance_of("randomUser", "DAI"), Some(U256::from(1u64)));
        assert_eq!(parsed.balance_of("quad", "flag"), None);
    }

    #[test]
    fn test_from_json_rejects_duplicate_keys() {
        let json = r#"{
            "label": "x",
            "run_id": null,
            "records": [
                {"entity_name": "a", "asset_name": "b", "value": {"kind": "numeric", "value": "1"}},
                {"entity_name": "a", "asset_name": "b", "value": {"kind": "numeric", "value": "2"}}
            ]
        }"#;
        assert!(matches!(
            BalanceSnapshot::from_json(json),
            Err(HarnessError::InvalidSnapshot { .. })
        ));
    }
}
