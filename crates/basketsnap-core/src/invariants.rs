//! Invariant checks over a snapshot diff
//!
//! - Expectations: exact signed deltas a scenario predicts for given metrics
//! - Conservation: an asset's deltas across all tracked entities sum to zero
//!
//! Conservation only holds when every holder that can receive the asset is
//! registered, and no two entities share an address (shared addresses count
//! the same balance twice).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::diff::SnapshotDiff;
use crate::model::{Delta, SignedAmount};
use crate::snapshot::model::metric_key;

/// Predicted delta of one `(entity, asset)` metric
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expectation {
    pub entity: String,
    pub asset: String,
    pub delta: SignedAmount,
}

impl Expectation {
    pub fn new(entity: impl Into<String>, asset: impl Into<String>, delta: SignedAmount) -> Self {
        Self {
            entity: entity.into(),
            asset: asset.into(),
            delta,
        }
    }

    pub fn metric(&self) -> String {
        metric_key(&self.entity, &self.asset)
    }
}

/// An expectation the diff did not satisfy
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExpectationFailure {
    #[error("{metric}: metric not present in diff")]
    MissingMetric { metric: String },

    #[error("{metric}: expected delta {expected}, got {actual}")]
    WrongDelta {
        metric: String,
        expected: SignedAmount,
        actual: SignedAmount,
    },

    #[error("{metric}: expected delta {expected}, value is not numeric")]
    NotComparable {
        metric: String,
        expected: SignedAmount,
    },
}

/// Check every expectation, returning the failures in input order
pub fn check_expectations(diff: &SnapshotDiff, expectations: &[Expectation]) -> Vec<ExpectationFailure> {
    expectations
        .iter()
        .filter_map(|expectation| {
            let metric = expectation.metric();
            match diff.delta_of(&expectation.entity, &expectation.asset) {
                None => Some(ExpectationFailure::MissingMetric { metric }),
                Some(Delta::NotComparable) => Some(ExpectationFailure::NotComparable {
                    metric,
                    expected: expectation.delta,
                }),
                Some(Delta::Numeric(actual)) if *actual != expectation.delta => {
                    Some(ExpectationFailure::WrongDelta {
                        metric,
                        expected: expectation.delta,
                        actual: *actual,
                    })
                }
                Some(Delta::Numeric(_)) => None,
            }
        })
        .collect()
}

/// Value of an asset was created or destroyed among tracked holders
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConservationViolation {
    #[error("asset {asset} is not tracked in the diff")]
    UnknownAsset { asset: String },

    #[error("asset {asset} is not numeric for {entity}")]
    NotComparable { asset: String, entity: String },

    #[error("asset {asset} net delta {net} across tracked entities")]
    Imbalanced { asset: String, net: SignedAmount },

    #[error("asset {asset} net delta exceeds 256 bits")]
    Overflow { asset: String },
}

/// Verify that `asset`'s deltas across all tracked entities sum to zero
///
/// # Errors
///
/// Returns the first `ConservationViolation` found.
pub fn check_conservation(diff: &SnapshotDiff, asset: &str) -> Result<(), ConservationViolation> {
    let mut net = SignedAmount::ZERO;
    let mut seen = false;

    for entry in diff.entries().iter().filter(|e| e.asset_name == asset) {
        seen = true;
        let delta = entry
            .delta
            .as_numeric()
            .ok_or_else(|| ConservationViolation::NotComparable {
                asset: asset.to_string(),
                entity: entry.entity_name.clone(),
            })?;
        net = net
            .checked_add(delta)
            .ok_or_else(|| ConservationViolation::Overflow {
                asset: asset.to_string(),
            })?;
    }

    if !seen {
        return Err(ConservationViolation::UnknownAsset {
            asset: asset.to_string(),
        });
    }
    if !net.is_zero() {
        return Err(ConservationViolation::Imbalanced {
            asset: asset.to_string(),
            net,
        });
    }
    Ok(())
}
