use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// A logical participant whose balances are tracked
///
/// Unique by name within a registry; several entities may share an address
/// (governance and manager frequently coincide).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub address: Address,
}

impl Entity {
    pub fn new(name: impl Into<String>, address: Address) -> Self {
        Self {
            name: name.into(),
            address,
        }
    }
}

/// A tracked token, identified by its contract address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub name: String,
    pub contract_address: Address,
}

impl Asset {
    pub fn new(name: impl Into<String>, contract_address: Address) -> Self {
        Self {
            name: name.into(),
            contract_address,
        }
    }
}
