//! Balance source capability
//!
//! Abstracts the read-only `balanceOf(owner)` query against a token
//! contract so snapshot capture can run against a live node or a
//! deterministic in-memory ledger.

use alloy_primitives::{Address, U256};
use thiserror::Error;

/// Failure of a single balance query
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The ledger could not be reached
    #[error("network error: {0}")]
    Network(String),
    /// The token contract rejected or failed the query
    #[error("contract query error: {0}")]
    ContractQuery(String),
}

/// Read-only token balance queries
pub trait BalanceSource {
    /// Balance of `asset_contract` held by `owner`
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Network` when the ledger is unreachable and
    /// `SourceError::ContractQuery` when the token call itself fails.
    fn read_balance(&self, owner: Address, asset_contract: Address) -> Result<U256, SourceError>;
}

impl<T: BalanceSource + ?Sized> BalanceSource for &T {
    fn read_balance(&self, owner: Address, asset_contract: Address) -> Result<U256, SourceError> {
        (**self).read_balance(owner, asset_contract)
    }
}

impl<T: BalanceSource + ?Sized> BalanceSource for Box<T> {
    fn read_balance(&self, owner: Address, asset_contract: Address) -> Result<U256, SourceError> {
        (**self).read_balance(owner, asset_contract)
    }
}
