//! Operation executor capability
//!
//! The state-changing call under test (mint or burn) is executed by an
//! external collaborator. The harness only observes whether it succeeded
//! and, if not, the revert reason.

use std::fmt;

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::value::decimal_u256;

/// Target contract method and its arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum CallSpec {
    /// Exchange `amount` of `input_asset` for at least `min_quantity` basket shares
    Mint {
        input_asset: Address,
        #[serde(with = "decimal_u256")]
        amount: U256,
        #[serde(with = "decimal_u256")]
        min_quantity: U256,
    },
    /// Redeem `amount` basket shares for the underlying pool tokens
    Burn {
        #[serde(with = "decimal_u256")]
        amount: U256,
    },
}

impl CallSpec {
    pub fn method(&self) -> &'static str {
        match self {
            CallSpec::Mint { .. } => "mint",
            CallSpec::Burn { .. } => "burn",
        }
    }
}

impl fmt::Display for CallSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallSpec::Mint {
                input_asset,
                amount,
                min_quantity,
            } => write!(f, "mint({}, {}, {})", input_asset, amount, min_quantity),
            CallSpec::Burn { amount } => write!(f, "burn({})", amount),
        }
    }
}

/// The account invoking the call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerContext {
    pub account: Address,
    /// Registry name of the caller, when known
    pub label: Option<String>,
}

impl CallerContext {
    pub fn new(account: Address) -> Self {
        Self {
            account,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

impl fmt::Display for CallerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{} ({})", label, self.account),
            None => write!(f, "{}", self.account),
        }
    }
}

/// Confirmation of a successfully executed call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub call: CallSpec,
    pub caller: Address,
    /// Ledger-assigned, strictly increasing per executed call
    pub sequence: u64,
}

/// Failure of the executed call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutorError {
    /// The contract reverted with a reason string
    #[error("reverted: {reason}")]
    Reverted { reason: String },
    /// The call never reached the contract
    #[error("transport error: {0}")]
    Transport(String),
}

impl ExecutorError {
    pub fn reverted(reason: impl Into<String>) -> Self {
        ExecutorError::Reverted {
            reason: reason.into(),
        }
    }

    /// The underlying reason, verbatim
    pub fn reason(&self) -> &str {
        match self {
            ExecutorError::Reverted { reason } => reason,
            ExecutorError::Transport(message) => message,
        }
    }
}

/// State-changing contract calls
pub trait OperationExecutor {
    /// Execute `call` on behalf of `caller`
    ///
    /// # Errors
    ///
    /// Returns `ExecutorError::Reverted` when the contract reverts.
    fn execute(&self, call: &CallSpec, caller: &CallerContext) -> Result<Receipt, ExecutorError>;
}

impl<T: OperationExecutor + ?Sized> OperationExecutor for &T {
    fn execute(&self, call: &CallSpec, caller: &CallerContext) -> Result<Receipt, ExecutorError> {
        (**self).execute(call, caller)
    }
}

impl<T: OperationExecutor + ?Sized> OperationExecutor for Box<T> {
    fn execute(&self, call: &CallSpec, caller: &CallerContext) -> Result<Receipt, ExecutorError> {
        (**self).execute(call, caller)
    }
}
