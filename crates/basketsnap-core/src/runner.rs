//! Operation runner
//!
//! Brackets exactly one state-changing call with a before and an after
//! snapshot. The stages run strictly in sequence: the after snapshot is only
//! attempted once the operation has returned successfully.

use std::fmt;

use crate::errors::{HarnessError, Result};
use crate::executor::{CallSpec, CallerContext, OperationExecutor, Receipt};
use crate::snapshot::BalanceSnapshot;

/// Stage of a bracketed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    Before,
    Operation,
    After,
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunStage::Before => "before",
            RunStage::Operation => "operation",
            RunStage::After => "after",
        };
        write!(f, "{}", name)
    }
}

/// A completed before/operation/after sequence
#[derive(Debug, Clone, PartialEq)]
pub struct BracketedRun<R> {
    pub before: BalanceSnapshot,
    pub outcome: R,
    pub after: BalanceSnapshot,
}

/// A run that stopped at `stage`
///
/// `before` is kept whenever the before capture itself succeeded, so callers
/// can still report the state the failing operation started from.
#[derive(Debug, Clone, PartialEq)]
pub struct RunFailure {
    pub stage: RunStage,
    pub before: Option<BalanceSnapshot>,
    pub error: HarnessError,
}

impl fmt::Display for RunFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} stage failed: {}", self.stage, self.error)
    }
}

impl std::error::Error for RunFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl From<RunFailure> for HarnessError {
    fn from(failure: RunFailure) -> Self {
        failure.error
    }
}

/// Run `operation` bracketed by two captures
///
/// # Errors
///
/// - stage `Before`: the before capture failed; `operation` was not invoked
/// - stage `Operation`: the operation failed; no after capture was attempted
/// - stage `After`: the after capture failed; the operation already took effect
pub fn run<R>(
    capture_before: impl FnOnce() -> Result<BalanceSnapshot>,
    operation: impl FnOnce() -> Result<R>,
    capture_after: impl FnOnce() -> Result<BalanceSnapshot>,
) -> std::result::Result<BracketedRun<R>, RunFailure> {
    let before = capture_before().map_err(|error| RunFailure {
        stage: RunStage::Before,
        before: None,
        error,
    })?;

    let outcome = match operation() {
        Ok(outcome) => outcome,
        Err(error) => {
            return Err(RunFailure {
                stage: RunStage::Operation,
                before: Some(before),
                error,
            })
        }
    };

    match capture_after() {
        Ok(after) => Ok(BracketedRun {
            before,
            outcome,
            after,
        }),
        Err(error) => Err(RunFailure {
            stage: RunStage::After,
            before: Some(before),
            error,
        }),
    }
}

/// Execute one call, mapping any executor failure to `OperationRevert`
///
/// # Errors
///
/// Returns `OperationRevert` carrying the executor's reason verbatim.
pub fn execute_call(
    executor: &impl OperationExecutor,
    call: &CallSpec,
    caller: &CallerContext,
) -> Result<Receipt> {
    executor
        .execute(call, caller)
        .map_err(|err| HarnessError::OperationRevert {
            reason: err.reason().to_string(),
        })
}
