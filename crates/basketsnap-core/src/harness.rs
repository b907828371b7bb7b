//! Snapshot harness facade
//!
//! Owns the registries, the captured before/after snapshots and the two
//! collaborators (balance source, operation executor). Every public
//! operation logs one start event and one end or end_error event stamped
//! with the harness `run_id`.
//!
//! ```ignore
//! let mut harness = SnapshotHarness::new(&ledger, &ledger);
//! harness.register_entity("randomUser", user);
//! harness.register_asset("DAI", dai);
//! harness.run_operation(&call, &CallerContext::new(user))?;
//! println!("{}", harness.report()?);
//! ```

use std::time::Instant;

use alloy_primitives::Address;
use basketsnap_core_types::{OperationId, RunId};

use crate::diff::{compute_diff, SnapshotDiff};
use crate::errors::{HarnessError, Result};
use crate::executor::{CallSpec, CallerContext, OperationExecutor, Receipt};
use crate::registry::{AssetRegistry, EntityRegistry};
use crate::render::render_report;
use crate::runner::{self, RunStage};
use crate::snapshot::{self, BalanceSnapshot};
use crate::source::BalanceSource;
use crate::{log_op_end, log_op_error, log_op_start};

pub const BEFORE_LABEL: &str = "before";
pub const AFTER_LABEL: &str = "after";

/// Registries, snapshots and collaborators for one verification run
pub struct SnapshotHarness<S, X> {
    run_id: RunId,
    entities: EntityRegistry,
    assets: AssetRegistry,
    source: S,
    executor: X,
    before: Option<BalanceSnapshot>,
    after: Option<BalanceSnapshot>,
    last_receipt: Option<Receipt>,
}

impl<S: BalanceSource, X: OperationExecutor> SnapshotHarness<S, X> {
    /// Create a harness with empty registries and a fresh `RunId`
    pub fn new(source: S, executor: X) -> Self {
        Self {
            run_id: RunId::new(),
            entities: EntityRegistry::new(),
            assets: AssetRegistry::new(),
            source,
            executor,
            before: None,
            after: None,
            last_receipt: None,
        }
    }

    /// Replace the generated run id, e.g. to correlate with an outer run
    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = run_id;
        self
    }

    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }

    fn has_snapshot(&self) -> bool {
        self.before.is_some() || self.after.is_some()
    }

    /// Add or rebind a tracked participant
    ///
    /// Rebinding after a snapshot exists is allowed but logged at warn level:
    /// later snapshots will read the new address under the same metric name.
    pub fn register_entity(&mut self, name: impl Into<String>, address: Address) {
        let name = name.into();
        match self.entities.register(name.clone(), address) {
            Some(previous) if previous != address && self.has_snapshot() => {
                tracing::warn!(
                    run_id = %self.run_id,
                    entity = %name,
                    previous = %previous,
                    address = %address,
                    "entity rebound after snapshot capture"
                );
            }
            _ => {
                tracing::debug!(run_id = %self.run_id, entity = %name, address = %address, "entity registered");
            }
        }
    }

    /// Add or rebind a tracked token
    pub fn register_asset(&mut self, name: impl Into<String>, contract_address: Address) {
        let name = name.into();
        match self.assets.register(name.clone(), contract_address) {
            Some(previous) if previous != contract_address && self.has_snapshot() => {
                tracing::warn!(
                    run_id = %self.run_id,
                    asset = %name,
                    previous = %previous,
                    address = %contract_address,
                    "asset rebound after snapshot capture"
                );
            }
            _ => {
                tracing::debug!(run_id = %self.run_id, asset = %name, address = %contract_address, "asset registered");
            }
        }
    }

    pub fn entities(&self) -> &EntityRegistry {
        &self.entities
    }

    pub fn assets(&self) -> &AssetRegistry {
        &self.assets
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn executor(&self) -> &X {
        &self.executor
    }

    /// Capture the full balance grid under `label` without storing it
    ///
    /// # Errors
    ///
    /// Returns `BalanceQuery` naming the first failing `(entity, asset)` pair.
    pub fn capture_snapshot(&self, label: &str) -> Result<BalanceSnapshot> {
        log_op_start!(
            "capture",
            self.run_id,
            label = label,
            entity_count = self.entities.len(),
            asset_count = self.assets.len()
        );
        let start = Instant::now();

        let snapshot = snapshot::capture(
            label,
            Some(&self.run_id),
            &self.entities,
            &self.assets,
            &self.source,
        )
        .map_err(|e| {
            log_op_error!("capture", self.run_id, start, e.clone(), label = label);
            e
        })?;

        log_op_end!(
            "capture",
            self.run_id,
            start,
            label = label,
            record_count = snapshot.len()
        );
        Ok(snapshot)
    }

    /// Capture and store the before snapshot
    ///
    /// Any previous after snapshot and receipt are discarded, since they
    /// no longer pair with the new before state.
    ///
    /// # Errors
    ///
    /// Returns `BalanceQuery`; the stored snapshots are left unchanged.
    pub fn capture_before(&mut self) -> Result<&BalanceSnapshot> {
        let snapshot = self.capture_snapshot(BEFORE_LABEL)?;
        self.after = None;
        self.last_receipt = None;
        Ok(self.before.insert(snapshot))
    }

    /// Capture and store the after snapshot
    ///
    /// # Errors
    ///
    /// Returns `BalanceQuery`; the stored snapshots are left unchanged.
    pub fn capture_after(&mut self) -> Result<&BalanceSnapshot> {
        let snapshot = self.capture_snapshot(AFTER_LABEL)?;
        Ok(self.after.insert(snapshot))
    }

    /// Execute one call bracketed by before/after captures
    ///
    /// On success both snapshots are stored and the receipt returned. On a
    /// revert the before snapshot is kept, no after snapshot exists, and
    /// `get_diff` reports `NoSnapshot`.
    ///
    /// # Errors
    ///
    /// - `BalanceQuery` from either capture
    /// - `OperationRevert` with the executor's reason verbatim
    pub fn run_operation(&mut self, call: &CallSpec, caller: &CallerContext) -> Result<Receipt> {
        let operation_id = OperationId::new();
        log_op_start!(
            "run_operation",
            self.run_id,
            operation_id = %operation_id,
            method = call.method(),
            caller = %caller
        );
        let start = Instant::now();

        let outcome = runner::run(
            || self.capture_snapshot(BEFORE_LABEL),
            || runner::execute_call(&self.executor, call, caller),
            || self.capture_snapshot(AFTER_LABEL),
        );

        match outcome {
            Ok(run) => {
                self.before = Some(run.before);
                self.after = Some(run.after);
                self.last_receipt = Some(run.outcome.clone());
                log_op_end!(
                    "run_operation",
                    self.run_id,
                    start,
                    operation_id = %operation_id,
                    method = call.method(),
                    sequence = run.outcome.sequence
                );
                Ok(run.outcome)
            }
            Err(failure) => {
                // A failed before capture leaves nothing from this run.
                self.before = match failure.stage {
                    RunStage::Before => None,
                    RunStage::Operation | RunStage::After => failure.before.clone(),
                };
                self.after = None;
                self.last_receipt = None;
                log_op_error!(
                    "run_operation",
                    self.run_id,
                    start,
                    failure.error.clone(),
                    operation_id = %operation_id,
                    method = call.method(),
                    stage = %failure.stage
                );
                Err(HarnessError::from(failure))
            }
        }
    }

    /// Diff of the stored before and after snapshots
    ///
    /// # Errors
    ///
    /// - `NoSnapshot` when either side has not been captured
    /// - `ShapeMismatch` when registrations changed between the captures
    pub fn get_diff(&self) -> Result<SnapshotDiff> {
        log_op_start!("diff", self.run_id);
        let start = Instant::now();

        let result = (|| -> Result<SnapshotDiff> {
            let before = self.before.as_ref().ok_or_else(|| HarnessError::NoSnapshot {
                which: BEFORE_LABEL.to_string(),
            })?;
            let after = self.after.as_ref().ok_or_else(|| HarnessError::NoSnapshot {
                which: AFTER_LABEL.to_string(),
            })?;
            compute_diff(before, after)
        })();

        match &result {
            Ok(diff) => log_op_end!("diff", self.run_id, start, changed = diff.changes().count()),
            Err(e) => log_op_error!("diff", self.run_id, start, e.clone()),
        }
        result
    }

    /// Before table, after table and diff table, as available
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` if both snapshots exist but cannot be aligned.
    pub fn report(&self) -> Result<String> {
        let diff = match (&self.before, &self.after) {
            (Some(_), Some(_)) => Some(self.get_diff()?),
            _ => None,
        };
        Ok(render_report(
            self.before.as_ref(),
            self.after.as_ref(),
            diff.as_ref(),
        ))
    }

    pub fn before(&self) -> Option<&BalanceSnapshot> {
        self.before.as_ref()
    }

    pub fn after(&self) -> Option<&BalanceSnapshot> {
        self.after.as_ref()
    }

    /// Receipt of the last successful `run_operation`
    pub fn last_receipt(&self) -> Option<&Receipt> {
        self.last_receipt.as_ref()
    }

    /// Drop stored snapshots and receipt, keeping registrations
    pub fn reset(&mut self) {
        self.before = None;
        self.after = None;
        self.last_receipt = None;
    }
}
