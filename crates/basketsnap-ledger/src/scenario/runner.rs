//! Scenario runner
//!
//! Builds the genesis ledger, seeds a harness from the basket layout plus
//! the scenario's extra entities, then brackets each operation in order.
//! A failing operation never stops the run: every operation gets a report.

use std::time::Instant;

use basketsnap_core::basket::BasketLayout;
use basketsnap_core::invariants::ConservationViolation;
use basketsnap_core::{
    check_conservation, check_expectations, log_op_end, log_op_error, log_op_start,
    BalanceSnapshot, CallSpec, ExpectationFailure, HarnessError, Receipt, Result, SnapshotDiff,
    SnapshotHarness,
};
use basketsnap_core_types::RunId;
use serde::Serialize;

use crate::ledger::InMemoryLedger;
use crate::scenario::parser::{ResolvedOperation, Scenario};

/// Result of one bracketed operation
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OperationOutcome {
    Completed {
        receipt: Receipt,
        before: BalanceSnapshot,
        after: BalanceSnapshot,
        diff: SnapshotDiff,
        expectation_failures: Vec<ExpectationFailure>,
        #[serde(serialize_with = "serialize_display_list")]
        conservation_violations: Vec<ConservationViolation>,
    },
    Reverted {
        reason: String,
        before: Option<BalanceSnapshot>,
    },
}

fn serialize_display_list<S, T>(items: &[T], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
    T: std::fmt::Display,
{
    serializer.collect_seq(items.iter().map(|item| item.to_string()))
}

#[derive(Debug, Clone, Serialize)]
pub struct OperationReport {
    pub name: String,
    pub caller: String,
    pub call: CallSpec,
    pub expect_revert: Option<String>,
    pub outcome: OperationOutcome,
}

impl OperationReport {
    /// Whether the outcome matches what the scenario predicted
    pub fn passed(&self) -> bool {
        match (&self.outcome, &self.expect_revert) {
            (
                OperationOutcome::Completed {
                    expectation_failures,
                    conservation_violations,
                    ..
                },
                None,
            ) => expectation_failures.is_empty() && conservation_violations.is_empty(),
            (OperationOutcome::Completed { .. }, Some(_)) => false,
            (OperationOutcome::Reverted { reason, .. }, Some(expected)) => reason == expected,
            (OperationOutcome::Reverted { .. }, None) => false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub name: String,
    pub run_id: RunId,
    pub operations: Vec<OperationReport>,
}

impl ScenarioReport {
    pub fn passed(&self) -> bool {
        self.operations.iter().all(OperationReport::passed)
    }

    pub fn failed_count(&self) -> usize {
        self.operations.iter().filter(|op| !op.passed()).count()
    }
}

/// Harness over `ledger` seeded with the scenario's registries
///
/// # Errors
///
/// Returns `Introspection` if the ledger cannot describe the basket.
pub fn scenario_harness<'a>(
    scenario: &Scenario,
    ledger: &'a InMemoryLedger,
) -> Result<SnapshotHarness<&'a InMemoryLedger, &'a InMemoryLedger>> {
    let layout = BasketLayout::discover(ledger)?.with_names(&scenario.basket_name, &scenario.share_name);
    let mut harness = SnapshotHarness::new(ledger, ledger);
    layout.register_into(&mut harness);
    for entity in &scenario.entities {
        harness.register_entity(&entity.name, entity.address);
    }
    Ok(harness)
}

fn run_one(
    harness: &mut SnapshotHarness<&InMemoryLedger, &InMemoryLedger>,
    op: &ResolvedOperation,
) -> Result<OperationOutcome> {
    match harness.run_operation(&op.call, &op.caller) {
        Ok(receipt) => {
            let diff = harness.get_diff()?;
            let expectation_failures = check_expectations(&diff, &op.expectations);
            let conservation_violations = op
                .conserve
                .iter()
                .filter_map(|asset| check_conservation(&diff, asset).err())
                .collect();
            let (before, after) = match (harness.before(), harness.after()) {
                (Some(before), Some(after)) => (before.clone(), after.clone()),
                _ => {
                    return Err(HarnessError::NoSnapshot {
                        which: "after".to_string(),
                    })
                }
            };
            Ok(OperationOutcome::Completed {
                receipt,
                before,
                after,
                diff,
                expectation_failures,
                conservation_violations,
            })
        }
        Err(HarnessError::OperationRevert { reason }) => Ok(OperationOutcome::Reverted {
            reason,
            before: harness.before().cloned(),
        }),
        Err(other) => Err(other),
    }
}

/// Run every operation of `scenario` against a fresh genesis ledger
///
/// # Errors
///
/// Reverts are reported per operation, not returned. Errors are returned
/// only for harness failures (`BalanceQuery`, `Introspection`,
/// `ShapeMismatch`), which abort the run.
pub fn run_scenario(scenario: &Scenario) -> Result<ScenarioReport> {
    let ledger = scenario.build_ledger()?;
    run_scenario_on(scenario, &ledger)
}

/// Run `scenario`'s operations against an existing ledger
///
/// # Errors
///
/// See [`run_scenario`].
pub fn run_scenario_on(scenario: &Scenario, ledger: &InMemoryLedger) -> Result<ScenarioReport> {
    let mut harness = scenario_harness(scenario, ledger)?;
    let run_id = harness.run_id().clone();

    log_op_start!(
        "scenario_run",
        run_id,
        scenario = scenario.name.as_str(),
        operation_count = scenario.operations.len()
    );
    let start = Instant::now();

    let mut operations = Vec::with_capacity(scenario.operations.len());
    for op in &scenario.operations {
        let outcome = run_one(&mut harness, op).map_err(|e| {
            log_op_error!(
                "scenario_run",
                run_id,
                start,
                e.clone(),
                operation = op.name.as_str()
            );
            e
        })?;
        operations.push(OperationReport {
            name: op.name.clone(),
            caller: op.caller.to_string(),
            call: op.call.clone(),
            expect_revert: op.expect_revert.clone(),
            outcome,
        });
    }

    let report = ScenarioReport {
        name: scenario.name.clone(),
        run_id,
        operations,
    };

    log_op_end!(
        "scenario_run",
        report.run_id,
        start,
        failed = report.failed_count()
    );
    Ok(report)
}
