#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Failure paths of `run_operation`: reverts and failing balance queries.

mod common;

use basketsnap_core::errors::{ExError, ExErrorKind};
use basketsnap_core::{CallSpec, CallerContext, HarnessError};
use common::{accounts, quad_harness, tokens, MockLedger};

fn mint_100_dai() -> CallSpec {
    CallSpec::Mint {
        input_asset: accounts::dai(),
        amount: tokens(100),
        min_quantity: tokens(25),
    }
}

#[test]
fn test_paused_mint_reverts_without_after_snapshot() {
    // GIVEN a paused basket
    let ledger = MockLedger::new();
    ledger.set_balance(accounts::random_user(), accounts::dai(), tokens(1000));
    ledger.pause();
    let mut harness = quad_harness(&ledger);

    // WHEN minting
    let err = harness
        .run_operation(&mint_100_dai(), &CallerContext::new(accounts::random_user()))
        .unwrap_err();

    // THEN the revert reason is carried verbatim
    assert_eq!(
        err,
        HarnessError::OperationRevert {
            reason: "Pausable: paused".to_string()
        }
    );

    // AND only the before snapshot exists
    assert!(harness.before().is_some());
    assert!(harness.after().is_none());
    assert!(harness.last_receipt().is_none());

    // AND no diff is available
    assert_eq!(
        harness.get_diff().unwrap_err(),
        HarnessError::NoSnapshot {
            which: "after".to_string()
        }
    );

    // AND the report still shows the before table
    let report = harness.report().unwrap();
    assert!(report.contains("| metric"));
    assert!(!report.contains("delta"));
}

#[test]
fn test_revert_leaves_ledger_untouched() {
    let ledger = MockLedger::new();
    ledger.set_balance(accounts::random_user(), accounts::dai(), tokens(50));
    let mut harness = quad_harness(&ledger);

    let err = harness
        .run_operation(&mint_100_dai(), &CallerContext::new(accounts::random_user()))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "operation reverted: ERC20: transfer amount exceeds balance"
    );

    let ex: ExError = err.into();
    assert_eq!(ex.kind(), ExErrorKind::OperationRevert);
    assert_eq!(ledger.balance(accounts::random_user(), accounts::dai()), tokens(50));
}

#[test]
fn test_before_capture_failure_skips_operation() {
    let ledger = MockLedger::new();
    ledger.set_balance(accounts::random_user(), accounts::dai(), tokens(1000));
    ledger.fail_on(accounts::manager(), accounts::dai());
    let mut harness = quad_harness(&ledger);

    let err = harness
        .run_operation(&mint_100_dai(), &CallerContext::new(accounts::random_user()))
        .unwrap_err();

    match err {
        HarnessError::BalanceQuery { entity, asset, .. } => {
            assert_eq!(entity, "manager");
            assert_eq!(asset, "DAI");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    // The mint never ran
    assert_eq!(ledger.balance(accounts::random_user(), accounts::dai()), tokens(1000));
    assert!(harness.before().is_none());
    assert!(harness.after().is_none());
}

#[test]
fn test_get_diff_before_any_capture() {
    let ledger = MockLedger::new();
    let harness = quad_harness(&ledger);

    assert_eq!(
        harness.get_diff().unwrap_err(),
        HarnessError::NoSnapshot {
            which: "before".to_string()
        }
    );
    assert_eq!(harness.report().unwrap(), "");
}

#[test]
fn test_new_before_discards_stale_after() {
    let ledger = MockLedger::new();
    ledger.set_balance(accounts::random_user(), accounts::dai(), tokens(1000));
    let mut harness = quad_harness(&ledger);

    harness
        .run_operation(&mint_100_dai(), &CallerContext::new(accounts::random_user()))
        .unwrap();
    assert!(harness.get_diff().is_ok());

    harness.capture_before().unwrap();
    assert!(harness.after().is_none());
    assert!(harness.get_diff().is_err());

    harness.reset();
    assert!(harness.before().is_none());
}
