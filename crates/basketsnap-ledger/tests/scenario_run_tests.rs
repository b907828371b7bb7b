#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Scenario runs over the in-memory ledger, using the shipped demo files.

use std::io::Write;
use std::path::PathBuf;

use basketsnap_core::{Delta, HarnessError, SignedAmount, U256};
use basketsnap_ledger::scenario::{run_scenario_on, scenario_harness};
use basketsnap_ledger::{parse_scenario_file, parse_scenario_str, run_scenario, OperationOutcome};

fn demo(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../demos")
        .join(name)
}

fn e18(n: u64) -> U256 {
    U256::from(n) * U256::from(10u64).pow(U256::from(18u64))
}

#[test]
fn test_mint_flow_demo_passes() {
    // GIVEN the mint flow scenario
    let scenario = parse_scenario_file(&demo("mint_flow.yaml")).unwrap();

    // WHEN it runs
    let report = run_scenario(&scenario).unwrap();

    // THEN every operation matches its expectations
    assert_eq!(report.operations.len(), 2);
    assert!(report.passed(), "failed operations: {}", report.failed_count());

    // AND the mint diff carries the three movements
    match &report.operations[0].outcome {
        OperationOutcome::Completed { diff, receipt, .. } => {
            assert_eq!(receipt.sequence, 1);
            assert_eq!(
                diff.delta_of("randomUser", "DAI"),
                Some(&Delta::Numeric(SignedAmount::decrease(e18(100))))
            );
            assert_eq!(
                diff.delta_of("randomUser", "QUAD_LP"),
                Some(&Delta::Numeric(SignedAmount::increase(e18(25))))
            );
            assert_eq!(
                diff.delta_of("quad", "DAI"),
                Some(&Delta::Numeric(SignedAmount::increase(e18(100))))
            );
            assert_eq!(diff.changes().count(), 3);
        }
        other => panic!("mint should complete, got {other:?}"),
    }
}

#[test]
fn test_paused_demo_reports_reverts() {
    let scenario = parse_scenario_file(&demo("paused_basket.yaml")).unwrap();
    let report = run_scenario(&scenario).unwrap();

    assert!(report.passed());
    for op in &report.operations {
        match &op.outcome {
            OperationOutcome::Reverted { reason, before } => {
                assert_eq!(reason, "Pausable: paused");
                assert!(before.is_some());
            }
            other => panic!("expected revert, got {other:?}"),
        }
    }
}

#[test]
fn test_failed_expectation_is_reported_not_raised() {
    let yaml = std::fs::read_to_string(demo("mint_flow.yaml"))
        .unwrap()
        .replace("delta: \"+25e18\"", "delta: \"+26e18\"");
    let scenario = parse_scenario_str(&yaml).unwrap();

    let report = run_scenario(&scenario).unwrap();
    assert!(!report.passed());
    assert_eq!(report.failed_count(), 1);
    assert!(!report.operations[0].passed());
    assert!(report.operations[1].passed());
}

#[test]
fn test_unexpected_revert_fails_operation() {
    let yaml = std::fs::read_to_string(demo("mint_flow.yaml"))
        .unwrap()
        .replace("amount: \"100e18\" }\n", "amount: \"1e18\" }\n");
    let scenario = parse_scenario_str(&yaml).unwrap();

    let report = run_scenario(&scenario).unwrap();
    match &report.operations[0].outcome {
        OperationOutcome::Reverted { reason, .. } => {
            assert_eq!(reason, "ERC20: transfer amount exceeds allowance")
        }
        other => panic!("expected revert, got {other:?}"),
    }
    assert!(!report.operations[0].passed());
}

#[test]
fn test_balance_query_failure_aborts_run() {
    let scenario = parse_scenario_file(&demo("mint_flow.yaml")).unwrap();
    let ledger = scenario.build_ledger().unwrap();
    let user = scenario.entities[0].address;
    let usdc = scenario.basket.inputs[2];
    ledger.fail_balance_query(user, usdc);

    match run_scenario_on(&scenario, &ledger).unwrap_err() {
        HarnessError::BalanceQuery { entity, asset, .. } => {
            assert_eq!(entity, "randomUser");
            assert_eq!(asset, "USDC");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(ledger.sequence(), 0);
}

#[test]
fn test_scenario_harness_registration_order() {
    let scenario = parse_scenario_file(&demo("mint_flow.yaml")).unwrap();
    let ledger = scenario.build_ledger().unwrap();
    let harness = scenario_harness(&scenario, &ledger).unwrap();

    let entities: Vec<String> = harness.entities().all().into_iter().map(|e| e.name).collect();
    assert_eq!(entities, vec!["quad", "governance", "manager", "randomUser"]);

    let assets: Vec<String> = harness.assets().all().into_iter().map(|a| a.name).collect();
    assert_eq!(
        assets,
        vec!["QUAD_LP", "JOE", "PNG", "QI", "SNOB", "YAK", "USDT", "DAI", "USDC"]
    );

    let genesis = harness.capture_snapshot("genesis").unwrap();
    assert_eq!(genesis.len(), 4 * 9);
    assert_eq!(genesis.balance_of("governance", "QUAD_LP"), Some(e18(75)));
    assert_eq!(genesis.balance_of("quad", "QI"), Some(e18(1000)));
}

#[test]
fn test_report_serializes_to_json() {
    let scenario = parse_scenario_file(&demo("paused_basket.yaml")).unwrap();
    let report = run_scenario(&scenario).unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["name"], "quad paused");
    assert_eq!(json["operations"][0]["outcome"]["status"], "reverted");
    assert_eq!(json["operations"][0]["outcome"]["reason"], "Pausable: paused");
}

#[test]
fn test_parse_scenario_from_temp_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(
        std::fs::read_to_string(demo("paused_basket.yaml"))
            .unwrap()
            .as_bytes(),
    )
    .unwrap();

    let scenario = parse_scenario_file(file.path()).unwrap();
    assert!(scenario.paused);
    assert_eq!(scenario.operations.len(), 2);

    let missing = parse_scenario_file(&file.path().with_extension("missing")).unwrap_err();
    assert!(matches!(missing, HarnessError::InvalidScenario { .. }));
}
