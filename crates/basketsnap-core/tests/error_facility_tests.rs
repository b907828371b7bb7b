#![allow(clippy::unwrap_used, clippy::expect_used)]

use basketsnap_core::errors::{ExError, ExErrorKind, HarnessError};
use basketsnap_core::{BalanceSnapshot, SourceError};
use basketsnap_core_types::RunId;

#[test]
fn test_every_variant_maps_to_a_kind() {
    let cases = vec![
        (
            HarnessError::BalanceQuery {
                entity: "quad".into(),
                asset: "DAI".into(),
                source: SourceError::ContractQuery("execution reverted".into()),
            },
            ExErrorKind::BalanceQuery,
        ),
        (
            HarnessError::Introspection {
                field: "governance".into(),
                source: SourceError::Network("timeout".into()),
            },
            ExErrorKind::Introspection,
        ),
        (
            HarnessError::ShapeMismatch {
                position: 0,
                expected: "a balance of X".into(),
                found: "a balance of Y".into(),
            },
            ExErrorKind::ShapeMismatch,
        ),
        (
            HarnessError::InvalidSnapshot { reason: "dup".into() },
            ExErrorKind::InvalidSnapshot,
        ),
        (
            HarnessError::NoSnapshot { which: "after".into() },
            ExErrorKind::NoSnapshot,
        ),
        (
            HarnessError::InvalidScenario { reason: "bad".into() },
            ExErrorKind::InvalidScenario,
        ),
        (
            HarnessError::InvalidInput { reason: "bad".into() },
            ExErrorKind::InvalidInput,
        ),
        (
            HarnessError::Serialization { message: "eof".into() },
            ExErrorKind::Serialization,
        ),
        (HarnessError::Io { message: "denied".into() }, ExErrorKind::Io),
    ];

    for (err, kind) in cases {
        let ex: ExError = err.into();
        assert_eq!(ex.kind(), kind);
        assert!(ex.code().starts_with("ERR_"));
    }
}

#[test]
fn test_ex_error_builder_context() {
    let run_id = RunId::new();
    let ex = ExError::new(ExErrorKind::BalanceQuery)
        .with_op("capture")
        .with_entity("randomUser")
        .with_asset("USDC")
        .with_run_id(run_id.clone())
        .with_message("connection refused");

    assert_eq!(ex.run_id(), Some(&run_id));
    assert_eq!(
        ex.to_string(),
        "[ERR_BALANCE_QUERY] in operation 'capture': connection refused (entity: randomUser) (asset: USDC)"
    );
}

#[test]
fn test_malformed_snapshot_json_is_serialization_error() {
    let err = BalanceSnapshot::from_json("{ not json").unwrap_err();
    assert!(matches!(err, HarnessError::Serialization { .. }));
}

#[test]
fn test_duplicate_keys_rejected_on_load() {
    let json = r#"{
        "label": "before",
        "run_id": null,
        "records": [
            {"entity_name": "quad", "asset_name": "DAI", "value": {"kind": "numeric", "value": "1"}},
            {"entity_name": "quad", "asset_name": "DAI", "value": {"kind": "numeric", "value": "2"}}
        ]
    }"#;
    let err = BalanceSnapshot::from_json(json).unwrap_err();
    assert!(matches!(err, HarnessError::InvalidSnapshot { .. }));
}
