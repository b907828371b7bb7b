//! Scenario files
//!
//! - Scenario Format v0 schema (YAML)
//! - Parser with validation and name resolution
//! - Runner driving a `SnapshotHarness` over an `InMemoryLedger`

pub mod format_v0;
pub mod parser;
pub mod runner;

pub use format_v0::ScenarioV0;
pub use parser::{
    parse_scenario_file, parse_scenario_str, GenesisAmount, ResolvedOperation, Scenario,
};
pub use runner::{
    run_scenario, run_scenario_on, scenario_harness, OperationOutcome, OperationReport,
    ScenarioReport,
};
