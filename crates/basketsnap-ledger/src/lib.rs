//! basketsnap ledger - in-memory basket ledger and scenario files
//!
//! - `InMemoryLedger`: deterministic ERC-20 + basket state implementing the
//!   harness collaborator traits
//! - Scenario Format v0 (YAML), parser with validation, and runner

pub mod ledger;
pub mod scenario;

pub use ledger::{BasketConfig, InMemoryLedger};
pub use scenario::{
    parse_scenario_file, parse_scenario_str, run_scenario, OperationOutcome, OperationReport,
    Scenario, ScenarioReport,
};
