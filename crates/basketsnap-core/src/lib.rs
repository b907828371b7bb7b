//! basketsnap core - balance-snapshot verification for basket contracts
//!
//! Records the token balances of a fixed set of participants across a fixed
//! set of assets before and after one mint or burn, then diffs them so
//! conservation and exchange-ratio invariants can be checked.
//!
//! - Ordered entity and asset registries
//! - Balance grid capture against a `BalanceSource`
//! - Type-aware snapshot diff with signed 257-bit deltas
//! - Operation runner bracketing one call with two captures
//! - Grid, JSON and Markdown reporters
//! - `SnapshotHarness` facade plus basket layout discovery
//! - Expectation and conservation checks

pub mod basket;
pub mod diff;
pub mod errors;
pub mod executor;
pub mod harness;
pub mod invariants;
pub mod logging_facility;
pub mod model;
pub mod registry;
pub mod render;
pub mod runner;
pub mod snapshot;
pub mod source;

// Re-export commonly used types
pub use basket::{BasketLayout, BasketView};
pub use diff::{compute_diff, DiffEntry, SnapshotDiff};
pub use errors::{ExError, ExErrorKind, HarnessError, Result};
pub use executor::{CallSpec, CallerContext, ExecutorError, OperationExecutor, Receipt};
pub use harness::SnapshotHarness;
pub use invariants::{check_conservation, check_expectations, ConservationViolation, Expectation, ExpectationFailure};
pub use model::{Asset, Delta, Entity, MetricValue, SignedAmount};
pub use registry::{AssetRegistry, EntityRegistry};
pub use snapshot::{BalanceRecord, BalanceSnapshot};
pub use source::{BalanceSource, SourceError};

pub use alloy_primitives::{Address, U256};
