//! Snapshot diff engine.
//!
//! Compares two balance snapshots of identical shape and produces a per-metric
//! delta, aligned with the input order.
//!
//! ## Entry point
//!
//! ```ignore
//! use basketsnap_core::diff::compute_diff;
//!
//! let diff = compute_diff(&before, &after)?;
//! ```
//!
//! ## Guarantees
//!
//! - **Shape check first**: snapshots from different registrations fail with
//!   `ShapeMismatch`; no partial or misaligned diff is ever returned.
//! - **Type-aware**: a metric whose value is not numeric on either side yields
//!   `Delta::NotComparable`; diffing never fails on a single metric's type.
//! - **Order-preserving**: entries follow the snapshot order.

pub mod engine;
pub mod model;

pub use engine::{compute_diff, delta_between};
pub use model::{DiffEntry, SnapshotDiff};
