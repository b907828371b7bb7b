//! Balance snapshots
//!
//! A snapshot is the full entities × assets balance grid observed at one
//! point in logical time. Records are ordered entities-outer, assets-inner,
//! both in registration order.

pub mod capture;
pub mod model;

pub use capture::capture;
pub use model::{BalanceRecord, BalanceSnapshot};
