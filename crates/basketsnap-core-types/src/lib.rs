//! Core types shared across basketsnap facilities
//!
//! This crate provides the small set of types used by both the error
//! and logging facilities:
//!
//! - **Correlation types**: RunId, OperationId
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::{OperationId, RunId};
