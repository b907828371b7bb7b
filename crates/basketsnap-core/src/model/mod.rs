//! Domain model for balance tracking
//!
//! - `Entity` / `Asset`: named participants and tracked tokens
//! - `MetricValue`: tagged value of one snapshot cell
//! - `SignedAmount` / `Delta`: signed change between two cells

pub mod participant;
pub mod value;

pub use participant::{Asset, Entity};
pub use value::{parse_address, parse_amount, Delta, MetricValue, SignedAmount};
