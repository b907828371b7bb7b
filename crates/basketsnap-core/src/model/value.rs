//! Metric values and signed deltas
//!
//! Balances are 256-bit unsigned integers, matching on-chain token
//! semantics. The difference of two such values needs 257 bits, so deltas
//! are kept as sign + magnitude rather than a fixed-width signed integer.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{HarnessError, Result};

/// Value of one snapshot cell
///
/// Balances read from a `BalanceSource` are always `Numeric`. `Opaque`
/// holds non-numeric metrics (addresses, flags) and is never subtracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MetricValue {
    Numeric(#[serde(with = "decimal_u256")] U256),
    Opaque(String),
}

impl MetricValue {
    /// The numeric value, if this cell holds one
    pub fn as_numeric(&self) -> Option<U256> {
        match self {
            MetricValue::Numeric(v) => Some(*v),
            MetricValue::Opaque(_) => None,
        }
    }
}

impl From<U256> for MetricValue {
    fn from(value: U256) -> Self {
        MetricValue::Numeric(value)
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Numeric(v) => write!(f, "{}", v),
            MetricValue::Opaque(s) => write!(f, "{}", s),
        }
    }
}

/// A signed 257-bit amount: sign plus `U256` magnitude
///
/// Zero is always non-negative, so `+0` and `-0` compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignedAmount {
    negative: bool,
    magnitude: U256,
}

impl SignedAmount {
    pub const ZERO: SignedAmount = SignedAmount {
        negative: false,
        magnitude: U256::ZERO,
    };

    pub fn increase(magnitude: U256) -> Self {
        Self {
            negative: false,
            magnitude,
        }
    }

    pub fn decrease(magnitude: U256) -> Self {
        Self {
            negative: !magnitude.is_zero(),
            magnitude,
        }
    }

    /// `after - before`, exact for every pair of `U256` values
    pub fn between(before: U256, after: U256) -> Self {
        match after.cmp(&before) {
            Ordering::Less => Self::decrease(before - after),
            _ => Self::increase(after - before),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.magnitude.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn is_positive(&self) -> bool {
        !self.negative && !self.magnitude.is_zero()
    }

    pub fn magnitude(&self) -> U256 {
        self.magnitude
    }

    /// Sum of two amounts, `None` when the magnitude overflows 256 bits
    pub fn checked_add(self, other: SignedAmount) -> Option<SignedAmount> {
        if self.negative == other.negative {
            let magnitude = self.magnitude.checked_add(other.magnitude)?;
            return Some(if self.negative {
                Self::decrease(magnitude)
            } else {
                Self::increase(magnitude)
            });
        }
        let (pos, neg) = if self.negative {
            (other.magnitude, self.magnitude)
        } else {
            (self.magnitude, other.magnitude)
        };
        Some(Self::between(neg, pos))
    }
}

impl Default for SignedAmount {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for SignedAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            write!(f, "0")
        } else if self.negative {
            write!(f, "-{}", self.magnitude)
        } else {
            write!(f, "+{}", self.magnitude)
        }
    }
}

impl FromStr for SignedAmount {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if let Some(rest) = trimmed.strip_prefix('-') {
            Ok(Self::decrease(parse_amount(rest)?))
        } else {
            let rest = trimmed.strip_prefix('+').unwrap_or(trimmed);
            Ok(Self::increase(parse_amount(rest)?))
        }
    }
}

impl Serialize for SignedAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SignedAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Per-metric change between two snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Delta {
    Numeric(SignedAmount),
    /// At least one side is not numeric
    NotComparable,
}

impl Delta {
    pub fn as_numeric(&self) -> Option<SignedAmount> {
        match self {
            Delta::Numeric(v) => Some(*v),
            Delta::NotComparable => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Delta::Numeric(v) if v.is_zero())
    }
}

impl fmt::Display for Delta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delta::Numeric(v) => write!(f, "{}", v),
            Delta::NotComparable => write!(f, "-"),
        }
    }
}

/// Parse a token amount literal
///
/// Accepts decimal (`100000000000000000000`), hex (`0x56bc75e2d63100000`),
/// underscore separators (`100_000`) and integer scientific notation
/// (`100e18`).
///
/// # Errors
///
/// Returns `InvalidInput` for empty, negative, malformed or >256-bit values.
pub fn parse_amount(raw: &str) -> Result<U256> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != '_').collect();
    if cleaned.is_empty() {
        return Err(HarnessError::InvalidInput {
            reason: "empty amount".to_string(),
        });
    }

    let invalid = |detail: String| HarnessError::InvalidInput {
        reason: format!("invalid amount `{}`: {}", raw, detail),
    };

    if !cleaned.starts_with("0x") {
        if let Some((mantissa, exponent)) = cleaned.split_once(['e', 'E']) {
            let mantissa: U256 = mantissa.parse().map_err(|e| invalid(format!("{}", e)))?;
            let exponent: u32 = exponent.parse().map_err(|e| invalid(format!("{}", e)))?;
            if mantissa.is_zero() {
                return Ok(U256::ZERO);
            }
            return U256::from(10u64)
                .checked_pow(U256::from(exponent))
                .and_then(|scale| mantissa.checked_mul(scale))
                .ok_or_else(|| invalid("exceeds 256 bits".to_string()));
        }
    }

    cleaned.parse::<U256>().map_err(|e| invalid(format!("{}", e)))
}

/// Parse a 20-byte hex address (with or without `0x`)
///
/// # Errors
///
/// Returns `InvalidInput` when the literal is not 40 hex digits.
pub fn parse_address(raw: &str) -> Result<Address> {
    raw.trim()
        .parse::<Address>()
        .map_err(|e| HarnessError::InvalidInput {
            reason: format!("invalid address `{}`: {}", raw, e),
        })
}

/// Serde adapter writing `U256` as a decimal string
pub mod decimal_u256 {
    use alloy_primitives::U256;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_amount(&raw).map_err(serde::de::Error::custom)
    }
}
