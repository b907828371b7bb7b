//! Scenario Format v0 schema
//!
//! Amounts are strings so 256-bit values survive YAML: decimal, `0x` hex,
//! `_` separators and integer exponents (`100e18`) are accepted.
//!
//! ```yaml
//! schema_version: 0
//! name: mint flow
//! basket:
//!   address: "0x5a5f9e3c3f7a3f4c4e3c0f6b1c8d2e4f6a8b0c2d"
//!   governance: "0x..."
//!   manager: "0x..."
//!   pool_tokens:
//!     - { symbol: JOE, address: "0x..." }
//!   inputs:
//!     - { symbol: DAI, address: "0x..." }
//! entities:
//!   - { name: randomUser, address: "0x..." }
//! balances:
//!   - { holder: randomUser, asset: DAI, amount: "1000e18" }
//! allowances:
//!   - { owner: randomUser, asset: DAI, amount: "100e18" }
//! operations:
//!   - name: mint 100 DAI
//!     caller: randomUser
//!     call: { method: mint, input: DAI, amount: "100e18", min_quantity: "25e18" }
//!     expect:
//!       - { entity: randomUser, asset: DAI, delta: "-100e18" }
//! ```

use serde::{Deserialize, Serialize};

/// Top-level scenario file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioV0 {
    /// Schema version (must be 0 for this format)
    pub schema_version: u32,

    pub name: String,

    pub basket: ScenarioBasket,

    /// Participants tracked in addition to the basket's own roles
    #[serde(default)]
    pub entities: Vec<ScenarioEntity>,

    /// Genesis token balances
    #[serde(default)]
    pub balances: Vec<ScenarioBalance>,

    /// Genesis allowances granted to the basket
    #[serde(default)]
    pub allowances: Vec<ScenarioAllowance>,

    /// Operations, executed in order
    #[serde(default)]
    pub operations: Vec<ScenarioOperation>,
}

/// Basket contract description
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioBasket {
    /// Registry name of the basket entity (default `quad`)
    #[serde(default)]
    pub name: Option<String>,

    /// Registry name of the share token asset (default `QUAD_LP`)
    #[serde(default)]
    pub share_name: Option<String>,

    pub address: String,
    pub governance: String,
    pub manager: String,

    #[serde(default)]
    pub paused: bool,

    pub pool_tokens: Vec<ScenarioToken>,
    pub inputs: Vec<ScenarioToken>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioToken {
    pub symbol: String,
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioEntity {
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioBalance {
    /// Entity name
    pub holder: String,
    /// Asset name
    pub asset: String,
    pub amount: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioAllowance {
    /// Entity name
    pub owner: String,
    /// Asset name
    pub asset: String,
    pub amount: String,
}

/// One bracketed call
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioOperation {
    pub name: String,

    /// Entity name of the invoking account
    pub caller: String,

    pub call: ScenarioCall,

    /// Expected per-metric deltas, checked only when the call succeeds
    #[serde(default)]
    pub expect: Vec<ScenarioExpectation>,

    /// Revert reason the call must fail with
    #[serde(default)]
    pub expect_revert: Option<String>,

    /// Assets whose value must be conserved among tracked entities
    #[serde(default)]
    pub conserve: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum ScenarioCall {
    Mint {
        /// Input asset name
        input: String,
        amount: String,
        min_quantity: String,
    },
    Burn {
        amount: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioExpectation {
    pub entity: String,
    pub asset: String,
    /// Signed amount, e.g. `-100e18` or `+25e18`
    pub delta: String,
}
