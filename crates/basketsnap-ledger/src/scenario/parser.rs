//! Scenario parser with validation
//!
//! Parses YAML, validates the schema version, name uniqueness, references
//! and every amount/address literal, and resolves names into addresses.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use alloy_primitives::{Address, U256};
use basketsnap_core::basket::{DEFAULT_BASKET_NAME, DEFAULT_SHARE_NAME, GOVERNANCE_NAME, MANAGER_NAME};
use basketsnap_core::model::{parse_address, parse_amount};
use basketsnap_core::{CallSpec, CallerContext, Entity, Expectation, HarnessError, Result, SignedAmount};

use crate::ledger::{BasketConfig, InMemoryLedger};
use crate::scenario::format_v0::{ScenarioCall, ScenarioV0};

fn invalid(reason: impl Into<String>) -> HarnessError {
    HarnessError::InvalidScenario {
        reason: reason.into(),
    }
}

/// Genesis balance or allowance, resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenesisAmount {
    pub token: Address,
    pub owner: Address,
    pub amount: U256,
}

/// An operation with every name resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOperation {
    pub name: String,
    pub caller: CallerContext,
    pub call: CallSpec,
    pub expectations: Vec<Expectation>,
    pub expect_revert: Option<String>,
    pub conserve: Vec<String>,
}

/// A validated scenario
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub name: String,
    pub basket_name: String,
    pub share_name: String,
    pub basket: BasketConfig,
    pub paused: bool,
    /// Entities beyond basket, governance and manager, in file order
    pub entities: Vec<Entity>,
    pub balances: Vec<GenesisAmount>,
    pub allowances: Vec<GenesisAmount>,
    pub operations: Vec<ResolvedOperation>,
}

impl Scenario {
    /// Fresh ledger holding the scenario's genesis state
    ///
    /// # Errors
    ///
    /// Returns `InvalidScenario` if the genesis balances of one token
    /// overflow its total supply.
    pub fn build_ledger(&self) -> Result<InMemoryLedger> {
        let ledger = InMemoryLedger::new(self.basket.clone());
        for (i, b) in self.balances.iter().enumerate() {
            ledger
                .mint_to(b.token, b.owner, b.amount)
                .map_err(|e| invalid(format!("balances[{}]: {}", i, e.reason())))?;
        }
        for a in &self.allowances {
            ledger.approve(a.token, a.owner, a.amount);
        }
        ledger.set_paused(self.paused);
        Ok(ledger)
    }
}

/// Parse a scenario file from a path
///
/// # Errors
///
/// Returns `InvalidScenario` when the file cannot be read or fails validation.
pub fn parse_scenario_file(path: &Path) -> Result<Scenario> {
    let content = fs::read_to_string(path)
        .map_err(|e| invalid(format!("failed to read scenario file {}: {}", path.display(), e)))?;
    parse_scenario_str(&content)
}

/// Parse a scenario from a string
///
/// # Errors
///
/// Returns `InvalidScenario` for malformed YAML, an unsupported schema
/// version, duplicate or unknown names, and unparseable literals.
pub fn parse_scenario_str(content: &str) -> Result<Scenario> {
    let raw: ScenarioV0 =
        serde_yaml::from_str(content).map_err(|e| invalid(format!("YAML parse error: {}", e)))?;
    resolve(&raw)
}

/// Unique-name lookup table for entities or assets
struct Names {
    kind: &'static str,
    by_name: HashMap<String, Address>,
}

impl Names {
    fn new(kind: &'static str) -> Self {
        Self {
            kind,
            by_name: HashMap::new(),
        }
    }

    fn insert(&mut self, name: &str, address: Address) -> Result<()> {
        if name.trim().is_empty() {
            return Err(invalid(format!("empty {} name", self.kind)));
        }
        if self.by_name.insert(name.to_string(), address).is_some() {
            return Err(invalid(format!("duplicate {} name: {}", self.kind, name)));
        }
        Ok(())
    }

    fn get(&self, name: &str, context: &str) -> Result<Address> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| invalid(format!("{} references unknown {}: {}", context, self.kind, name)))
    }
}

fn address(raw: &str, context: &str) -> Result<Address> {
    parse_address(raw).map_err(|e| invalid(format!("{}: {}", context, e)))
}

fn amount(raw: &str, context: &str) -> Result<U256> {
    parse_amount(raw).map_err(|e| invalid(format!("{}: {}", context, e)))
}

fn resolve(raw: &ScenarioV0) -> Result<Scenario> {
    if raw.schema_version != 0 {
        return Err(invalid(format!(
            "unsupported schema_version: {}. Expected 0",
            raw.schema_version
        )));
    }

    let basket_name = raw
        .basket
        .name
        .clone()
        .unwrap_or_else(|| DEFAULT_BASKET_NAME.to_string());
    let share_name = raw
        .basket
        .share_name
        .clone()
        .unwrap_or_else(|| DEFAULT_SHARE_NAME.to_string());

    let basket_address = address(&raw.basket.address, "basket.address")?;
    let governance = address(&raw.basket.governance, "basket.governance")?;
    let manager = address(&raw.basket.manager, "basket.manager")?;

    let mut entities = Names::new("entity");
    entities.insert(&basket_name, basket_address)?;
    entities.insert(GOVERNANCE_NAME, governance)?;
    entities.insert(MANAGER_NAME, manager)?;

    let mut extra_entities = Vec::with_capacity(raw.entities.len());
    for entity in &raw.entities {
        let addr = address(&entity.address, &format!("entity {}", entity.name))?;
        entities.insert(&entity.name, addr)?;
        extra_entities.push(Entity::new(&entity.name, addr));
    }

    let mut assets = Names::new("asset");
    assets.insert(&share_name, basket_address)?;
    let mut symbols = HashMap::new();
    symbols.insert(basket_address, share_name.clone());

    let mut tokens = |list: &[crate::scenario::format_v0::ScenarioToken], field: &str| -> Result<Vec<Address>> {
        let mut out = Vec::with_capacity(list.len());
        for token in list {
            let addr = address(&token.address, &format!("{} {}", field, token.symbol))?;
            assets.insert(&token.symbol, addr)?;
            if let Some(existing) = symbols.insert(addr, token.symbol.clone()) {
                return Err(invalid(format!(
                    "{} {} shares contract address {} with asset {}",
                    field, token.symbol, addr, existing
                )));
            }
            out.push(addr);
        }
        Ok(out)
    };
    let pool_tokens = tokens(&raw.basket.pool_tokens, "pool token")?;
    let inputs = tokens(&raw.basket.inputs, "input")?;

    let mut balances = Vec::with_capacity(raw.balances.len());
    let mut supplies: HashMap<Address, U256> = HashMap::new();
    for (i, b) in raw.balances.iter().enumerate() {
        let context = format!("balances[{}]", i);
        let genesis = GenesisAmount {
            token: assets.get(&b.asset, &context)?,
            owner: entities.get(&b.holder, &context)?,
            amount: amount(&b.amount, &context)?,
        };
        let supply = supplies.entry(genesis.token).or_insert(U256::ZERO);
        *supply = supply.checked_add(genesis.amount).ok_or_else(|| {
            invalid(format!("{}: total {} supply exceeds 256 bits", context, b.asset))
        })?;
        balances.push(genesis);
    }

    let mut allowances = Vec::with_capacity(raw.allowances.len());
    for (i, a) in raw.allowances.iter().enumerate() {
        let context = format!("allowances[{}]", i);
        allowances.push(GenesisAmount {
            token: assets.get(&a.asset, &context)?,
            owner: entities.get(&a.owner, &context)?,
            amount: amount(&a.amount, &context)?,
        });
    }

    let mut operations = Vec::with_capacity(raw.operations.len());
    for (i, op) in raw.operations.iter().enumerate() {
        let context = format!("operation {} ({})", i, op.name);

        let caller = CallerContext::new(entities.get(&op.caller, &context)?).with_label(&op.caller);
        let call = match &op.call {
            ScenarioCall::Mint {
                input,
                amount: raw_amount,
                min_quantity,
            } => CallSpec::Mint {
                input_asset: assets.get(input, &context)?,
                amount: amount(raw_amount, &context)?,
                min_quantity: amount(min_quantity, &context)?,
            },
            ScenarioCall::Burn { amount: raw_amount } => CallSpec::Burn {
                amount: amount(raw_amount, &context)?,
            },
        };

        let mut expectations = Vec::with_capacity(op.expect.len());
        for e in &op.expect {
            entities.get(&e.entity, &context)?;
            assets.get(&e.asset, &context)?;
            let delta: SignedAmount = e
                .delta
                .parse()
                .map_err(|err| invalid(format!("{}: {}", context, err)))?;
            expectations.push(Expectation::new(&e.entity, &e.asset, delta));
        }

        for asset in &op.conserve {
            assets.get(asset, &context)?;
        }

        if op.expect_revert.is_some() && !op.expect.is_empty() {
            return Err(invalid(format!(
                "{}: expect and expect_revert are mutually exclusive",
                context
            )));
        }

        operations.push(ResolvedOperation {
            name: op.name.clone(),
            caller,
            call,
            expectations,
            expect_revert: op.expect_revert.clone(),
            conserve: op.conserve.clone(),
        });
    }

    Ok(Scenario {
        name: raw.name.clone(),
        basket_name,
        share_name,
        basket: BasketConfig {
            address: basket_address,
            governance,
            manager,
            pool_tokens,
            inputs,
            symbols,
        },
        paused: raw.basket.paused,
        entities: extra_entities,
        balances,
        allowances,
        operations,
    })
}
