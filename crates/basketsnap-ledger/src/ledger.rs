//! Deterministic in-memory basket ledger
//!
//! Models ERC-20 balances and allowances plus a basket contract whose
//! address doubles as its share token. Mint and burn reproduce the
//! contract's observable balance effects and revert reasons; the pricing
//! curve is not modelled, so mint credits exactly the requested quantity.
//!
//! All state lives behind a `RefCell`, so one ledger can serve as balance
//! source, executor and basket view at the same time.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use alloy_primitives::{Address, U256};
use basketsnap_core::{
    BalanceSource, BasketView, CallSpec, CallerContext, ExecutorError, OperationExecutor, Receipt,
    SourceError,
};

pub const REVERT_PAUSED: &str = "Pausable: paused";
pub const REVERT_INPUT_NOT_ACCEPTED: &str = "input not accepted";
pub const REVERT_EXCEEDS_ALLOWANCE: &str = "ERC20: transfer amount exceeds allowance";
pub const REVERT_EXCEEDS_BALANCE: &str = "ERC20: transfer amount exceeds balance";
pub const REVERT_BURN_EXCEEDS_BALANCE: &str = "ERC20: burn amount exceeds balance";
pub const REVERT_MUL_OVERFLOW: &str = "SafeMath: multiplication overflow";
pub const REVERT_ADD_OVERFLOW: &str = "SafeMath: addition overflow";

/// Static configuration of the basket contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasketConfig {
    pub address: Address,
    pub governance: Address,
    pub manager: Address,
    pub pool_tokens: Vec<Address>,
    pub inputs: Vec<Address>,
    /// `symbol()` of every known token
    pub symbols: HashMap<Address, String>,
}

#[derive(Debug, Default)]
struct LedgerState {
    /// (token, owner) -> balance
    balances: HashMap<(Address, Address), U256>,
    /// (token, owner, spender) -> allowance
    allowances: HashMap<(Address, Address, Address), U256>,
    /// token -> totalSupply
    supplies: HashMap<Address, U256>,
    paused: bool,
    sequence: u64,
    failing_queries: HashSet<(Address, Address)>,
}

impl LedgerState {
    fn balance(&self, token: Address, owner: Address) -> U256 {
        self.balances
            .get(&(token, owner))
            .copied()
            .unwrap_or(U256::ZERO)
    }

    fn total_supply(&self, token: Address) -> U256 {
        self.supplies.get(&token).copied().unwrap_or(U256::ZERO)
    }

    fn credit(&mut self, token: Address, owner: Address, amount: U256) -> Result<(), ExecutorError> {
        let credited = self
            .balance(token, owner)
            .checked_add(amount)
            .ok_or_else(|| ExecutorError::reverted(REVERT_ADD_OVERFLOW))?;
        self.balances.insert((token, owner), credited);
        Ok(())
    }

    /// Create `amount` new units of `token`, growing its total supply
    fn issue(&mut self, token: Address, owner: Address, amount: U256) -> Result<(), ExecutorError> {
        let supply = self
            .total_supply(token)
            .checked_add(amount)
            .ok_or_else(|| ExecutorError::reverted(REVERT_ADD_OVERFLOW))?;
        self.credit(token, owner, amount)?;
        self.supplies.insert(token, supply);
        Ok(())
    }

    fn destroy(&mut self, token: Address, owner: Address, amount: U256) -> Result<(), ExecutorError> {
        self.debit(token, owner, amount, REVERT_BURN_EXCEEDS_BALANCE)?;
        let supply = self.total_supply(token).saturating_sub(amount);
        self.supplies.insert(token, supply);
        Ok(())
    }

    fn debit(&mut self, token: Address, owner: Address, amount: U256, reason: &str) -> Result<(), ExecutorError> {
        let held = self.balance(token, owner);
        let remaining = held
            .checked_sub(amount)
            .ok_or_else(|| ExecutorError::reverted(reason))?;
        self.balances.insert((token, owner), remaining);
        Ok(())
    }

    fn spend_allowance(&mut self, token: Address, owner: Address, spender: Address, amount: U256) -> Result<(), ExecutorError> {
        let allowed = self
            .allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or(U256::ZERO);
        // Infinite approval is never decremented.
        if allowed == U256::MAX {
            return Ok(());
        }
        let remaining = allowed
            .checked_sub(amount)
            .ok_or_else(|| ExecutorError::reverted(REVERT_EXCEEDS_ALLOWANCE))?;
        self.allowances.insert((token, owner, spender), remaining);
        Ok(())
    }
}

/// In-memory stand-in for a deployed basket and its tokens
#[derive(Debug)]
pub struct InMemoryLedger {
    config: BasketConfig,
    state: RefCell<LedgerState>,
}

impl InMemoryLedger {
    pub fn new(config: BasketConfig) -> Self {
        Self {
            config,
            state: RefCell::new(LedgerState::default()),
        }
    }

    pub fn config(&self) -> &BasketConfig {
        &self.config
    }

    /// Issue `amount` of `token` to `owner` out of thin air
    ///
    /// # Errors
    ///
    /// Reverts with `REVERT_ADD_OVERFLOW` when the token's total supply
    /// would exceed 256 bits; the ledger is left unchanged.
    pub fn mint_to(&self, token: Address, owner: Address, amount: U256) -> Result<(), ExecutorError> {
        self.state.borrow_mut().issue(token, owner, amount)
    }

    /// Set `owner`'s allowance of `token` for the basket
    pub fn approve(&self, token: Address, owner: Address, amount: U256) {
        self.state
            .borrow_mut()
            .allowances
            .insert((token, owner, self.config.address), amount);
    }

    pub fn set_paused(&self, paused: bool) {
        self.state.borrow_mut().paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.state.borrow().paused
    }

    /// Make every `read_balance(owner, asset)` call fail until cleared
    pub fn fail_balance_query(&self, owner: Address, asset: Address) {
        self.state.borrow_mut().failing_queries.insert((owner, asset));
    }

    pub fn clear_failures(&self) {
        self.state.borrow_mut().failing_queries.clear();
    }

    pub fn balance_of(&self, token: Address, owner: Address) -> U256 {
        self.state.borrow().balance(token, owner)
    }

    pub fn allowance(&self, token: Address, owner: Address) -> U256 {
        self.state
            .borrow()
            .allowances
            .get(&(token, owner, self.config.address))
            .copied()
            .unwrap_or(U256::ZERO)
    }

    pub fn total_supply(&self, token: Address) -> U256 {
        self.state.borrow().total_supply(token)
    }

    /// Number of calls executed successfully so far
    pub fn sequence(&self) -> u64 {
        self.state.borrow().sequence
    }

    fn mint(&self, state: &mut LedgerState, caller: Address, input: Address, amount: U256, quantity: U256) -> Result<(), ExecutorError> {
        if !self.config.inputs.contains(&input) {
            return Err(ExecutorError::reverted(REVERT_INPUT_NOT_ACCEPTED));
        }
        let basket = self.config.address;
        state.spend_allowance(input, caller, basket, amount)?;
        state.debit(input, caller, amount, REVERT_EXCEEDS_BALANCE)?;
        state.credit(input, basket, amount)?;
        state.issue(basket, caller, quantity)
    }

    fn burn(&self, state: &mut LedgerState, caller: Address, amount: U256) -> Result<(), ExecutorError> {
        let basket = self.config.address;
        let supply = state.total_supply(basket);
        if state.balance(basket, caller) < amount {
            return Err(ExecutorError::reverted(REVERT_BURN_EXCEEDS_BALANCE));
        }

        // Compute every payout before moving anything so a revert leaves no trace.
        let mut payouts = Vec::with_capacity(self.config.pool_tokens.len());
        if !supply.is_zero() {
            for token in &self.config.pool_tokens {
                let held = state.balance(*token, basket);
                let payout = held
                    .checked_mul(amount)
                    .ok_or_else(|| ExecutorError::reverted(REVERT_MUL_OVERFLOW))?
                    / supply;
                payouts.push((*token, payout));
            }
        }

        state.destroy(basket, caller, amount)?;
        for (token, payout) in payouts {
            state.debit(token, basket, payout, REVERT_EXCEEDS_BALANCE)?;
            state.credit(token, caller, payout)?;
        }
        Ok(())
    }
}

impl BalanceSource for InMemoryLedger {
    fn read_balance(&self, owner: Address, asset_contract: Address) -> Result<U256, SourceError> {
        let state = self.state.borrow();
        if state.failing_queries.contains(&(owner, asset_contract)) {
            return Err(SourceError::Network(format!(
                "injected failure for balanceOf({}) on {}",
                owner, asset_contract
            )));
        }
        Ok(state.balance(asset_contract, owner))
    }
}

impl OperationExecutor for InMemoryLedger {
    fn execute(&self, call: &CallSpec, caller: &CallerContext) -> Result<Receipt, ExecutorError> {
        let mut state = self.state.borrow_mut();
        if state.paused {
            return Err(ExecutorError::reverted(REVERT_PAUSED));
        }

        // Work on a copy so a revert rolls back every partial transfer.
        let mut draft = LedgerState {
            balances: state.balances.clone(),
            allowances: state.allowances.clone(),
            supplies: state.supplies.clone(),
            paused: state.paused,
            sequence: state.sequence,
            failing_queries: HashSet::new(),
        };

        match call {
            CallSpec::Mint {
                input_asset,
                amount,
                min_quantity,
            } => self.mint(&mut draft, caller.account, *input_asset, *amount, *min_quantity)?,
            CallSpec::Burn { amount } => self.burn(&mut draft, caller.account, *amount)?,
        }

        state.balances = draft.balances;
        state.allowances = draft.allowances;
        state.supplies = draft.supplies;
        state.sequence += 1;

        tracing::debug!(call = %call, caller = %caller, sequence = state.sequence, "call executed");

        Ok(Receipt {
            call: call.clone(),
            caller: caller.account,
            sequence: state.sequence,
        })
    }
}

impl BasketView for InMemoryLedger {
    fn basket_address(&self) -> Address {
        self.config.address
    }

    fn governance(&self) -> Result<Address, SourceError> {
        Ok(self.config.governance)
    }

    fn manager(&self) -> Result<Address, SourceError> {
        Ok(self.config.manager)
    }

    fn pool_tokens(&self) -> Result<Vec<Address>, SourceError> {
        Ok(self.config.pool_tokens.clone())
    }

    fn inputs(&self) -> Result<Vec<Address>, SourceError> {
        Ok(self.config.inputs.clone())
    }

    fn symbol(&self, token: Address) -> Result<String, SourceError> {
        self.config
            .symbols
            .get(&token)
            .cloned()
            .ok_or_else(|| SourceError::ContractQuery(format!("symbol() reverted on {}", token)))
    }
}
