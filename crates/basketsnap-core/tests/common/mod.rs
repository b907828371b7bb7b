use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use basketsnap_core::{
    Address, BalanceSource, CallSpec, CallerContext, ExecutorError, OperationExecutor, Receipt,
    SnapshotHarness, SourceError, U256,
};

#[allow(dead_code)]
pub const E18: u128 = 1_000_000_000_000_000_000;

#[allow(dead_code)]
pub fn addr(byte: u8) -> Address {
    Address::with_last_byte(byte)
}

#[allow(dead_code)]
pub fn tokens(amount: u128) -> U256 {
    U256::from(amount) * U256::from(E18)
}

#[allow(dead_code)]
pub mod accounts {
    use super::*;

    pub fn quad() -> Address {
        addr(0xaa)
    }
    pub fn governance() -> Address {
        addr(0xb0)
    }
    pub fn manager() -> Address {
        addr(0xb1)
    }
    pub fn random_user() -> Address {
        addr(0xc0)
    }
    pub fn dai() -> Address {
        addr(0x11)
    }
    pub fn usdc() -> Address {
        addr(0x12)
    }
}

/// Minimal basket ledger: mint pulls the input and credits shares 1:1 with
/// the requested quantity, burn destroys shares.
#[allow(dead_code)]
#[derive(Default)]
pub struct MockLedger {
    balances: RefCell<HashMap<(Address, Address), U256>>,
    paused: Cell<bool>,
    sequence: Cell<u64>,
    failing: RefCell<Option<(Address, Address)>>,
    queries: Cell<usize>,
}

#[allow(dead_code)]
impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_balance(&self, owner: Address, token: Address, amount: U256) {
        self.balances.borrow_mut().insert((owner, token), amount);
    }

    pub fn balance(&self, owner: Address, token: Address) -> U256 {
        self.balances
            .borrow()
            .get(&(owner, token))
            .copied()
            .unwrap_or(U256::ZERO)
    }

    pub fn pause(&self) {
        self.paused.set(true);
    }

    pub fn fail_on(&self, owner: Address, token: Address) {
        *self.failing.borrow_mut() = Some((owner, token));
    }

    pub fn query_count(&self) -> usize {
        self.queries.get()
    }

    fn debit(&self, owner: Address, token: Address, amount: U256) -> Result<(), ExecutorError> {
        let held = self.balance(owner, token);
        let remaining = held
            .checked_sub(amount)
            .ok_or_else(|| ExecutorError::reverted("ERC20: transfer amount exceeds balance"))?;
        self.set_balance(owner, token, remaining);
        Ok(())
    }

    fn credit(&self, owner: Address, token: Address, amount: U256) {
        let held = self.balance(owner, token);
        self.set_balance(owner, token, held + amount);
    }
}

impl BalanceSource for MockLedger {
    fn read_balance(&self, owner: Address, asset_contract: Address) -> Result<U256, SourceError> {
        self.queries.set(self.queries.get() + 1);
        if *self.failing.borrow() == Some((owner, asset_contract)) {
            return Err(SourceError::Network("connection refused".to_string()));
        }
        Ok(self.balance(owner, asset_contract))
    }
}

impl OperationExecutor for MockLedger {
    fn execute(&self, call: &CallSpec, caller: &CallerContext) -> Result<Receipt, ExecutorError> {
        if self.paused.get() {
            return Err(ExecutorError::reverted("Pausable: paused"));
        }
        let basket = accounts::quad();
        match call {
            CallSpec::Mint {
                input_asset,
                amount,
                min_quantity,
            } => {
                self.debit(caller.account, *input_asset, *amount)?;
                self.credit(basket, *input_asset, *amount);
                self.credit(caller.account, basket, *min_quantity);
            }
            CallSpec::Burn { amount } => {
                self.debit(caller.account, basket, *amount)?;
            }
        }
        self.sequence.set(self.sequence.get() + 1);
        Ok(Receipt {
            call: call.clone(),
            caller: caller.account,
            sequence: self.sequence.get(),
        })
    }
}

/// Harness over `ledger` with the default quad layout plus `randomUser`
#[allow(dead_code)]
pub fn quad_harness(ledger: &MockLedger) -> SnapshotHarness<&MockLedger, &MockLedger> {
    let mut harness = SnapshotHarness::new(ledger, ledger);
    harness.register_entity("quad", accounts::quad());
    harness.register_entity("governance", accounts::governance());
    harness.register_entity("manager", accounts::manager());
    harness.register_entity("randomUser", accounts::random_user());
    harness.register_asset("QUAD_LP", accounts::quad());
    harness.register_asset("DAI", accounts::dai());
    harness.register_asset("USDC", accounts::usdc());
    harness
}
