//! Basket introspection and default registry layout
//!
//! A basket exposes its own configuration (governance, manager, pool tokens,
//! accepted inputs). `BasketLayout::discover` reads it once and seeds the
//! registries in a fixed order:
//!
//! - entities: basket, governance, manager
//! - assets: basket share token, pool tokens, inputs
//!
//! End-user accounts such as `randomUser` are not part of the layout;
//! register them after discovery (the scenario loader does so from its
//! `entities` list).

use alloy_primitives::Address;

use crate::errors::{HarnessError, Result};
use crate::executor::OperationExecutor;
use crate::harness::SnapshotHarness;
use crate::model::Asset;
use crate::source::{BalanceSource, SourceError};

pub const DEFAULT_BASKET_NAME: &str = "quad";
pub const DEFAULT_SHARE_NAME: &str = "QUAD_LP";
pub const GOVERNANCE_NAME: &str = "governance";
pub const MANAGER_NAME: &str = "manager";

/// Read-only view of a basket contract's configuration
pub trait BasketView {
    /// Address of the basket, which is also its share token
    fn basket_address(&self) -> Address;
    fn governance(&self) -> std::result::Result<Address, SourceError>;
    fn manager(&self) -> std::result::Result<Address, SourceError>;
    /// Underlying pool tokens, in index order
    fn pool_tokens(&self) -> std::result::Result<Vec<Address>, SourceError>;
    /// Accepted mint inputs, in index order
    fn inputs(&self) -> std::result::Result<Vec<Address>, SourceError>;
    /// Token symbol used as the asset name
    fn symbol(&self, token: Address) -> std::result::Result<String, SourceError>;
}

impl<T: BasketView + ?Sized> BasketView for &T {
    fn basket_address(&self) -> Address {
        (**self).basket_address()
    }
    fn governance(&self) -> std::result::Result<Address, SourceError> {
        (**self).governance()
    }
    fn manager(&self) -> std::result::Result<Address, SourceError> {
        (**self).manager()
    }
    fn pool_tokens(&self) -> std::result::Result<Vec<Address>, SourceError> {
        (**self).pool_tokens()
    }
    fn inputs(&self) -> std::result::Result<Vec<Address>, SourceError> {
        (**self).inputs()
    }
    fn symbol(&self, token: Address) -> std::result::Result<String, SourceError> {
        (**self).symbol(token)
    }
}

fn introspect<T>(field: &str, result: std::result::Result<T, SourceError>) -> Result<T> {
    result.map_err(|source| HarnessError::Introspection {
        field: field.to_string(),
        source,
    })
}

/// The participants and tokens of one basket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasketLayout {
    pub basket_name: String,
    pub share_name: String,
    pub basket: Address,
    pub governance: Address,
    pub manager: Address,
    pub pool_tokens: Vec<Asset>,
    pub inputs: Vec<Asset>,
}

impl BasketLayout {
    /// Read the basket configuration through `view`
    ///
    /// # Errors
    ///
    /// Returns `Introspection` naming the field whose query failed.
    pub fn discover(view: &impl BasketView) -> Result<Self> {
        let named = |field: &str, tokens: Vec<Address>| -> Result<Vec<Asset>> {
            tokens
                .into_iter()
                .map(|token| -> Result<Asset> {
                    Ok(Asset::new(introspect(field, view.symbol(token))?, token))
                })
                .collect()
        };

        let pool_tokens = named("pool token symbol", introspect("pool_tokens", view.pool_tokens())?)?;
        let inputs = named("input symbol", introspect("inputs", view.inputs())?)?;

        Ok(Self {
            basket_name: DEFAULT_BASKET_NAME.to_string(),
            share_name: DEFAULT_SHARE_NAME.to_string(),
            basket: view.basket_address(),
            governance: introspect("governance", view.governance())?,
            manager: introspect("manager", view.manager())?,
            pool_tokens,
            inputs,
        })
    }

    /// Override the registry names of the basket and its share token
    pub fn with_names(mut self, basket_name: impl Into<String>, share_name: impl Into<String>) -> Self {
        self.basket_name = basket_name.into();
        self.share_name = share_name.into();
        self
    }

    /// Input token by asset name
    pub fn input(&self, name: &str) -> Option<Address> {
        self.inputs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.contract_address)
    }

    /// Register the basket's entities and assets on `harness`
    pub fn register_into<S, X>(&self, harness: &mut SnapshotHarness<S, X>)
    where
        S: BalanceSource,
        X: OperationExecutor,
    {
        harness.register_entity(&self.basket_name, self.basket);
        harness.register_entity(GOVERNANCE_NAME, self.governance);
        harness.register_entity(MANAGER_NAME, self.manager);

        harness.register_asset(&self.share_name, self.basket);
        for asset in self.pool_tokens.iter().chain(&self.inputs) {
            harness.register_asset(&asset.name, asset.contract_address);
        }
    }
}

impl<S: BalanceSource, X: OperationExecutor> SnapshotHarness<S, X> {
    /// Harness pre-seeded with the default layout of the basket behind `view`
    ///
    /// # Errors
    ///
    /// Returns `Introspection` when the basket configuration cannot be read.
    pub fn for_basket(source: S, executor: X, view: &impl BasketView) -> Result<Self> {
        let layout = BasketLayout::discover(view)?;
        let mut harness = Self::new(source, executor);
        layout.register_into(&mut harness);
        Ok(harness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::{CallSpec, CallerContext, ExecutorError, Receipt};
    use alloy_primitives::U256;

    struct FixedBasket {
        fail_inputs: bool,
    }

    fn token(byte: u8) -> Address {
        Address::with_last_byte(byte)
    }

    impl BasketView for FixedBasket {
        fn basket_address(&self) -> Address {
            token(0xaa)
        }
        fn governance(&self) -> std::result::Result<Address, SourceError> {
            Ok(token(0xb0))
        }
        fn manager(&self) -> std::result::Result<Address, SourceError> {
            Ok(token(0xb1))
        }
        fn pool_tokens(&self) -> std::result::Result<Vec<Address>, SourceError> {
            Ok(vec![token(1), token(2)])
        }
        fn inputs(&self) -> std::result::Result<Vec<Address>, SourceError> {
            if self.fail_inputs {
                Err(SourceError::Network("node offline".into()))
            } else {
                Ok(vec![token(0x10)])
            }
        }
        fn symbol(&self, token: Address) -> std::result::Result<String, SourceError> {
            Ok(match token[19] {
                1 => "JOE",
                2 => "PNG",
                0x10 => "DAI",
                _ => "UNKNOWN",
            }
            .to_string())
        }
    }

    struct Noop;

    impl BalanceSource for Noop {
        fn read_balance(&self, _: Address, _: Address) -> std::result::Result<U256, SourceError> {
            Ok(U256::ZERO)
        }
    }

    impl OperationExecutor for Noop {
        fn execute(
            &self,
            _: &CallSpec,
            _: &CallerContext,
        ) -> std::result::Result<Receipt, ExecutorError> {
            Err(ExecutorError::reverted("noop"))
        }
    }

    #[test]
    fn test_for_basket_seeds_default_order() {
        let harness = SnapshotHarness::for_basket(Noop, Noop, &FixedBasket { fail_inputs: false }).unwrap();

        let entities: Vec<String> = harness.entities().all().into_iter().map(|e| e.name).collect();
        assert_eq!(entities, vec!["quad", "governance", "manager"]);

        let assets: Vec<String> = harness.assets().all().into_iter().map(|a| a.name).collect();
        assert_eq!(assets, vec!["QUAD_LP", "JOE", "PNG", "DAI"]);
        assert_eq!(harness.assets().get("QUAD_LP"), Some(token(0xaa)));
    }

    #[test]
    fn test_discover_names_failing_field() {
        let err = BasketLayout::discover(&FixedBasket { fail_inputs: true }).unwrap_err();
        match err {
            HarnessError::Introspection { field, .. } => assert_eq!(field, "inputs"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_layout_input_lookup_and_renaming() {
        let layout = BasketLayout::discover(&FixedBasket { fail_inputs: false })
            .unwrap()
            .with_names("basket", "BSK");
        assert_eq!(layout.input("DAI"), Some(token(0x10)));
        assert_eq!(layout.input("JOE"), None);
        assert_eq!(layout.share_name, "BSK");
    }
}
