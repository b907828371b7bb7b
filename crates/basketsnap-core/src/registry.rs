//! Ordered name → address registries
//!
//! Both registries use overwrite semantics: registering an existing name
//! rebinds its address in place and never moves it in iteration order.
//! Iteration order is first-insertion order and defines the snapshot
//! cross-product order.

use std::collections::HashMap;

use alloy_primitives::Address;

use crate::model::{Asset, Entity};

/// Insertion-ordered bindings shared by both registries
#[derive(Debug, Clone, Default)]
struct OrderedBindings {
    order: Vec<String>,
    addresses: HashMap<String, Address>,
}

impl OrderedBindings {
    /// Bind `name`, returning the previous address if it was already bound
    fn bind(&mut self, name: String, address: Address) -> Option<Address> {
        match self.addresses.insert(name.clone(), address) {
            Some(previous) => Some(previous),
            None => {
                self.order.push(name);
                None
            }
        }
    }

    fn get(&self, name: &str) -> Option<Address> {
        self.addresses.get(name).copied()
    }

    fn iter(&self) -> impl Iterator<Item = (&str, Address)> + '_ {
        self.order
            .iter()
            .filter_map(|name| self.addresses.get(name).map(|a| (name.as_str(), *a)))
    }

    fn len(&self) -> usize {
        self.order.len()
    }
}

/// Participants tracked across snapshots
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    bindings: OrderedBindings,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or rebind an entity
    ///
    /// Returns the previously bound address when `name` was already registered.
    pub fn register(&mut self, name: impl Into<String>, address: Address) -> Option<Address> {
        self.bindings.bind(name.into(), address)
    }

    /// All entities in first-insertion order
    pub fn all(&self) -> Vec<Entity> {
        self.bindings
            .iter()
            .map(|(name, address)| Entity::new(name, address))
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<Address> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.len() == 0
    }
}

/// Tokens tracked across snapshots
#[derive(Debug, Clone, Default)]
pub struct AssetRegistry {
    bindings: OrderedBindings,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or rebind an asset
    ///
    /// Returns the previously bound contract address when `name` was already registered.
    pub fn register(&mut self, name: impl Into<String>, contract_address: Address) -> Option<Address> {
        self.bindings.bind(name.into(), contract_address)
    }

    /// All assets in first-insertion order
    pub fn all(&self) -> Vec<Asset> {
        self.bindings
            .iter()
            .map(|(name, address)| Asset::new(name, address))
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<Address> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.len() == 0
    }
}
