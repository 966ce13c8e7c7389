//! Contract registry implementation
//!
//! Maps an address-like key to a textual description. Mutation is gated by a
//! whitelist that only the owner can extend.

use crate::errors::*;
use crate::types::*;
use contract_manager_types::Address;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// Whitelist and registry slots guarded together so that every call checks
/// and mutates under one write guard.
#[derive(Debug, Default)]
pub(crate) struct RegistryState {
    pub(crate) whitelist: HashSet<Address>,
    /// A key is present iff it maps to a non-empty description.
    pub(crate) contracts: HashMap<Address, String>,
}

/// Access-controlled contract registry
///
/// The owner is fixed at construction. Registry mutation is authorized by
/// whitelist membership alone; the owner is not implicitly whitelisted.
#[derive(Debug)]
pub struct ContractManager {
    owner: Address,
    state: RwLock<RegistryState>,
}

impl ContractManager {
    /// Deploy a new registry owned by `deployer`
    pub fn new(deployer: Address) -> Self {
        info!("Contract manager deployed, owner {}", deployer);
        Self::with_state(deployer, RegistryState::default())
    }

    pub(crate) fn with_state(owner: Address, state: RegistryState) -> Self {
        Self {
            owner,
            state: RwLock::new(state),
        }
    }

    /// Owner set at construction
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Add `address` to the whitelist. Owner only.
    ///
    /// Returns `true` if the address was not already whitelisted.
    pub fn add_address_to_whitelist(&self, ctx: &CallContext, address: Address) -> Result<bool> {
        if ctx.caller != self.owner {
            return Err(reject(ctx, "addAddressToWhiteList", unauthorized(REASON_NOT_OWNER)));
        }

        let inserted = self.state.write().whitelist.insert(address);
        if inserted {
            info!("Whitelisted {}", address);
        } else {
            debug!("{} already whitelisted", address);
        }
        Ok(inserted)
    }

    /// Whether `address` may mutate the registry
    pub fn is_whitelisted(&self, address: &Address) -> bool {
        self.state.read().whitelist.contains(address)
    }

    /// Whitelisted addresses, sorted
    pub fn whitelist(&self) -> Vec<Address> {
        let mut list: Vec<Address> = self.state.read().whitelist.iter().copied().collect();
        list.sort();
        list
    }

    /// Set the description for `key`, overwriting any previous one.
    pub fn add_contract(
        &self,
        ctx: &CallContext,
        key: Address,
        description: impl Into<String>,
    ) -> Result<()> {
        let mut state = self.state.write();
        if !state.whitelist.contains(&ctx.caller) {
            return Err(reject(ctx, "addContract", unauthorized(REASON_CANT_ADD)));
        }

        let description = description.into();
        if description.is_empty() {
            // Empty means absent: the slot reads back as cleared.
            state.contracts.remove(&key);
        } else {
            state.contracts.insert(key, description);
        }
        info!("Contract {} added by {}", key, ctx.caller);
        Ok(())
    }

    /// Replace the description of an existing entry.
    ///
    /// Authorization is checked before existence, so a non-whitelisted caller
    /// learns nothing about the slot.
    pub fn update_contract_desc(
        &self,
        ctx: &CallContext,
        key: Address,
        description: impl Into<String>,
    ) -> Result<()> {
        let mut state = self.state.write();
        if !state.whitelist.contains(&ctx.caller) {
            return Err(reject(ctx, "updateContractDesc", unauthorized(REASON_CANT_UPDATE)));
        }
        if !state.contracts.contains_key(&key) {
            return Err(reject(ctx, "updateContractDesc", not_found(REASON_NOT_EXIST)));
        }

        let description = description.into();
        if description.is_empty() {
            state.contracts.remove(&key);
        } else {
            state.contracts.insert(key, description);
        }
        info!("Contract {} updated by {}", key, ctx.caller);
        Ok(())
    }

    /// Clear the entry for `key`. Clearing an absent key is a no-op.
    pub fn remove_contract(&self, ctx: &CallContext, key: Address) -> Result<()> {
        let mut state = self.state.write();
        if !state.whitelist.contains(&ctx.caller) {
            return Err(reject(ctx, "removeContract", unauthorized(REASON_CANT_REMOVE)));
        }

        if state.contracts.remove(&key).is_some() {
            info!("Contract {} removed by {}", key, ctx.caller);
        } else {
            debug!("Contract {} already absent", key);
        }
        Ok(())
    }

    /// Current description for `key`, empty if absent
    pub fn contracts(&self, key: &Address) -> String {
        self.state
            .read()
            .contracts
            .get(key)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of keys with a non-empty description
    pub fn contract_count(&self) -> usize {
        self.state.read().contracts.len()
    }

    /// Present entries sorted by key
    pub fn entries(&self) -> Vec<(Address, String)> {
        let mut entries: Vec<(Address, String)> = self
            .state
            .read()
            .contracts
            .iter()
            .map(|(k, v)| (*k, v.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Dispatch a single call on behalf of `ctx`
    pub fn execute(&self, ctx: &CallContext, call: RegistryCall) -> Result<CallOutcome> {
        match call {
            RegistryCall::AddAddressToWhiteList { address } => {
                self.add_address_to_whitelist(ctx, address)?;
                Ok(CallOutcome::Ok)
            }
            RegistryCall::AddContract { key, description } => {
                self.add_contract(ctx, key, description)?;
                Ok(CallOutcome::Ok)
            }
            RegistryCall::UpdateContractDesc { key, description } => {
                self.update_contract_desc(ctx, key, description)?;
                Ok(CallOutcome::Ok)
            }
            RegistryCall::RemoveContract { key } => {
                self.remove_contract(ctx, key)?;
                Ok(CallOutcome::Ok)
            }
            RegistryCall::Owner => Ok(CallOutcome::Owner(self.owner())),
            RegistryCall::Contracts { key } => Ok(CallOutcome::Description(self.contracts(&key))),
        }
    }

    pub(crate) fn read_state<T>(&self, f: impl FnOnce(&RegistryState) -> T) -> T {
        f(&self.state.read())
    }
}

fn unauthorized(reason: &'static str) -> RegistryError {
    RegistryError::unauthorized(reason)
}

fn not_found(reason: &'static str) -> RegistryError {
    RegistryError::not_found(reason)
}

fn reject(ctx: &CallContext, method: &str, err: RegistryError) -> RegistryError {
    warn!("{} from {} rejected: {}", method, ctx.caller, err);
    err
}
