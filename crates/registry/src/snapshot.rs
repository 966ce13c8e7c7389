//! Serializable registry state
//!
//! A snapshot holds the three logical slots (owner, whitelist, contracts) in
//! deterministic order.

use crate::errors::*;
use crate::registry::{ContractManager, RegistryState};
use contract_manager_types::Address;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub owner: Address,
    #[serde(default)]
    pub whitelist: BTreeSet<Address>,
    #[serde(default)]
    pub contracts: BTreeMap<Address, String>,
}

impl RegistrySnapshot {
    /// Empty state for a freshly deployed registry
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            whitelist: BTreeSet::new(),
            contracts: BTreeMap::new(),
        }
    }

    /// Reject states a registry can never reach
    pub fn validate(&self) -> Result<()> {
        if let Some((key, _)) = self.contracts.iter().find(|(_, desc)| desc.is_empty()) {
            return Err(RegistryError::InvalidSnapshot(format!(
                "entry {} has an empty description",
                key
            )));
        }
        Ok(())
    }

    /// Write as pretty JSON, replacing `path` atomically via a sibling temp file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_vec_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;

        debug!("Saved registry snapshot to {}", path.display());
        Ok(())
    }

    /// Read and validate a snapshot written by [`RegistrySnapshot::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = fs::read(path.as_ref())?;
        let snapshot: Self = serde_json::from_slice(&bytes)?;
        snapshot.validate()?;
        Ok(snapshot)
    }
}

impl ContractManager {
    /// Copy of the current state
    pub fn snapshot(&self) -> RegistrySnapshot {
        self.read_state(|state| RegistrySnapshot {
            owner: self.owner(),
            whitelist: state.whitelist.iter().copied().collect(),
            contracts: state
                .contracts
                .iter()
                .map(|(k, v)| (*k, v.clone()))
                .collect(),
        })
    }

    /// Rebuild a registry from a snapshot
    pub fn from_snapshot(snapshot: RegistrySnapshot) -> Result<Self> {
        snapshot.validate()?;
        let state = RegistryState {
            whitelist: snapshot.whitelist.into_iter().collect(),
            contracts: snapshot.contracts.into_iter().collect(),
        };
        Ok(Self::with_state(snapshot.owner, state))
    }
}
