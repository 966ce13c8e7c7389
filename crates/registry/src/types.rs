//! Types for the contract registry call boundary

use contract_manager_types::Address;
use serde::{Deserialize, Serialize};

/// Authenticated identity of the account issuing a call.
///
/// Supplied by the execution environment and trusted as given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    pub caller: Address,
}

impl CallContext {
    pub fn new(caller: Address) -> Self {
        Self { caller }
    }
}

impl From<Address> for CallContext {
    fn from(caller: Address) -> Self {
        Self { caller }
    }
}

/// One call against the registry, as submitted by the execution environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method")]
pub enum RegistryCall {
    #[serde(rename = "addAddressToWhiteList")]
    AddAddressToWhiteList { address: Address },
    #[serde(rename = "addContract")]
    AddContract { key: Address, description: String },
    #[serde(rename = "updateContractDesc")]
    UpdateContractDesc { key: Address, description: String },
    #[serde(rename = "removeContract")]
    RemoveContract { key: Address },
    #[serde(rename = "owner")]
    Owner,
    #[serde(rename = "contracts")]
    Contracts { key: Address },
}

impl RegistryCall {
    /// Method name as exposed on the call boundary.
    pub fn method(&self) -> &'static str {
        match self {
            RegistryCall::AddAddressToWhiteList { .. } => "addAddressToWhiteList",
            RegistryCall::AddContract { .. } => "addContract",
            RegistryCall::UpdateContractDesc { .. } => "updateContractDesc",
            RegistryCall::RemoveContract { .. } => "removeContract",
            RegistryCall::Owner => "owner",
            RegistryCall::Contracts { .. } => "contracts",
        }
    }

    /// Whether executing the call can change registry state.
    pub fn is_mutating(&self) -> bool {
        !matches!(self, RegistryCall::Owner | RegistryCall::Contracts { .. })
    }
}

/// Successful result of an executed call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CallOutcome {
    /// State transition committed.
    Ok,
    Owner(Address),
    Description(String),
}
