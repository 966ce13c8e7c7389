//! Access-Controlled Contract Registry
//!
//! Maps an address-like identifier to a textual description. The deployer
//! becomes the owner and is the only account allowed to extend the
//! whitelist; only whitelisted accounts may add, update or remove entries.
//! Reads are unrestricted.
//!
//! Every operation takes the caller identity explicitly through a
//! [`CallContext`] and is applied atomically: a rejected call leaves the
//! registry untouched.

pub mod errors;
pub mod registry;
pub mod snapshot;
pub mod types;

pub use errors::*;
pub use registry::ContractManager;
pub use snapshot::RegistrySnapshot;
pub use types::*;

pub use contract_manager_types::Address;
