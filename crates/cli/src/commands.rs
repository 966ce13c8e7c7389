//! State-file backed command execution
//!
//! Each mutating command loads the snapshot, applies exactly one call and
//! writes the snapshot back only when the call was accepted.

use anyhow::{bail, Context, Result};
use contract_manager_registry::{
    Address, CallContext, CallOutcome, ContractManager, RegistryCall, RegistrySnapshot,
};
use std::path::Path;
use tracing::info;

/// Create a fresh state file owned by `owner`.
pub fn deploy(state_path: &Path, owner: Address, force: bool) -> Result<()> {
    if state_path.exists() && !force {
        bail!(
            "State file {} already exists (use --force to overwrite)",
            state_path.display()
        );
    }

    let registry = ContractManager::new(owner);
    registry
        .snapshot()
        .save(state_path)
        .with_context(|| format!("Failed to write state file {}", state_path.display()))?;
    info!("Registry state written to {}", state_path.display());
    Ok(())
}

pub fn load_registry(state_path: &Path) -> Result<ContractManager> {
    let snapshot = RegistrySnapshot::load(state_path).with_context(|| {
        format!(
            "Failed to load state file {} (run `deploy` first)",
            state_path.display()
        )
    })?;
    Ok(ContractManager::from_snapshot(snapshot)?)
}

/// Execute one call as `caller`, persisting the new state on success.
pub fn submit(state_path: &Path, caller: Address, call: RegistryCall) -> Result<CallOutcome> {
    let registry = load_registry(state_path)?;
    let method = call.method();
    let mutating = call.is_mutating();

    // Rejections carry the reason verbatim; state is left untouched.
    let outcome = registry
        .execute(&CallContext::new(caller), call)
        .map_err(|e| anyhow::anyhow!(e.reason()))?;

    if mutating {
        registry
            .snapshot()
            .save(state_path)
            .with_context(|| format!("Failed to write state file {}", state_path.display()))?;
        info!("{} committed", method);
    }
    Ok(outcome)
}

/// Read-only call; never writes the state file.
pub fn query(state_path: &Path, call: RegistryCall) -> Result<CallOutcome> {
    if call.is_mutating() {
        bail!("{} is not a read-only call", call.method());
    }
    let registry = load_registry(state_path)?;
    // Reads need no privilege; the owner stands in as caller.
    let ctx = CallContext::new(registry.owner());
    Ok(registry.execute(&ctx, call)?)
}

pub fn list(state_path: &Path) -> Result<Vec<(Address, String)>> {
    Ok(load_registry(state_path)?.entries())
}

pub fn whitelisted(state_path: &Path) -> Result<Vec<Address>> {
    Ok(load_registry(state_path)?.whitelist())
}
