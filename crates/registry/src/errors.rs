//! Error types for the contract registry

use thiserror::Error;

/// Rejection reason for whitelist management by anyone but the owner.
pub const REASON_NOT_OWNER: &str = "Sender is not the owner";
/// Rejection reason for `add_contract` by a non-whitelisted caller.
pub const REASON_CANT_ADD: &str = "Sender cant add contracts";
/// Rejection reason for `update_contract_desc` by a non-whitelisted caller.
pub const REASON_CANT_UPDATE: &str = "Sender can't update contracts";
/// Rejection reason for `remove_contract` by a non-whitelisted caller.
pub const REASON_CANT_REMOVE: &str = "Sender cant remove contracts";
/// Rejection reason for updating a slot with no description.
pub const REASON_NOT_EXIST: &str = "Contract not exist";

#[derive(Error, Debug)]
pub enum RegistryError {
    /// Caller lacks the privilege the operation requires.
    #[error("{reason}")]
    Unauthorized { reason: &'static str },

    /// Caller is authorized but the target slot is empty.
    #[error("{reason}")]
    NotFound { reason: &'static str },

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RegistryError {
    pub(crate) fn unauthorized(reason: &'static str) -> Self {
        Self::Unauthorized { reason }
    }

    pub(crate) fn not_found(reason: &'static str) -> Self {
        Self::NotFound { reason }
    }

    /// Human-readable reason, as surfaced to the caller of a rejected call.
    pub fn reason(&self) -> String {
        match self {
            Self::Unauthorized { reason } | Self::NotFound { reason } => (*reason).to_string(),
            other => other.to_string(),
        }
    }

    /// Whether this error is a rejected call rather than a snapshot/I/O failure.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Unauthorized { .. } | Self::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;
