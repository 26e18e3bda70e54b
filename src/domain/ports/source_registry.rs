//! SourceRegistry port - external source verification index
//!
//! Registration is best-effort and opportunistic: the orchestrator treats
//! every failure here as non-fatal. `AlreadyRegistered` is a recognized
//! error kind so callers can treat a duplicate registration as success.

use serde_json::Value;

use crate::domain::value_objects::Address;

/// Registry errors
#[derive(Debug)]
pub enum RegistryError {
    /// The artifact is already registered with the index
    AlreadyRegistered,
    /// The index rejected the registration
    Rejected(String),
    /// Transport-level failure talking to the index
    Transport(String),
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::AlreadyRegistered => write!(f, "already registered"),
            RegistryError::Rejected(reason) => write!(f, "registration rejected: {reason}"),
            RegistryError::Transport(detail) => write!(f, "transport error: {detail}"),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Abstract client for the external verification index
pub trait SourceRegistry {
    /// Register a deployed artifact's source with the index
    fn register(&self, address: &Address, constructor_args: &[Value]) -> Result<(), RegistryError>;

    /// Public listing URL for a registered artifact, used as the persisted
    /// verification marker
    fn listing_url(&self, address: &Address) -> String;
}
