//! Error types for Mason
//!
//! Library errors use `thiserror`; `main` wraps them in `anyhow` for
//! reporting. Creation and wiring failures propagate uncaught to the top
//! level - the persisted manifest makes the next run resume safely.

use thiserror::Error;

use crate::domain::entities::PlanError;
use crate::domain::ports::{CodeError, LedgerError, StoreError};
use crate::domain::value_objects::Address;

/// Result type alias for Mason operations
pub type MasonResult<T> = Result<T, MasonError>;

/// Main error type for Mason operations
#[derive(Error, Debug)]
pub enum MasonError {
    /// The configured deployer identity does not match the signing identity
    #[error("configured deployer {expected} does not match signing identity {actual}")]
    ConfigMismatch { expected: Address, actual: Address },

    /// Two independently derived values that must agree, disagree
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// The deployment plan is inconsistent with its declared dependencies
    #[error("invalid deployment plan: {0}")]
    Plan(#[from] PlanError),

    /// Ledger submission/confirmation failure
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Manifest persistence failure
    #[error("manifest store error: {0}")]
    Store(#[from] StoreError),

    /// Contract code could not be loaded
    #[error("contract code error: {0}")]
    Code(#[from] CodeError),

    /// Configuration could not be loaded or is invalid
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
