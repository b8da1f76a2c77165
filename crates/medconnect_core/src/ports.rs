//! crates/medconnect_core/src/ports.rs
//!
//! Defines the service contracts (traits) the core needs from the outside.
//! These traits form the boundary of the hexagonal architecture, so the core
//! does not care where accounts are kept.

use async_trait::async_trait;

use crate::domain::{Account, UserIdentity};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Already exists: {0}")]
    Conflict(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Looks up an account by its exact email.
    async fn find_by_email(&self, email: &str) -> PortResult<Account>;

    /// Adds an account. Fails with `Conflict` if the email is taken.
    async fn register(&self, account: Account) -> PortResult<UserIdentity>;
}
