//! services/api/src/adapters/directory.rs
//!
//! The in-memory account directory, the concrete implementation of the
//! `UserDirectory` port from the `core` crate. Accounts live for the process
//! lifetime only.

use async_trait::async_trait;
use medconnect_core::domain::{Account, UserIdentity};
use medconnect_core::ports::{PortError, PortResult, UserDirectory};
use tokio::sync::RwLock;
use tracing::info;

pub const DEMO_NAME: &str = "Usuario Demo";
pub const DEMO_EMAIL: &str = "demo@medconnect.com";
pub const DEMO_PASSWORD: &str = "demo123";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A directory adapter that implements the `UserDirectory` port.
#[derive(Default)]
pub struct InMemoryDirectory {
    accounts: RwLock<Vec<Account>>,
}

impl InMemoryDirectory {
    /// Creates an empty `InMemoryDirectory`.
    pub fn new() -> Self {
        Self::default()
    }

    /// A directory holding only the public demo account.
    pub fn with_demo_account() -> Self {
        Self {
            accounts: RwLock::new(vec![Account {
                name: DEMO_NAME.to_string(),
                email: DEMO_EMAIL.to_string(),
                password: DEMO_PASSWORD.to_string(),
            }]),
        }
    }
}

//=========================================================================================
// `UserDirectory` Trait Implementation
//=========================================================================================

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn find_by_email(&self, email: &str) -> PortResult<Account> {
        self.accounts
            .read()
            .await
            .iter()
            .find(|a| a.email == email)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Account {} not found", email)))
    }

    async fn register(&self, account: Account) -> PortResult<UserIdentity> {
        let mut accounts = self.accounts.write().await;
        if accounts.iter().any(|a| a.email == account.email) {
            return Err(PortError::Conflict(format!(
                "Account {} already exists",
                account.email
            )));
        }
        info!(email = %account.email, "Account registered.");
        let identity = account.identity();
        accounts.push(account);
        Ok(identity)
    }
}
