//! Session token issuance and lookup

use crate::error::Error;
use crate::models::{Account, SessionToken};
use crate::store::SessionStore;
use crate::Result;

/// Issues and resolves session tokens on top of a [`SessionStore`]
pub struct SessionService<S> {
    store: S,
}

impl<S: SessionStore> SessionService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Issue a fresh session token for an active account.
    ///
    /// Each call creates a new token; earlier tokens stay valid.
    pub fn issue(&self, account: &Account) -> Result<SessionToken> {
        if !account.active {
            return Err(Error::Mismatch);
        }
        let session = self.store.create(&account.email)?;
        tracing::debug!(email = %account.email, "Session token issued");
        Ok(session)
    }

    /// Resolve a raw token string to its session
    pub fn resolve(&self, token: &str) -> Result<SessionToken> {
        self.store.get(token)?.ok_or(Error::NotFound)
    }
}
