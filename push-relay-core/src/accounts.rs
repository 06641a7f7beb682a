//! Account directory: registration and lookup

use std::sync::OnceLock;

use crate::config::RelayConfig;
use crate::credentials::{issue_activation_token, validate_password, MAX_PASSWORD_BYTES};
use crate::crypto::{self, hash_password};
use crate::error::Error;
use crate::models::Account;
use crate::store::AccountStore;
use crate::Result;

/// Owns account records on top of an [`AccountStore`]
pub struct AccountDirectory<A> {
    store: A,
    config: RelayConfig,
    /// Hash verified against when the email is unknown
    decoy_hash: OnceLock<Option<String>>,
}

impl<A: AccountStore> AccountDirectory<A> {
    pub fn new(config: &RelayConfig, store: A) -> Self {
        Self {
            store,
            config: config.clone(),
            decoy_hash: OnceLock::new(),
        }
    }

    /// Create an inactive account with a fresh activation token.
    ///
    /// Duplicate emails are detected by the store's insert, so two
    /// concurrent registrations of one address cannot both succeed.
    pub fn create_account(&self, email: &str, raw_password: &str) -> Result<Account> {
        if email.is_empty() {
            return Err(Error::Validation("Email must not be empty".to_string()));
        }
        validate_password(raw_password)?;

        let password_hash = hash_password(raw_password, self.config.bcrypt_cost)
            .map_err(|e| Error::Internal(e.to_string()))?;
        let token = issue_activation_token(&self.config);

        let account = Account::new(email.to_string(), password_hash, token);
        self.store.create_account(account.clone())?;

        tracing::info!(email = %email, "Account created");
        Ok(account)
    }

    /// Look up an account by email
    pub fn find_account(&self, email: &str) -> Result<Account> {
        self.store.get_account(email)?.ok_or(Error::NotFound)
    }

    /// Spend a password verification's worth of bcrypt work on an account
    /// that does not exist, so lookups of unknown emails take as long as
    /// failed logins.
    pub fn verify_absent(&self, raw_password: &str) {
        if raw_password.len() > MAX_PASSWORD_BYTES {
            return;
        }
        let decoy = self
            .decoy_hash
            .get_or_init(|| hash_password("", self.config.bcrypt_cost).ok());
        if let Some(hash) = decoy {
            let _ = crypto::verify_password(raw_password, hash);
        }
    }

    /// Consume an activation token; see [`crate::credentials::check_activation`]
    pub fn activate(&self, email: &str, presented: &str) -> Result<Account> {
        self.store.activate_account(email, presented)
    }
}
