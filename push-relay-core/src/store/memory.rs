//! In-memory storage implementations

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;

use super::{AccountStore, MailboxStore, SessionStore, StoreResult};
use crate::credentials::check_activation;
use crate::crypto::generate_session_token;
use crate::error::Error;
use crate::models::{Account, Notification, SessionToken};

/// In-memory account store
pub struct InMemoryAccountStore {
    accounts: RwLock<HashMap<String, Account>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryAccountStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountStore for InMemoryAccountStore {
    fn create_account(&self, account: Account) -> StoreResult<()> {
        let mut accounts = self.accounts.write().unwrap();
        match accounts.entry(account.email.clone()) {
            Entry::Occupied(_) => Err(Error::Duplicate(account.email)),
            Entry::Vacant(slot) => {
                slot.insert(account);
                Ok(())
            }
        }
    }

    fn get_account(&self, email: &str) -> StoreResult<Option<Account>> {
        Ok(self.accounts.read().unwrap().get(email).cloned())
    }

    fn activate_account(&self, email: &str, presented: &str) -> StoreResult<Account> {
        let mut accounts = self.accounts.write().unwrap();
        let account = accounts.get_mut(email).ok_or(Error::NotFound)?;
        check_activation(account, presented)?;

        account.active = true;
        account.activation_token = None;
        account.activated_at = Some(Utc::now());
        Ok(account.clone())
    }
}

/// In-memory session store
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, SessionToken>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for InMemorySessionStore {
    fn create(&self, email: &str) -> StoreResult<SessionToken> {
        let session = SessionToken {
            token: generate_session_token(),
            email: email.to_string(),
            created_at: Utc::now(),
        };
        self.sessions
            .write()
            .unwrap()
            .insert(session.token.clone(), session.clone());
        Ok(session)
    }

    fn get(&self, token: &str) -> StoreResult<Option<SessionToken>> {
        Ok(self.sessions.read().unwrap().get(token).cloned())
    }
}

/// In-memory mailbox store
pub struct InMemoryMailboxStore {
    mailboxes: RwLock<HashMap<String, Vec<Notification>>>,
}

impl InMemoryMailboxStore {
    pub fn new() -> Self {
        Self {
            mailboxes: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryMailboxStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MailboxStore for InMemoryMailboxStore {
    fn append(&self, notification: Notification) -> StoreResult<()> {
        self.mailboxes
            .write()
            .unwrap()
            .entry(notification.token.clone())
            .or_default()
            .push(notification);
        Ok(())
    }

    fn list(&self, token: &str) -> StoreResult<Vec<Notification>> {
        Ok(self
            .mailboxes
            .read()
            .unwrap()
            .get(token)
            .cloned()
            .unwrap_or_default())
    }
}
