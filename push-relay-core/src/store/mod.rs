//! Storage abstractions for the relay

pub mod memory;
pub mod sqlite;

pub use memory::{InMemoryAccountStore, InMemoryMailboxStore, InMemorySessionStore};
pub use sqlite::SqliteStore;

use crate::error::Error;
use crate::models::{Account, Notification, SessionToken};

/// Result type for store operations
pub type StoreResult<T> = Result<T, Error>;

/// Trait for account storage
pub trait AccountStore: Send + Sync {
    /// Insert a new account, failing with `Duplicate` if the email is taken
    fn create_account(&self, account: Account) -> StoreResult<()>;

    /// Get an account by email
    fn get_account(&self, email: &str) -> StoreResult<Option<Account>>;

    /// Atomically activate an account if `presented` is its live activation token
    fn activate_account(&self, email: &str, presented: &str) -> StoreResult<Account>;
}

/// Trait for session token storage
pub trait SessionStore: Send + Sync {
    /// Create a new session token for an account
    fn create(&self, email: &str) -> StoreResult<SessionToken>;

    /// Get a session by its raw token
    fn get(&self, token: &str) -> StoreResult<Option<SessionToken>>;
}

/// Trait for per-token notification storage
pub trait MailboxStore: Send + Sync {
    /// Append a notification to the mailbox named by its token
    fn append(&self, notification: Notification) -> StoreResult<()>;

    /// List a mailbox in insertion order
    fn list(&self, token: &str) -> StoreResult<Vec<Notification>>;
}
