//! Push Relay Core Library
//!
//! Implements the mailbox model behind a store-and-forward push relay:
//! - Accounts register with an email and password and activate by token
//! - Activated accounts exchange credentials for opaque session tokens
//! - Senders enqueue notifications under a token, pollers drain them

pub mod accounts;
pub mod config;
pub mod coordinator;
pub mod credentials;
pub mod crypto;
pub mod error;
pub mod mailbox;
pub mod mailer;
pub mod models;
pub mod sessions;
pub mod store;

pub use accounts::AccountDirectory;
pub use config::RelayConfig;
pub use coordinator::DeliveryCoordinator;
pub use error::Error;
pub use mailbox::Mailbox;
pub use mailer::Mailer;
pub use models::{Account, Notification, SessionToken};
pub use sessions::SessionService;
pub use store::{
    AccountStore, InMemoryAccountStore, InMemoryMailboxStore, InMemorySessionStore, MailboxStore,
    SessionStore, SqliteStore,
};

/// Result type for push-relay-core operations
pub type Result<T> = std::result::Result<T, Error>;
