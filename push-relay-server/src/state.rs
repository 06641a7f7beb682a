//! Server state management

use push_relay_core::{
    AccountStore, DeliveryCoordinator, MailboxStore, Mailer, RelayConfig, SessionStore,
};

/// Server application state
pub struct AppState<A, S, M, E> {
    /// Coordinator behind every endpoint
    pub relay: DeliveryCoordinator<A, S, M, E>,
}

impl<A, S, M, E> AppState<A, S, M, E>
where
    A: AccountStore,
    S: SessionStore,
    M: MailboxStore,
    E: Mailer + 'static,
{
    pub fn new(config: &RelayConfig, accounts: A, sessions: S, mailboxes: M, mailer: E) -> Self {
        Self {
            relay: DeliveryCoordinator::new(config, accounts, sessions, mailboxes, mailer),
        }
    }
}
