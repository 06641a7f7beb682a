//! Delivery coordinator: the operations client code calls

use std::sync::Arc;

use tracing::Level;

use crate::accounts::AccountDirectory;
use crate::config::RelayConfig;
use crate::credentials::verify_password;
use crate::error::Error;
use crate::mailbox::{parse_timestamp, render, Mailbox};
use crate::mailer::Mailer;
use crate::models::{Account, SessionToken};
use crate::sessions::SessionService;
use crate::store::{AccountStore, MailboxStore, SessionStore};
use crate::Result;

/// Binds the account directory, session service, mailbox and mailer together
pub struct DeliveryCoordinator<A, S, M, E> {
    accounts: AccountDirectory<A>,
    sessions: SessionService<S>,
    mailbox: Mailbox<M>,
    mailer: Arc<E>,
}

impl<A, S, M, E> DeliveryCoordinator<A, S, M, E>
where
    A: AccountStore,
    S: SessionStore,
    M: MailboxStore,
    E: Mailer + 'static,
{
    pub fn new(config: &RelayConfig, accounts: A, sessions: S, mailbox: M, mailer: E) -> Self {
        Self {
            accounts: AccountDirectory::new(config, accounts),
            sessions: SessionService::new(sessions),
            mailbox: Mailbox::new(mailbox),
            mailer: Arc::new(mailer),
        }
    }

    /// Register an account and send its activation token.
    ///
    /// The mail goes out after the account is stored; a delivery failure is
    /// logged and does not affect the result.
    pub fn register(&self, email: &str, password: &str) -> Result<Account> {
        let account = self.accounts.create_account(email, password)?;
        if let Some(token) = &account.activation_token {
            self.dispatch_activation(account.email.clone(), token.clone());
        }
        Ok(account)
    }

    /// Activate the account for `email` with its activation token
    pub fn activate(&self, email: &str, key: &str) -> Result<Account> {
        let account = self.accounts.activate(email, key)?;
        tracing::info!(email = %email, "Account activated");
        Ok(account)
    }

    /// Queue a notification under `token`.
    ///
    /// Only malformed input is reported. Storage failures are logged and
    /// the push still counts as accepted.
    pub fn push(&self, token: &str, title: &str, body: &str, timestamp: Option<&str>) -> Result<()> {
        if token.is_empty() {
            return Err(Error::Validation("Missing token".to_string()));
        }
        let timestamp = parse_timestamp(timestamp)?;

        if let Err(e) = self.mailbox.enqueue(token, title, body, timestamp) {
            tracing::error!(error = %e, "Failed to store notification");
            return Ok(());
        }

        if tracing::enabled!(Level::DEBUG) {
            if self.has_live_session(token) {
                tracing::debug!("Notification queued");
            } else {
                tracing::debug!("Notification queued for a token with no issued session");
            }
        }
        Ok(())
    }

    /// Serialize every notification queued under `token`.
    ///
    /// Unknown tokens produce an empty string. Notifications are not removed.
    pub fn poll(&self, token: &str) -> Result<String> {
        let notifications = self.mailbox.drain(token)?;
        let body = render(&notifications)?;
        if tracing::enabled!(Level::DEBUG) {
            tracing::debug!(
                count = notifications.len(),
                live_session = self.has_live_session(token),
                "Mailbox polled"
            );
        }
        Ok(body)
    }

    /// Exchange credentials of an active account for a new session token.
    ///
    /// Unknown email, wrong password and inactive account are all `NotFound`.
    pub fn retrieve(&self, email: &str, password: &str) -> Result<SessionToken> {
        let account = match self.accounts.find_account(email) {
            Ok(account) => account,
            Err(Error::NotFound) => {
                self.accounts.verify_absent(password);
                return Err(Error::NotFound);
            }
            Err(e) => return Err(e),
        };
        if !verify_password(&account, password)? || !account.active {
            return Err(Error::NotFound);
        }
        self.sessions.issue(&account)
    }

    /// Look up the session a raw token belongs to
    pub fn resolve_session(&self, token: &str) -> Result<SessionToken> {
        self.sessions.resolve(token)
    }

    /// Session lookup used only for debug logging
    fn has_live_session(&self, token: &str) -> bool {
        self.sessions.resolve(token).is_ok()
    }

    fn dispatch_activation(&self, email: String, token: String) {
        let mailer = Arc::clone(&self.mailer);
        let send = move || match mailer.send_activation(&email, &token) {
            Ok(()) => tracing::debug!(email = %email, "Activation email dispatched"),
            Err(e) => tracing::warn!(email = %email, error = %e, "Failed to send activation email"),
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(send);
            }
            Err(_) => {
                std::thread::spawn(send);
            }
        }
    }
}
