//! Common test utilities for relay integration tests

#![allow(dead_code)]

use std::sync::{Arc, RwLock};
use std::time::Duration;

use axum_test::TestServer;
use push_relay_core::{
    InMemoryAccountStore, InMemoryMailboxStore, InMemorySessionStore, Mailer, Notification,
    RelayConfig,
};
use push_relay_server::{routes, AppState};

/// Mock mailer that captures activation tokens
#[derive(Default, Clone)]
pub struct MockMailer {
    /// Captured (email, token) pairs
    pub sent: Arc<RwLock<Vec<(String, String)>>>,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the last activation token sent to an email
    pub fn get_token(&self, email: &str) -> Option<String> {
        self.sent
            .read()
            .unwrap()
            .iter()
            .rev()
            .find(|(e, _)| e == email)
            .map(|(_, t)| t.clone())
    }

    /// Wait for the background dispatch to reach the mailer
    pub async fn wait_for_token(&self, email: &str) -> Option<String> {
        for _ in 0..200 {
            if let Some(token) = self.get_token(email) {
                return Some(token);
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        None
    }
}

impl Mailer for MockMailer {
    fn send_activation(&self, email: &str, token: &str) -> Result<(), String> {
        self.sent
            .write()
            .unwrap()
            .push((email.to_string(), token.to_string()));
        Ok(())
    }
}

/// Relay settings with a cheap bcrypt cost
pub fn test_config() -> RelayConfig {
    RelayConfig {
        bcrypt_cost: 4,
        ..RelayConfig::default()
    }
}

/// Create a test server with mock mailer
pub fn create_test_server() -> (TestServer, MockMailer) {
    let mailer = MockMailer::new();

    let state = Arc::new(AppState::new(
        &test_config(),
        InMemoryAccountStore::new(),
        InMemorySessionStore::new(),
        InMemoryMailboxStore::new(),
        mailer.clone(),
    ));

    let app = routes::create_router(state);
    let server = TestServer::new(app).expect("Failed to create test server");

    (server, mailer)
}

/// Register an account and return its mailed activation token
pub async fn register(server: &TestServer, mailer: &MockMailer, email: &str, password: &str) -> String {
    let response = server
        .post("/register")
        .form(&[("email", email), ("password", password)])
        .await;
    assert_eq!(response.status_code(), 200);

    mailer
        .wait_for_token(email)
        .await
        .expect("No activation token sent")
}

/// Register and activate an account, then return a session token
pub async fn create_session(
    server: &TestServer,
    mailer: &MockMailer,
    email: &str,
    password: &str,
) -> String {
    let key = register(server, mailer, email, password).await;

    let response = server
        .post("/activate")
        .form(&[("email", email), ("key", key.as_str())])
        .await;
    assert_eq!(response.status_code(), 200);

    let response = server
        .post("/retrieve")
        .form(&[("email", email), ("password", password)])
        .await;
    assert_eq!(response.status_code(), 200);

    response.text()
}

/// Split a poll body into its records
pub fn parse_records(body: &str) -> Vec<Notification> {
    serde_json::Deserializer::from_str(body)
        .into_iter::<Notification>()
        .collect::<Result<_, _>>()
        .expect("Poll body is not a sequence of records")
}
