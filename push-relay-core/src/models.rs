//! Data model for accounts, session tokens and queued notifications

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account, keyed by email
#[derive(Debug, Clone)]
pub struct Account {
    /// Primary key, case-sensitive as stored
    pub email: String,
    pub password_hash: String,
    pub active: bool,
    /// Present until the account is activated
    pub activation_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub activated_at: Option<DateTime<Utc>>,
}

impl Account {
    /// A fresh, inactive account
    pub fn new(email: String, password_hash: String, activation_token: String) -> Self {
        Self {
            email,
            password_hash,
            active: false,
            activation_token: Some(activation_token),
            created_at: Utc::now(),
            activated_at: None,
        }
    }
}

/// An opaque credential standing in for an authenticated account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    pub token: String,
    /// Email of the owning account
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// A queued notification payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Mailbox key; never part of the serialized record
    #[serde(skip)]
    pub token: String,
    pub title: String,
    pub body: String,
    /// Logical time, defaults to the server receipt time in Unix seconds
    pub timestamp: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account_is_inactive() {
        let account = Account::new("a@example.com".into(), "hash".into(), "tok".into());
        assert!(!account.active);
        assert_eq!(account.activation_token.as_deref(), Some("tok"));
        assert!(account.activated_at.is_none());
    }

    #[test]
    fn test_notification_record_shape() {
        let notification = Notification {
            token: "secret-token".into(),
            title: "".into(),
            body: "line one\nline \"two\"".into(),
            timestamp: 42,
        };

        let json = serde_json::to_string(&notification).unwrap();
        assert_eq!(
            json,
            r#"{"title":"","body":"line one\nline \"two\"","timestamp":42}"#
        );
        assert!(!json.contains("secret-token"));

        let parsed: Notification = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.title, "");
        assert_eq!(parsed.body, notification.body);
        assert_eq!(parsed.timestamp, 42);
    }
}
