//! SQLite-based storage implementation

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{AccountStore, MailboxStore, SessionStore, StoreResult};
use crate::credentials::check_activation;
use crate::crypto::generate_session_token;
use crate::error::Error;
use crate::models::{Account, Notification, SessionToken};

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// SQLite-based store implementing AccountStore, SessionStore and MailboxStore
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a SQLite database at the given path
    pub fn open(path: &str) -> Result<Self, Error> {
        let conn = Connection::open(path).map_err(|e| Error::Internal(e.to_string()))?;
        Self::from_connection(conn)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self, Error> {
        let conn = Connection::open_in_memory().map_err(|e| Error::Internal(e.to_string()))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, Error> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| Error::Internal(e.to_string()))?;

        Self::migrate(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run database migrations
    fn migrate(conn: &Connection) -> Result<(), Error> {
        let current_version = Self::get_schema_version(conn)?;

        if current_version < SCHEMA_VERSION {
            tracing::info!(
                current = current_version,
                target = SCHEMA_VERSION,
                "Running database migrations"
            );

            if current_version < 1 {
                Self::migrate_v1(conn)?;
            }

            conn.execute(
                "INSERT OR REPLACE INTO schema_version (version) VALUES (?1)",
                params![SCHEMA_VERSION],
            )
            .map_err(|e| Error::Internal(e.to_string()))?;

            tracing::info!("Database migrations complete");
        }

        Ok(())
    }

    /// Get current schema version (0 if no schema exists)
    fn get_schema_version(conn: &Connection) -> Result<i32, Error> {
        let table_exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
                [],
                |row| row.get(0),
            )
            .map_err(|e| Error::Internal(e.to_string()))?;

        if !table_exists {
            return Ok(0);
        }

        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
            row.get::<_, Option<i32>>(0).map(|v| v.unwrap_or(0))
        })
        .map_err(|e| Error::Internal(e.to_string()))
    }

    /// Migration to version 1: initial schema
    fn migrate_v1(conn: &Connection) -> Result<(), Error> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            );

            CREATE TABLE IF NOT EXISTS accounts (
                email TEXT PRIMARY KEY,
                password_hash TEXT NOT NULL,
                active INTEGER NOT NULL DEFAULT 0,
                activation_token TEXT,
                created_at TEXT NOT NULL,
                activated_at TEXT
            );

            CREATE TABLE IF NOT EXISTS session_tokens (
                token TEXT PRIMARY KEY,
                email TEXT NOT NULL REFERENCES accounts(email),
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_session_tokens_email ON session_tokens(email);

            -- No foreign key on token: pushes to unissued tokens are kept
            CREATE TABLE IF NOT EXISTS notifications (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                token TEXT NOT NULL,
                title TEXT NOT NULL,
                body TEXT NOT NULL,
                timestamp INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_notifications_token ON notifications(token, id);
            "#,
        )
        .map_err(|e| Error::Internal(e.to_string()))?;

        Ok(())
    }

    fn account_from_row(row: &Row<'_>) -> rusqlite::Result<Account> {
        let email: String = row.get(0)?;
        let password_hash: String = row.get(1)?;
        let active: i32 = row.get(2)?;
        let activation_token: Option<String> = row.get(3)?;
        let created_at: String = row.get(4)?;
        let activated_at: Option<String> = row.get(5)?;
        Ok(Account {
            email,
            password_hash,
            active: active != 0,
            activation_token,
            created_at: parse_time(&created_at).unwrap_or_else(Utc::now),
            activated_at: activated_at.as_deref().and_then(parse_time),
        })
    }

    fn get_account_locked(conn: &Connection, email: &str) -> StoreResult<Option<Account>> {
        conn.query_row(
            "SELECT email, password_hash, active, activation_token, created_at, activated_at
             FROM accounts WHERE email = ?1",
            params![email],
            Self::account_from_row,
        )
        .optional()
        .map_err(|e| Error::Internal(e.to_string()))
    }
}

fn parse_time(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

impl AccountStore for SqliteStore {
    fn create_account(&self, account: Account) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "INSERT INTO accounts (email, password_hash, active, activation_token, created_at, activated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                account.email,
                account.password_hash,
                account.active as i32,
                account.activation_token,
                account.created_at.to_rfc3339(),
                account.activated_at.map(|t| t.to_rfc3339()),
            ],
        )
        .map_err(|e| {
            if let rusqlite::Error::SqliteFailure(ref err, _) = e {
                if err.code == rusqlite::ErrorCode::ConstraintViolation {
                    return Error::Duplicate(account.email.clone());
                }
            }
            Error::Internal(e.to_string())
        })?;

        Ok(())
    }

    fn get_account(&self, email: &str) -> StoreResult<Option<Account>> {
        let conn = self.conn.lock().unwrap();
        Self::get_account_locked(&conn, email)
    }

    fn activate_account(&self, email: &str, presented: &str) -> StoreResult<Account> {
        // The connection lock spans the read, the comparison and the update
        let conn = self.conn.lock().unwrap();

        let mut account = Self::get_account_locked(&conn, email)?.ok_or(Error::NotFound)?;
        check_activation(&account, presented)?;

        let now = Utc::now();
        let rows_affected = conn
            .execute(
                "UPDATE accounts SET active = 1, activation_token = NULL, activated_at = ?1
                 WHERE email = ?2 AND active = 0",
                params![now.to_rfc3339(), email],
            )
            .map_err(|e| Error::Internal(e.to_string()))?;

        if rows_affected == 0 {
            return Err(Error::Mismatch);
        }

        account.active = true;
        account.activation_token = None;
        account.activated_at = Some(now);
        Ok(account)
    }
}

impl SessionStore for SqliteStore {
    fn create(&self, email: &str) -> StoreResult<SessionToken> {
        let conn = self.conn.lock().unwrap();
        let session = SessionToken {
            token: generate_session_token(),
            email: email.to_string(),
            created_at: Utc::now(),
        };

        conn.execute(
            "INSERT INTO session_tokens (token, email, created_at) VALUES (?1, ?2, ?3)",
            params![session.token, session.email, session.created_at.to_rfc3339()],
        )
        .map_err(|e| Error::Internal(e.to_string()))?;

        Ok(session)
    }

    fn get(&self, token: &str) -> StoreResult<Option<SessionToken>> {
        let conn = self.conn.lock().unwrap();

        conn.query_row(
            "SELECT token, email, created_at FROM session_tokens WHERE token = ?1",
            params![token],
            |row| {
                let token: String = row.get(0)?;
                let email: String = row.get(1)?;
                let created_at: String = row.get(2)?;
                Ok(SessionToken {
                    token,
                    email,
                    created_at: parse_time(&created_at).unwrap_or_else(Utc::now),
                })
            },
        )
        .optional()
        .map_err(|e| Error::Internal(e.to_string()))
    }
}

impl MailboxStore for SqliteStore {
    fn append(&self, notification: Notification) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "INSERT INTO notifications (token, title, body, timestamp) VALUES (?1, ?2, ?3, ?4)",
            params![
                notification.token,
                notification.title,
                notification.body,
                notification.timestamp as i64,
            ],
        )
        .map_err(|e| Error::Internal(e.to_string()))?;

        Ok(())
    }

    fn list(&self, token: &str) -> StoreResult<Vec<Notification>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn
            .prepare(
                "SELECT token, title, body, timestamp FROM notifications
                 WHERE token = ?1 ORDER BY id",
            )
            .map_err(|e| Error::Internal(e.to_string()))?;

        let notifications = stmt
            .query_map(params![token], |row| {
                let token: String = row.get(0)?;
                let title: String = row.get(1)?;
                let body: String = row.get(2)?;
                let timestamp: i64 = row.get(3)?;
                Ok(Notification {
                    token,
                    title,
                    body,
                    timestamp: timestamp as u64,
                })
            })
            .map_err(|e| Error::Internal(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| Error::Internal(e.to_string()))?;

        Ok(notifications)
    }
}

// Implement traits for Arc<SqliteStore> so one connection backs all three roles
impl AccountStore for Arc<SqliteStore> {
    fn create_account(&self, account: Account) -> StoreResult<()> {
        (**self).create_account(account)
    }

    fn get_account(&self, email: &str) -> StoreResult<Option<Account>> {
        (**self).get_account(email)
    }

    fn activate_account(&self, email: &str, presented: &str) -> StoreResult<Account> {
        (**self).activate_account(email, presented)
    }
}

impl SessionStore for Arc<SqliteStore> {
    fn create(&self, email: &str) -> StoreResult<SessionToken> {
        (**self).create(email)
    }

    fn get(&self, token: &str) -> StoreResult<Option<SessionToken>> {
        (**self).get(token)
    }
}

impl MailboxStore for Arc<SqliteStore> {
    fn append(&self, notification: Notification) -> StoreResult<()> {
        (**self).append(notification)
    }

    fn list(&self, token: &str) -> StoreResult<Vec<Notification>> {
        (**self).list(token)
    }
}
