//! Push Relay Server
//!
//! HTTP front end for the push relay: form-encoded endpoints for
//! registration, activation, session retrieval, push and poll.

pub mod config;
pub mod email;
pub mod error;
pub mod routes;
pub mod state;

pub use config::Config;
pub use email::{ConsoleMailer, SmtpConfig, SmtpMailer};
pub use error::ApiError;
pub use state::AppState;
