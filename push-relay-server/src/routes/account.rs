//! Account endpoints: register, activate, retrieve

use std::sync::Arc;

use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::Form;
use serde::Deserialize;

use push_relay_core::{AccountStore, MailboxStore, Mailer, SessionStore};

use super::read_form;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// /register
/// Create an inactive account and mail its activation link
pub async fn register<A, S, M, E>(
    State(state): State<Arc<AppState<A, S, M, E>>>,
    form: Result<Form<RegisterForm>, FormRejection>,
) -> Result<&'static str, ApiError>
where
    A: AccountStore,
    S: SessionStore,
    M: MailboxStore,
    E: Mailer + 'static,
{
    let form = read_form(form, ApiError::BadRequest("Bad Request".to_string()))?;
    state.relay.register(&form.email, &form.password)?;
    Ok("Activation link was sent by email")
}

#[derive(Deserialize)]
pub struct ActivateForm {
    pub email: Option<String>,
    pub key: Option<String>,
}

/// /activate
/// Consume an activation key. Every rejection looks the same to the caller.
pub async fn activate<A, S, M, E>(
    State(state): State<Arc<AppState<A, S, M, E>>>,
    form: Result<Form<ActivateForm>, FormRejection>,
) -> Result<&'static str, ApiError>
where
    A: AccountStore,
    S: SessionStore,
    M: MailboxStore,
    E: Mailer + 'static,
{
    let bad_request = || ApiError::BadRequest("Bad Request".to_string());
    let form = read_form(form, bad_request())?;

    let email = form.email.filter(|e| !e.is_empty()).ok_or_else(bad_request)?;
    let key = form.key.filter(|k| !k.is_empty()).ok_or_else(bad_request)?;

    match state.relay.activate(&email, &key) {
        Ok(_) => Ok("OK"),
        Err(e) if e.is_internal() => Err(ApiError::Internal(e.to_string())),
        Err(e) => {
            tracing::debug!(email = %email, error = %e, "Activation rejected");
            Err(bad_request())
        }
    }
}

#[derive(Deserialize)]
pub struct RetrieveForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// /retrieve
/// Exchange credentials of an active account for a session token
pub async fn retrieve<A, S, M, E>(
    State(state): State<Arc<AppState<A, S, M, E>>>,
    form: Result<Form<RetrieveForm>, FormRejection>,
) -> Result<String, ApiError>
where
    A: AccountStore,
    S: SessionStore,
    M: MailboxStore,
    E: Mailer + 'static,
{
    let form = read_form(form, ApiError::NotFound)?;
    let session = state.relay.retrieve(&form.email, &form.password)?;
    Ok(session.token)
}
