//! Mailbox endpoints: push and poll

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
pub struct PushForm {
    pub title: Option<String>,
    pub body: Option<String>,
    pub token: Option<String>,
    pub timestamp: Option<String>,
}

fn required(value: Option<String>, field: &str) -> Result<String, ApiError> {
    value.ok_or_else(|| ApiError::BadRequest(format!("Missing field: {}", field)))
}

/// /push
/// Queue a notification. Responds 200 unless the input itself is malformed.
pub async fn push<A, S, M, E>(
    State(state): State<Arc<AppState<A, S, M, E>>>,
    form: Result<Form<PushForm>, FormRejection>,
) -> Result<(), ApiError>
where
    A: AccountStore,
    S: SessionStore,
    M: MailboxStore,
    E: Mailer + 'static,
{
    let form = read_form(form, ApiError::BadRequest("Bad Request".to_string()))?;
    let title = required(form.title, "title")?;
    let body = required(form.body, "body")?;
    let token = required(form.token.filter(|t| !t.is_empty()), "token")?;

    state
        .relay
        .push(&token, &title, &body, form.timestamp.as_deref())?;
    Ok(())
}

#[derive(Deserialize)]
pub struct PollForm {
    #[serde(default)]
    pub token: String,
}

/// /poll
/// Return every notification queued under a token, concatenated
pub async fn poll<A, S, M, E>(
    State(state): State<Arc<AppState<A, S, M, E>>>,
    form: Result<Form<PollForm>, FormRejection>,
) -> Result<String, ApiError>
where
    A: AccountStore,
    S: SessionStore,
    M: MailboxStore,
    E: Mailer + 'static,
{
    let form = read_form(form, ApiError::BadRequest("Bad Request".to_string()))?;
    Ok(state.relay.poll(&form.token)?)
}
