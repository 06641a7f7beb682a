//! HTTP routes for the relay

mod account;
mod mailbox;

use std::sync::Arc;

use axum::extract::rejection::FormRejection;
use axum::handler::Handler;
use axum::routing::{get, MethodRouter};
use axum::{Form, Router};
use tower_http::trace::TraceLayer;

use push_relay_core::{AccountStore, MailboxStore, Mailer, SessionStore};

use crate::error::ApiError;
use crate::state::AppState;

/// Create the router with all routes
///
/// Every endpoint reads its fields from a form body (POST) or the query
/// string (GET), and is served with and without a trailing slash.
pub fn create_router<A, S, M, E>(state: Arc<AppState<A, S, M, E>>) -> Router
where
    A: AccountStore + 'static,
    S: SessionStore + 'static,
    M: MailboxStore + 'static,
    E: Mailer + 'static,
{
    Router::new()
        .route("/register", form_endpoint(account::register::<A, S, M, E>))
        .route("/register/", form_endpoint(account::register::<A, S, M, E>))
        .route("/activate", form_endpoint(account::activate::<A, S, M, E>))
        .route("/activate/", form_endpoint(account::activate::<A, S, M, E>))
        .route("/retrieve", form_endpoint(account::retrieve::<A, S, M, E>))
        .route("/retrieve/", form_endpoint(account::retrieve::<A, S, M, E>))
        .route("/push", form_endpoint(mailbox::push::<A, S, M, E>))
        .route("/push/", form_endpoint(mailbox::push::<A, S, M, E>))
        .route("/poll", form_endpoint(mailbox::poll::<A, S, M, E>))
        .route("/poll/", form_endpoint(mailbox::poll::<A, S, M, E>))
        // Route name used by earlier clients
        .route("/pool", form_endpoint(mailbox::poll::<A, S, M, E>))
        .route("/pool/", form_endpoint(mailbox::poll::<A, S, M, E>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn form_endpoint<H, T, St>(handler: H) -> MethodRouter<St>
where
    H: Handler<T, St>,
    T: 'static,
    St: Clone + Send + Sync + 'static,
{
    get(handler.clone()).post(handler)
}

/// Unwrap an extracted form, answering with `reject` when it could not be read
fn read_form<T>(form: Result<Form<T>, FormRejection>, reject: ApiError) -> Result<T, ApiError> {
    form.map(|Form(value)| value).map_err(|rejection| {
        tracing::debug!(error = %rejection, "Unreadable form");
        reject
    })
}
