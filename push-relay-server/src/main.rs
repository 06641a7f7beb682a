//! Push Relay Server
//!
//! Store-and-forward push notifications: senders push by token,
//! pollers drain their mailbox over plain HTTP forms.

use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use push_relay_core::{
    AccountStore, InMemoryAccountStore, InMemoryMailboxStore, InMemorySessionStore, MailboxStore,
    Mailer, SessionStore, SqliteStore,
};
use push_relay_server::{routes, AppState, Config, ConsoleMailer, SmtpConfig, SmtpMailer};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_tracing(&config)?;
    tracing::info!(?config, "Loaded configuration");

    let mailer: Box<dyn Mailer> = match SmtpConfig::from_env() {
        Some(smtp) => Box::new(SmtpMailer::new(smtp, &config.public_url).map_err(anyhow::Error::msg)?),
        None => {
            tracing::warn!("SMTP not configured, activation links go to the console");
            Box::new(ConsoleMailer::new(&config.public_url))
        }
    };

    match &config.database_path {
        Some(path) => {
            let store = Arc::new(SqliteStore::open(path)?);
            tracing::info!(path = %path, "Using SQLite store");
            let state = AppState::new(
                &config.relay,
                Arc::clone(&store),
                Arc::clone(&store),
                store,
                mailer,
            );
            serve(&config, state).await
        }
        None => {
            tracing::warn!("No database configured, data is kept in memory only");
            let state = AppState::new(
                &config.relay,
                InMemoryAccountStore::new(),
                InMemorySessionStore::new(),
                InMemoryMailboxStore::new(),
                mailer,
            );
            serve(&config, state).await
        }
    }
}

/// Log to the configured file, or to stdout when none is set
fn init_tracing(config: &Config) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "push_relay_server=debug,push_relay_core=info,tower_http=debug".into()
    });

    let (stdout_layer, file_layer) = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("error opening log file {}", path.display()))?;
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            (None, Some(layer))
        }
        None => (Some(tracing_subscriber::fmt::layer()), None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    Ok(())
}

async fn serve<A, S, M, E>(config: &Config, state: AppState<A, S, M, E>) -> Result<()>
where
    A: AccountStore + 'static,
    S: SessionStore + 'static,
    M: MailboxStore + 'static,
    E: Mailer + 'static,
{
    let app = routes::create_router(Arc::new(state));

    let addr = config.listen_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Relay listening on http://{}", addr);
    tracing::info!("Activation links point at {}", config.public_url);

    axum::serve(listener, app).await?;

    Ok(())
}
