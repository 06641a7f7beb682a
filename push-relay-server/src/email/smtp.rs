//! Activation mail over SMTP

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use push_relay_core::Mailer;

use super::activation_link;

const ACTIVATION_SUBJECT: &str = "Activate your push relay account";

/// Connection and sender settings, read from `SMTP_*` variables
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    /// 465 (implicit TLS) unless `SMTP_PORT` says otherwise
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_email: String,
    pub from_name: Option<String>,
}

impl SmtpConfig {
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// `None` unless host, credentials and sender are all present
    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        Some(Self {
            host: get("SMTP_HOST")?,
            port: get("SMTP_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(465),
            username: get("SMTP_USERNAME")?,
            password: get("SMTP_PASSWORD")?,
            from_email: get("SMTP_FROM_EMAIL")?,
            from_name: get("SMTP_FROM_NAME"),
        })
    }

    /// The From mailbox, with display name when one is configured
    pub fn sender(&self) -> Result<Mailbox, String> {
        let address = self
            .from_email
            .parse()
            .map_err(|e| format!("Invalid from address {}: {}", self.from_email, e))?;
        Ok(Mailbox::new(self.from_name.clone(), address))
    }
}

/// Build the plain-text activation mail for `to`.
///
/// The body carries both the clickable link and the bare key, for clients
/// that activate by form instead of following links.
pub fn activation_message(from: Mailbox, to: &str, link: &str, key: &str) -> Result<Message, String> {
    let recipient: Mailbox = to
        .parse()
        .map_err(|e| format!("Invalid recipient {}: {}", to, e))?;

    let body = format!(
        "Activate your push relay account by opening this link:\n\n{}\n\n\
         Activation key: {}\n\n\
         If you did not register, ignore this message.\n",
        link, key
    );

    Message::builder()
        .from(from)
        .to(recipient)
        .subject(ACTIVATION_SUBJECT)
        .header(ContentType::TEXT_PLAIN)
        .body(body)
        .map_err(|e| format!("Failed to build activation mail: {}", e))
}

pub struct SmtpMailer {
    transport: SmtpTransport,
    sender: Mailbox,
    public_url: String,
}

impl SmtpMailer {
    /// Connect to the relay host and verify it answers before serving
    pub fn new(config: SmtpConfig, public_url: &str) -> Result<Self, String> {
        let sender = config.sender()?;

        let transport = SmtpTransport::relay(&config.host)
            .map_err(|e| format!("Failed to create SMTP transport: {}", e))?
            .port(config.port)
            .credentials(Credentials::new(config.username, config.password))
            .build();

        transport
            .test_connection()
            .map_err(|e| format!("SMTP connection test failed: {}", e))?;

        tracing::info!(host = %config.host, port = config.port, "SMTP connection established");

        Ok(Self {
            transport,
            sender,
            public_url: public_url.to_string(),
        })
    }
}

impl Mailer for SmtpMailer {
    fn send_activation(&self, email: &str, token: &str) -> Result<(), String> {
        let link = activation_link(&self.public_url, email, token);
        let message = activation_message(self.sender.clone(), email, &link, token)?;

        self.transport
            .send(&message)
            .map_err(|e| format!("Failed to send activation mail: {}", e))?;

        tracing::info!(email = %email, "Activation email sent");
        Ok(())
    }
}
