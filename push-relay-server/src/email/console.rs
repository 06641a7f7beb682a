//! Console-based mailer for development

use push_relay_core::Mailer;

use super::activation_link;

/// Mailer that prints activation links to the console (for development)
pub struct ConsoleMailer {
    public_url: String,
}

impl ConsoleMailer {
    pub fn new(public_url: &str) -> Self {
        Self {
            public_url: public_url.to_string(),
        }
    }
}

impl Mailer for ConsoleMailer {
    fn send_activation(&self, email: &str, token: &str) -> Result<(), String> {
        let link = activation_link(&self.public_url, email, token);

        println!();
        println!("========================================");
        println!("  ACTIVATION LINK FOR: {}", email);
        println!("  {}", link);
        println!("========================================");
        println!();

        tracing::info!(email = %email, link = %link, "Activation link issued");

        Ok(())
    }
}
