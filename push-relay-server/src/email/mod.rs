//! Activation mail senders

pub mod console;
pub mod smtp;

pub use console::ConsoleMailer;
pub use smtp::{SmtpConfig, SmtpMailer};

/// Build the link an account owner follows to activate
pub fn activation_link(public_url: &str, email: &str, token: &str) -> String {
    format!(
        "{}/activate?email={}&key={}",
        public_url,
        urlencoding::encode(email),
        urlencoding::encode(token)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activation_link_is_encoded() {
        let link = activation_link("https://push.example.com", "a+b@example.com", "x_y-z");
        assert_eq!(
            link,
            "https://push.example.com/activate?email=a%2Bb%40example.com&key=x_y-z"
        );
    }
}
