//! Outbound activation mail abstraction

/// Trait for delivering activation messages.
///
/// Implementations may block; the coordinator calls them off the request path.
pub trait Mailer: Send + Sync {
    /// Send an activation token to an email address
    fn send_activation(&self, email: &str, token: &str) -> Result<(), String>;
}

/// Allow using Box<dyn Mailer> as a Mailer
impl Mailer for Box<dyn Mailer> {
    fn send_activation(&self, email: &str, token: &str) -> Result<(), String> {
        (**self).send_activation(email, token)
    }
}
