//! Relay configuration shared by the core components

use serde::Deserialize;

/// Default bcrypt cost factor
pub const DEFAULT_BCRYPT_COST: u32 = 12;

/// Default number of random bytes in an activation token
pub const DEFAULT_TOKEN_BYTES: usize = 32;

/// Settings the coordinator is built from. Constructed once at startup.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// bcrypt cost used when hashing new passwords
    pub bcrypt_cost: u32,

    /// Random bytes per activation token (before base64 encoding)
    pub activation_token_bytes: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            activation_token_bytes: DEFAULT_TOKEN_BYTES,
        }
    }
}
