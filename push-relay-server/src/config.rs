//! Server configuration

use std::path::PathBuf;

use push_relay_core::RelayConfig;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address to bind
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Base URL used in activation links
    pub public_url: String,

    /// SQLite database path; in-memory stores when unset
    pub database_path: Option<String>,

    /// Log to this file instead of stdout
    pub log_file: Option<PathBuf>,

    /// Settings handed to the delivery coordinator
    pub relay: RelayConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            public_url: "http://localhost:8080".to_string(),
            database_path: None,
            log_file: None,
            relay: RelayConfig::default(),
        }
    }
}

impl Config {
    /// Create config from environment variables
    ///
    /// All optional:
    /// - PUSH_RELAY_HOST (default: 0.0.0.0)
    /// - PUSH_RELAY_PORT (default: 8080)
    /// - PUSH_RELAY_PUBLIC_URL (default: http://localhost:{port})
    /// - PUSH_RELAY_DATABASE
    /// - PUSH_RELAY_LOG_FILE
    /// - PUSH_RELAY_BCRYPT_COST (default: 12)
    /// - PUSH_RELAY_TOKEN_BYTES (default: 32)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|s| !s.is_empty());
        let mut config = Config::default();

        if let Some(host) = get("PUSH_RELAY_HOST") {
            config.host = host;
        }
        if let Some(port) = get("PUSH_RELAY_PORT") {
            config.port = parse("PUSH_RELAY_PORT", port)?;
        }
        config.public_url = get("PUSH_RELAY_PUBLIC_URL")
            .unwrap_or_else(|| format!("http://localhost:{}", config.port))
            .trim_end_matches('/')
            .to_string();
        config.database_path = get("PUSH_RELAY_DATABASE");
        config.log_file = get("PUSH_RELAY_LOG_FILE").map(PathBuf::from);

        if let Some(cost) = get("PUSH_RELAY_BCRYPT_COST") {
            let cost: u32 = parse("PUSH_RELAY_BCRYPT_COST", cost)?;
            if !BCRYPT_COST_RANGE.contains(&cost) {
                return Err(ConfigError::Invalid {
                    key: "PUSH_RELAY_BCRYPT_COST",
                    value: cost.to_string(),
                });
            }
            config.relay.bcrypt_cost = cost;
        }
        if let Some(bytes) = get("PUSH_RELAY_TOKEN_BYTES") {
            let bytes: usize = parse("PUSH_RELAY_TOKEN_BYTES", bytes)?;
            if bytes < MIN_TOKEN_BYTES {
                return Err(ConfigError::Invalid {
                    key: "PUSH_RELAY_TOKEN_BYTES",
                    value: bytes.to_string(),
                });
            }
            config.relay.activation_token_bytes = bytes;
        }

        Ok(config)
    }

    /// Socket address string to bind
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Shortest activation token accepted from configuration
const MIN_TOKEN_BYTES: usize = 16;

/// Costs bcrypt accepts
const BCRYPT_COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;

fn parse<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}
