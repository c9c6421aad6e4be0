//! HTTP server settings read from the environment.

use crate::errors::{Error, Result};
use std::net::SocketAddr;
use tracing::warn;

const DEFAULT_ADDR: &str = "0.0.0.0:3001";
const DEV_TOKEN_SECRET: &str = "marmita-dev-secret";

/// Settings for the HTTP backend and the service it wraps.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the listener binds to (`HTTP_ADDR`)
    pub addr: SocketAddr,
    /// HMAC key for bearer tokens (`TOKEN_SECRET`)
    pub token_secret: String,
    /// Whether service calls sleep like a remote backend would (`SIMULATED_LATENCY`)
    pub simulated_latency: bool,
    /// Path of the TOML seed file (`SEED_FILE`)
    pub seed_file: String,
}

impl ServerConfig {
    /// Reads the settings, applying defaults for anything unset.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if `HTTP_ADDR` is not a socket address or
    /// `SIMULATED_LATENCY` is not `true`/`false`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let addr_raw = lookup("HTTP_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr_raw.parse().map_err(|e| Error::Config {
            message: format!("Invalid HTTP_ADDR '{addr_raw}': {e}"),
        })?;

        let token_secret = lookup("TOKEN_SECRET").unwrap_or_else(|| {
            warn!("TOKEN_SECRET not set, using the development secret");
            DEV_TOKEN_SECRET.to_string()
        });

        let simulated_latency = match lookup("SIMULATED_LATENCY").as_deref() {
            None => false,
            Some(raw) => raw.trim().parse().map_err(|_| Error::Config {
                message: format!("SIMULATED_LATENCY must be true or false, got '{raw}'"),
            })?,
        };

        let seed_file = lookup("SEED_FILE").unwrap_or_else(|| "seed.toml".to_string());

        Ok(Self {
            addr,
            token_secret,
            simulated_latency,
            seed_file,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ServerConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.addr, "0.0.0.0:3001".parse().unwrap());
        assert_eq!(config.token_secret, DEV_TOKEN_SECRET);
        assert!(!config.simulated_latency);
        assert_eq!(config.seed_file, "seed.toml");
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("HTTP_ADDR", "127.0.0.1:8080"),
            ("TOKEN_SECRET", "s3cret"),
            ("SIMULATED_LATENCY", "true"),
            ("SEED_FILE", "demo.toml"),
        ])
        .unwrap();
        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.token_secret, "s3cret");
        assert!(config.simulated_latency);
        assert_eq!(config.seed_file, "demo.toml");
    }

    #[test]
    fn test_invalid_values() {
        let result = config_from(&[("HTTP_ADDR", "not an address")]);
        assert!(matches!(result, Err(Error::Config { .. })));

        let result = config_from(&[("SIMULATED_LATENCY", "sometimes")]);
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
