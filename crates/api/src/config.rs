//! Startup configuration, read from the environment.

use std::net::SocketAddr;
use std::time::Duration;

use warbler_auth::{AuthConfig, ConfigError};

pub const BIND_ADDR_KEY: &str = "APP_BIND_ADDR";
pub const LOOKUP_TIMEOUT_KEY: &str = "APP_PRINCIPAL_LOOKUP_TIMEOUT_MS";

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_LOOKUP_TIMEOUT_MS: u64 = 2_000;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub auth: AuthConfig,
    pub bind_addr: SocketAddr,
    /// Upper bound on the binder's principal lookup.
    pub principal_lookup_timeout: Duration,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the process environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let auth = AuthConfig::from_settings(
            lookup(AuthConfig::SECRET_KEY).as_deref(),
            lookup(AuthConfig::TTL_KEY).as_deref(),
        )?;

        let bind_addr = lookup(BIND_ADDR_KEY)
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                key: BIND_ADDR_KEY,
                reason: e.to_string(),
            })?;

        let timeout_ms = match lookup(LOOKUP_TIMEOUT_KEY) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                key: LOOKUP_TIMEOUT_KEY,
                reason: e.to_string(),
            })?,
            None => DEFAULT_LOOKUP_TIMEOUT_MS,
        };
        if timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                key: LOOKUP_TIMEOUT_KEY,
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            auth,
            bind_addr,
            principal_lookup_timeout: Duration::from_millis(timeout_ms),
        })
    }
}
