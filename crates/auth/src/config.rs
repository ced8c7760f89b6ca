//! Token configuration: the shared secret and the token lifetime.

use chrono::Duration;
use thiserror::Error;

use crate::codec::TokenCodec;
use crate::issuer::TokenIssuer;
use crate::signer::{Hs256Signer, SecretError, SigningSecret};
use crate::validator::TokenValidator;

/// Default token lifetime: 24 hours.
pub const DEFAULT_TOKEN_TTL_MS: i64 = 86_400_000;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required setting `{0}`")]
    Missing(&'static str),

    #[error("invalid value for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error(transparent)]
    Secret(#[from] SecretError),
}

/// Validated token settings.
///
/// Built once at startup; the issuer and validator derived from it share the
/// same key material.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    signer: Hs256Signer,
    token_ttl: Duration,
}

impl AuthConfig {
    pub const SECRET_KEY: &'static str = "APP_JWT_SECRET";
    pub const TTL_KEY: &'static str = "APP_JWT_EXPIRATION_MS";

    pub fn new(secret: SigningSecret, token_ttl: Duration) -> Result<Self, ConfigError> {
        if token_ttl.num_milliseconds() < 1 {
            return Err(ConfigError::Invalid {
                key: Self::TTL_KEY,
                reason: "must be a positive number of milliseconds".to_string(),
            });
        }
        let signer = Hs256Signer::new(&secret)?;
        Ok(Self { signer, token_ttl })
    }

    /// Build from raw settings values (as read from the environment).
    ///
    /// The secret is required; the ttl falls back to [`DEFAULT_TOKEN_TTL_MS`].
    pub fn from_settings(secret: Option<&str>, ttl_ms: Option<&str>) -> Result<Self, ConfigError> {
        let secret = secret
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing(Self::SECRET_KEY))?;
        let secret = SigningSecret::from_base64(secret)?;

        let ttl_ms = match ttl_ms {
            Some(raw) => raw.trim().parse::<i64>().map_err(|e| ConfigError::Invalid {
                key: Self::TTL_KEY,
                reason: e.to_string(),
            })?,
            None => DEFAULT_TOKEN_TTL_MS,
        };

        Self::new(secret, Duration::milliseconds(ttl_ms))
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    pub fn codec(&self) -> TokenCodec {
        TokenCodec::new(self.signer.clone())
    }

    pub fn issuer(&self) -> TokenIssuer {
        TokenIssuer::new(self.codec())
    }

    pub fn validator(&self) -> TokenValidator {
        TokenValidator::new(self.codec())
    }
}
