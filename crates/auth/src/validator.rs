use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::codec::{DecodeError, TokenCodec};
use crate::signer::{Hs256Signer, Signer};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,

    #[error("invalid token signature")]
    BadSignature,

    #[error("token has expired")]
    Expired,

    #[error("token claims are empty")]
    EmptyClaims,
}

impl TokenError {
    /// Stable, log-friendly name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            TokenError::Malformed => "malformed",
            TokenError::BadSignature => "bad_signature",
            TokenError::Expired => "expired",
            TokenError::EmptyClaims => "empty_claims",
        }
    }
}

impl From<DecodeError> for TokenError {
    fn from(value: DecodeError) -> Self {
        match value {
            DecodeError::Malformed => TokenError::Malformed,
            DecodeError::BadSignature => TokenError::BadSignature,
            DecodeError::EmptyOrInvalidClaims => TokenError::EmptyClaims,
        }
    }
}

/// `Ok` carries the token subject (the string-encoded principal id).
pub type ValidationResult = Result<String, TokenError>;

/// Verifies bearer tokens.
///
/// Pure: no I/O and no identity resolution. Resolving the subject to a
/// principal is a separate step, so a rejected token never reaches storage.
#[derive(Debug, Clone)]
pub struct TokenValidator<S = Hs256Signer> {
    codec: TokenCodec<S>,
}

impl<S: Signer> TokenValidator<S> {
    pub fn new(codec: TokenCodec<S>) -> Self {
        Self { codec }
    }

    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> ValidationResult {
        let claims = self.codec.decode(token)?;
        if !claims.is_live_at(now) {
            return Err(TokenError::Expired);
        }
        Ok(claims.sub)
    }
}
