use chrono::{DateTime, Duration, SubsecRound, Utc};
use thiserror::Error;

use crate::claims::Claims;
use crate::codec::TokenCodec;
use crate::principal::Principal;
use crate::signer::{Hs256Signer, Signer};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IssueError {
    #[error("token ttl must be at least one millisecond")]
    NonPositiveTtl,

    #[error("token expiry is out of range")]
    ExpiryOutOfRange,
}

/// A freshly minted token together with the claims it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

/// Mints bearer tokens for authenticated principals.
///
/// Stateless: nothing about an issued token is recorded anywhere.
#[derive(Debug, Clone)]
pub struct TokenIssuer<S = Hs256Signer> {
    codec: TokenCodec<S>,
}

impl<S: Signer> TokenIssuer<S> {
    pub fn new(codec: TokenCodec<S>) -> Self {
        Self { codec }
    }

    /// Issue a token for `principal` valid for `ttl` from `now`.
    ///
    /// Timestamps carry millisecond precision, so `ttl` must be at least 1ms;
    /// this keeps `exp > iat` for every issued token.
    pub fn issue(
        &self,
        principal: &Principal,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, IssueError> {
        if ttl.num_milliseconds() < 1 {
            return Err(IssueError::NonPositiveTtl);
        }

        let iat = now.trunc_subsecs(3);
        let exp = iat
            .checked_add_signed(ttl)
            .map(|exp| exp.trunc_subsecs(3))
            .ok_or(IssueError::ExpiryOutOfRange)?;

        let claims = Claims {
            sub: principal.id.to_string(),
            iat,
            exp,
        };
        let token = self.codec.encode(&claims);

        tracing::debug!(principal_id = %principal.id, expires_at = %exp, "issued bearer token");
        Ok(IssuedToken { token, claims })
    }
}
