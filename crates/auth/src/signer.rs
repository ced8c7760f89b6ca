//! Keyed signing primitive (HMAC-SHA256) and the secret it is keyed with.

use base64::{Engine as _, engine::general_purpose};
use hmac::{Hmac, Mac, digest::KeyInit};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Minimum decoded secret length (256 bits).
pub const MIN_SECRET_BYTES: usize = 32;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SecretError {
    #[error("signing secret is not valid base64")]
    NotBase64,

    #[error("signing secret too short: {actual} bytes decoded, at least {MIN_SECRET_BYTES} required")]
    TooShort { actual: usize },

    #[error("signing secret rejected as an HMAC key")]
    InvalidKey,
}

/// Shared symmetric secret used to sign and verify tokens.
///
/// The raw bytes never appear in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    /// Decode a secret from its base64 configuration value.
    ///
    /// Accepts the standard alphabet (padded) and the URL-safe alphabet
    /// (unpadded). Rejects anything shorter than 256 bits after decoding.
    pub fn from_base64(encoded: &str) -> Result<Self, SecretError> {
        let trimmed = encoded.trim();
        let bytes = general_purpose::STANDARD
            .decode(trimmed)
            .or_else(|_| general_purpose::URL_SAFE_NO_PAD.decode(trimmed))
            .map_err(|_| SecretError::NotBase64)?;
        Self::from_bytes(bytes)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, SecretError> {
        if bytes.len() < MIN_SECRET_BYTES {
            return Err(SecretError::TooShort { actual: bytes.len() });
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl core::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("SigningSecret").field(&"<redacted>").finish()
    }
}

/// Signs and verifies byte payloads.
///
/// Implementations are pure and must be safe to call concurrently.
pub trait Signer: Send + Sync {
    /// JOSE algorithm name written into token headers.
    fn algorithm(&self) -> &'static str;

    fn sign(&self, payload: &[u8]) -> Vec<u8>;

    /// Returns `true` iff `signature` is the signature of `payload`.
    ///
    /// Must not leak timing information about the expected signature.
    fn verify(&self, payload: &[u8], signature: &[u8]) -> bool;
}

/// HMAC-SHA256 signer (`HS256`).
///
/// The keyed HMAC state is prepared once and cloned per operation.
#[derive(Clone)]
pub struct Hs256Signer {
    keyed: HmacSha256,
}

impl Hs256Signer {
    pub fn new(secret: &SigningSecret) -> Result<Self, SecretError> {
        let keyed = <HmacSha256 as KeyInit>::new_from_slice(secret.as_bytes())
            .map_err(|_| SecretError::InvalidKey)?;
        Ok(Self { keyed })
    }

    fn mac(&self) -> HmacSha256 {
        self.keyed.clone()
    }
}

impl core::fmt::Debug for Hs256Signer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256Signer").finish_non_exhaustive()
    }
}

impl Signer for Hs256Signer {
    fn algorithm(&self) -> &'static str {
        "HS256"
    }

    fn sign(&self, payload: &[u8]) -> Vec<u8> {
        let mut mac = self.mac();
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }

    fn verify(&self, payload: &[u8], signature: &[u8]) -> bool {
        let mut mac = self.mac();
        mac.update(payload);
        // `verify_slice` compares in constant time.
        mac.verify_slice(signature).is_ok()
    }
}
