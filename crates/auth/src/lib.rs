//! `warbler-auth`: stateless bearer-token authentication core.
//!
//! Signing, token encoding, issuance, validation and the ownership guard.
//! Decoupled from HTTP and storage.

pub mod authorize;
pub mod claims;
pub mod clock;
pub mod codec;
pub mod config;
pub mod issuer;
pub mod principal;
pub mod roles;
pub mod signer;
pub mod validator;

pub use authorize::{OwnershipDecision, OwnershipError, authorize, decide};
pub use claims::Claims;
pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::{DecodeError, TokenCodec};
pub use config::{AuthConfig, ConfigError, DEFAULT_TOKEN_TTL_MS};
pub use issuer::{IssueError, IssuedToken, TokenIssuer};
pub use principal::Principal;
pub use roles::Role;
pub use signer::{Hs256Signer, MIN_SECRET_BYTES, SecretError, Signer, SigningSecret};
pub use validator::{TokenError, TokenValidator, ValidationResult};
