//! Principal Store: the identity backend the request binder resolves against.

mod in_memory;

pub use in_memory::InMemoryPrincipalStore;

use std::sync::Arc;

use thiserror::Error;

use warbler_auth::Principal;
use warbler_core::{DomainError, DomainResult, UserId};

pub const USERNAME_MIN_CHARS: usize = 3;
pub const USERNAME_MAX_CHARS: usize = 30;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Username or email already taken; the message is client-facing.
    #[error("{0}")]
    Conflict(String),

    #[error("principal store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn username_taken(username: &str) -> Self {
        Self::Conflict(format!("Username '{username}' already exists."))
    }

    pub fn email_taken(email: &str) -> Self {
        Self::Conflict(format!("Email '{email}' already exists."))
    }
}

/// A validated registration request.
#[derive(Clone, PartialEq, Eq)]
pub struct NewPrincipal {
    username: String,
    email: String,
    password: String,
}

impl NewPrincipal {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> DomainResult<Self> {
        let username = username.into().trim().to_string();
        let email = email.into().trim().to_string();
        let password = password.into();

        let len = username.chars().count();
        if !(USERNAME_MIN_CHARS..=USERNAME_MAX_CHARS).contains(&len) {
            return Err(DomainError::validation(format!(
                "username must be between {USERNAME_MIN_CHARS} and {USERNAME_MAX_CHARS} characters"
            )));
        }
        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::validation("email must be a valid address"));
        }
        if password.is_empty() {
            return Err(DomainError::validation("password must not be empty"));
        }

        Ok(Self {
            username,
            email,
            password,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl core::fmt::Debug for NewPrincipal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NewPrincipal")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Source of principals.
///
/// Lookups return a fresh snapshot on every call; callers must not cache the
/// result across requests.
#[async_trait::async_trait]
pub trait PrincipalStore: Send + Sync {
    async fn load_by_id(&self, id: UserId) -> Result<Option<Principal>, StoreError>;

    async fn load_by_name_or_email(
        &self,
        name_or_email: &str,
    ) -> Result<Option<Principal>, StoreError>;

    /// Verify a password against the stored credential.
    ///
    /// `Ok(None)` covers both an unknown account and a wrong password.
    async fn authenticate(
        &self,
        name_or_email: &str,
        password: &str,
    ) -> Result<Option<Principal>, StoreError>;

    async fn register(&self, new: NewPrincipal) -> Result<Principal, StoreError>;
}

#[async_trait::async_trait]
impl<S> PrincipalStore for Arc<S>
where
    S: PrincipalStore + ?Sized,
{
    async fn load_by_id(&self, id: UserId) -> Result<Option<Principal>, StoreError> {
        (**self).load_by_id(id).await
    }

    async fn load_by_name_or_email(
        &self,
        name_or_email: &str,
    ) -> Result<Option<Principal>, StoreError> {
        (**self).load_by_name_or_email(name_or_email).await
    }

    async fn authenticate(
        &self,
        name_or_email: &str,
        password: &str,
    ) -> Result<Option<Principal>, StoreError> {
        (**self).authenticate(name_or_email, password).await
    }

    async fn register(&self, new: NewPrincipal) -> Result<Principal, StoreError> {
        (**self).register(new).await
    }
}
