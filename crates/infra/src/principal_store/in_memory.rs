use std::collections::HashMap;
use std::sync::RwLock;

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};

use warbler_auth::Principal;
use warbler_core::UserId;

use super::{NewPrincipal, PrincipalStore, StoreError};

/// Verified against when no account matches, so an unknown name costs the
/// same argon2 run as a wrong password. Uses the default argon2 parameters.
const UNKNOWN_ACCOUNT_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$d2FyYmxlci11bmtub3duIQ$cFAAJ8PxoPjACO6tlxUYa7ZZ3aMJfBcxgD6Vvzk3xR4";

#[derive(Debug, Clone)]
struct Account {
    principal: Principal,
    password_hash: String,
}

/// In-memory principal store for tests/dev.
///
/// Passwords are stored as argon2 PHC strings. Hashing and verification run
/// on the blocking pool.
#[derive(Debug, Default)]
pub struct InMemoryPrincipalStore {
    accounts: RwLock<HashMap<UserId, Account>>,
}

impl InMemoryPrincipalStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn find(&self, name_or_email: &str) -> Result<Option<Account>, StoreError> {
        let accounts = self
            .accounts
            .read()
            .map_err(|_| StoreError::Unavailable("account map poisoned".to_string()))?;
        Ok(accounts
            .values()
            .find(|a| a.principal.username == name_or_email || a.principal.email == name_or_email)
            .cloned())
    }
}

fn hash_password(password: &str) -> Result<String, StoreError> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| StoreError::Unavailable(e.to_string()))?;
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| StoreError::Unavailable(e.to_string()))?;
    let phc = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| StoreError::Unavailable(e.to_string()))?
        .to_string();
    Ok(phc)
}

/// The hash a login attempt is checked against.
fn credential_hash(account: Option<&Account>) -> &str {
    account.map_or(UNKNOWN_ACCOUNT_HASH, |a| a.password_hash.as_str())
}

fn verify_password(hash: &str, password: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

async fn blocking<T, F>(f: F) -> Result<T, StoreError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StoreError::Unavailable(e.to_string()))
}

#[async_trait::async_trait]
impl PrincipalStore for InMemoryPrincipalStore {
    async fn load_by_id(&self, id: UserId) -> Result<Option<Principal>, StoreError> {
        let accounts = self
            .accounts
            .read()
            .map_err(|_| StoreError::Unavailable("account map poisoned".to_string()))?;
        Ok(accounts.get(&id).map(|a| a.principal.clone()))
    }

    async fn load_by_name_or_email(
        &self,
        name_or_email: &str,
    ) -> Result<Option<Principal>, StoreError> {
        Ok(self.find(name_or_email)?.map(|a| a.principal))
    }

    async fn authenticate(
        &self,
        name_or_email: &str,
        password: &str,
    ) -> Result<Option<Principal>, StoreError> {
        let account = self.find(name_or_email)?;

        let hash = credential_hash(account.as_ref()).to_string();
        let password = password.to_string();
        let verified = blocking(move || verify_password(&hash, &password)).await?;

        Ok(account.filter(|_| verified).map(|a| a.principal))
    }

    async fn register(&self, new: NewPrincipal) -> Result<Principal, StoreError> {
        let password = new.password().to_string();
        let password_hash = blocking(move || hash_password(&password)).await??;

        let mut accounts = self
            .accounts
            .write()
            .map_err(|_| StoreError::Unavailable("account map poisoned".to_string()))?;

        // Uniqueness is checked under the write lock.
        if accounts.values().any(|a| a.principal.username == new.username()) {
            return Err(StoreError::username_taken(new.username()));
        }
        if accounts.values().any(|a| a.principal.email == new.email()) {
            return Err(StoreError::email_taken(new.email()));
        }

        let principal = Principal::new(UserId::new(), new.username(), new.email());
        accounts.insert(
            principal.id,
            Account {
                principal: principal.clone(),
                password_hash,
            },
        );

        tracing::info!(principal_id = %principal.id, username = %principal.username, "registered principal");
        Ok(principal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> NewPrincipal {
        NewPrincipal::new("alice", "alice@example.com", "correct horse").unwrap()
    }

    #[tokio::test]
    async fn registered_principals_load_by_id_name_and_email() {
        let store = InMemoryPrincipalStore::new();
        let alice = store.register(alice()).await.unwrap();

        assert_eq!(store.load_by_id(alice.id).await.unwrap(), Some(alice.clone()));
        assert_eq!(store.load_by_name_or_email("alice").await.unwrap(), Some(alice.clone()));
        assert_eq!(
            store.load_by_name_or_email("alice@example.com").await.unwrap(),
            Some(alice)
        );
        assert_eq!(store.load_by_id(UserId::new()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn authenticate_checks_the_password() {
        let store = InMemoryPrincipalStore::new();
        let alice = store.register(alice()).await.unwrap();

        assert_eq!(
            store.authenticate("alice", "correct horse").await.unwrap(),
            Some(alice.clone())
        );
        assert_eq!(
            store.authenticate("alice@example.com", "correct horse").await.unwrap(),
            Some(alice)
        );
        assert_eq!(store.authenticate("alice", "wrong").await.unwrap(), None);
        assert_eq!(store.authenticate("nobody", "correct horse").await.unwrap(), None);
    }

    #[tokio::test]
    async fn duplicate_username_or_email_conflicts() {
        let store = InMemoryPrincipalStore::new();
        store.register(alice()).await.unwrap();

        let same_name = NewPrincipal::new("alice", "other@example.com", "pw").unwrap();
        assert_eq!(
            store.register(same_name).await.unwrap_err(),
            StoreError::username_taken("alice")
        );

        let same_email = NewPrincipal::new("alicia", "alice@example.com", "pw").unwrap();
        assert_eq!(
            store.register(same_email).await.unwrap_err(),
            StoreError::email_taken("alice@example.com")
        );
    }

    #[test]
    fn stored_hashes_are_phc_strings() {
        let phc = hash_password("pw").unwrap();
        assert!(phc.starts_with("$argon2"));
        assert!(verify_password(&phc, "pw"));
        assert!(!verify_password(&phc, "pW"));
        assert!(!verify_password("not-a-phc-string", "pw"));
    }

    #[test]
    fn unknown_accounts_are_checked_against_a_real_argon2_hash() {
        assert_eq!(credential_hash(None), UNKNOWN_ACCOUNT_HASH);

        let parsed = PasswordHash::new(UNKNOWN_ACCOUNT_HASH).unwrap();
        assert_eq!(parsed.algorithm, argon2::Algorithm::Argon2id.ident());
        let params = argon2::Params::try_from(&parsed).unwrap();
        let defaults = argon2::Params::default();
        assert_eq!(params.m_cost(), defaults.m_cost());
        assert_eq!(params.t_cost(), defaults.t_cost());
        assert_eq!(params.p_cost(), defaults.p_cost());

        // It parses, so verification runs the full hash and then fails.
        assert!(!verify_password(UNKNOWN_ACCOUNT_HASH, ""));
        assert!(!verify_password(UNKNOWN_ACCOUNT_HASH, "correct horse"));
    }

    #[test]
    fn known_accounts_are_checked_against_their_own_hash() {
        let account = Account {
            principal: Principal::new(UserId::new(), "alice", "alice@example.com"),
            password_hash: hash_password("pw").unwrap(),
        };
        assert_eq!(credential_hash(Some(&account)), account.password_hash);
        assert_ne!(credential_hash(Some(&account)), UNKNOWN_ACCOUNT_HASH);
    }
}
