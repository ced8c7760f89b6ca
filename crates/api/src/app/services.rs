//! Service wiring shared by all handlers.

use std::sync::Arc;
use std::time::Duration;

use warbler_auth::{Clock, SystemClock, TokenIssuer, TokenValidator};
use warbler_infra::{InMemoryPostStore, InMemoryPrincipalStore, PostService, PostStore, PrincipalStore};

use crate::config::ApiConfig;
use crate::middleware::AuthState;

pub struct AppServices {
    pub principals: Arc<dyn PrincipalStore>,
    pub posts: PostService<Arc<dyn PostStore>>,
    pub issuer: TokenIssuer,
    pub validator: Arc<TokenValidator>,
    pub token_ttl: chrono::Duration,
    pub clock: Arc<dyn Clock>,
    pub principal_lookup_timeout: Duration,
}

impl AppServices {
    /// Wire services from explicit collaborators (tests inject stores and clocks here).
    pub fn new(
        config: &ApiConfig,
        principals: Arc<dyn PrincipalStore>,
        posts: Arc<dyn PostStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            principals,
            posts: PostService::new(posts, clock.clone()),
            issuer: config.auth.issuer(),
            validator: Arc::new(config.auth.validator()),
            token_ttl: config.auth.token_ttl(),
            clock,
            principal_lookup_timeout: config.principal_lookup_timeout,
        }
    }

    /// In-memory stores and the system clock.
    pub fn in_memory(config: &ApiConfig) -> Self {
        Self::new(
            config,
            Arc::new(InMemoryPrincipalStore::new()),
            Arc::new(InMemoryPostStore::new()),
            Arc::new(SystemClock),
        )
    }

    pub fn auth_state(&self) -> AuthState {
        AuthState {
            validator: self.validator.clone(),
            principals: self.principals.clone(),
            clock: self.clock.clone(),
            lookup_timeout: self.principal_lookup_timeout,
        }
    }
}
