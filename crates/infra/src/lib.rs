//! Infrastructure layer: identity and resource storage adapters.

pub mod posts;
pub mod principal_store;

pub use posts::{InMemoryPostStore, Post, PostAction, PostError, PostService, PostStore};
pub use principal_store::{InMemoryPrincipalStore, NewPrincipal, PrincipalStore, StoreError};
