use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use warbler_auth::{Clock, OwnershipError, Principal, authorize};
use warbler_core::{DomainError, PostId, UserId};

use super::{Post, PostStore, validate_content};

/// Mutation kinds guarded by ownership.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PostAction {
    Update,
    Delete,
}

impl fmt::Display for PostAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PostAction::Update => "update",
            PostAction::Delete => "delete",
        })
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PostError {
    #[error("Post not found with id : '{0}'")]
    NotFound(PostId),

    #[error("You are not authorized to {action} this post.")]
    Forbidden {
        action: PostAction,
        #[source]
        source: OwnershipError,
    },

    #[error(transparent)]
    Validation(#[from] DomainError),
}

/// Post use cases.
///
/// Every mutation takes the acting principal explicitly; nothing is read from
/// ambient request state.
pub struct PostService<S> {
    store: S,
    clock: Arc<dyn Clock>,
}

impl<S: PostStore> PostService<S> {
    pub fn new(store: S, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn create(&self, principal: &Principal, content: &str) -> Result<Post, PostError> {
        validate_content(content)?;

        let now = self.clock.now();
        let post = Post {
            id: PostId::new(),
            owner_id: principal.id,
            content: content.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.store.upsert(post.clone());

        tracing::debug!(post_id = %post.id, owner_id = %post.owner_id, "post created");
        Ok(post)
    }

    pub fn get(&self, id: PostId) -> Result<Post, PostError> {
        self.store.get(id).ok_or(PostError::NotFound(id))
    }

    pub fn list_by_owner(&self, owner_id: UserId) -> Vec<Post> {
        self.store.list_by_owner(owner_id)
    }

    pub fn update(&self, principal: &Principal, id: PostId, content: &str) -> Result<Post, PostError> {
        let mut post = self.get(id)?;
        self.guard(principal, &post, PostAction::Update)?;
        validate_content(content)?;

        post.content = content.to_string();
        post.updated_at = self.clock.now();
        self.store.upsert(post.clone());
        Ok(post)
    }

    pub fn delete(&self, principal: &Principal, id: PostId) -> Result<(), PostError> {
        let post = self.get(id)?;
        self.guard(principal, &post, PostAction::Delete)?;

        self.store.remove(id);
        tracing::debug!(post_id = %id, owner_id = %post.owner_id, "post deleted");
        Ok(())
    }

    fn guard(&self, principal: &Principal, post: &Post, action: PostAction) -> Result<(), PostError> {
        authorize(principal.id, post.owner_id).map_err(|source| {
            tracing::warn!(
                principal_id = %principal.id,
                owner_id = %post.owner_id,
                post_id = %post.id,
                %action,
                "ownership check denied"
            );
            PostError::Forbidden { action, source }
        })
    }
}
