//! Posts: the owned resource that exercises the ownership guard.

mod in_memory;
mod service;

pub use in_memory::InMemoryPostStore;
pub use service::{PostAction, PostError, PostService};

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use warbler_core::{DomainError, DomainResult, PostId, UserId};

pub const MAX_CONTENT_CHARS: usize = 280;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub owner_id: UserId,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validate post content: non-blank, at most [`MAX_CONTENT_CHARS`] characters.
pub fn validate_content(content: &str) -> DomainResult<()> {
    if content.trim().is_empty() {
        return Err(DomainError::validation("content must not be empty"));
    }
    if content.chars().count() > MAX_CONTENT_CHARS {
        return Err(DomainError::validation(format!(
            "content must be at most {MAX_CONTENT_CHARS} characters"
        )));
    }
    Ok(())
}

/// Post storage abstraction.
pub trait PostStore: Send + Sync {
    fn get(&self, id: PostId) -> Option<Post>;
    fn upsert(&self, post: Post);
    fn remove(&self, id: PostId) -> Option<Post>;
    /// Posts by `owner_id`, newest first.
    fn list_by_owner(&self, owner_id: UserId) -> Vec<Post>;
}

impl<S> PostStore for Arc<S>
where
    S: PostStore + ?Sized,
{
    fn get(&self, id: PostId) -> Option<Post> {
        (**self).get(id)
    }

    fn upsert(&self, post: Post) {
        (**self).upsert(post)
    }

    fn remove(&self, id: PostId) -> Option<Post> {
        (**self).remove(id)
    }

    fn list_by_owner(&self, owner_id: UserId) -> Vec<Post> {
        (**self).list_by_owner(owner_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_bounds() {
        assert!(validate_content("hello").is_ok());
        assert!(validate_content("   ").is_err());
        assert!(validate_content("").is_err());
        assert!(validate_content(&"é".repeat(280)).is_ok());
        assert!(validate_content(&"é".repeat(281)).is_err());
    }
}
