use std::collections::HashMap;
use std::sync::RwLock;

use warbler_core::{PostId, UserId};

use super::{Post, PostStore};

/// In-memory post store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryPostStore {
    inner: RwLock<HashMap<PostId, Post>>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PostStore for InMemoryPostStore {
    fn get(&self, id: PostId) -> Option<Post> {
        let map = self.inner.read().ok()?;
        map.get(&id).cloned()
    }

    fn upsert(&self, post: Post) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(post.id, post);
        }
    }

    fn remove(&self, id: PostId) -> Option<Post> {
        let mut map = self.inner.write().ok()?;
        map.remove(&id)
    }

    fn list_by_owner(&self, owner_id: UserId) -> Vec<Post> {
        let map = match self.inner.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };

        let mut posts: Vec<Post> = map.values().filter(|p| p.owner_id == owner_id).cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        posts
    }
}
