use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Post, PostChanges};
use quill_core::error::RepoError;
use quill_core::ports::PostStore;

/// Post store backed by an insertion-ordered `Vec` behind an async RwLock.
///
/// Each call takes the lock once, so every operation is atomic per record
/// and concurrent updates to one post resolve last-write-wins.
pub struct InMemoryPostStore {
    posts: RwLock<Vec<Post>>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryPostStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn insert(&self, post: Post) -> Result<Uuid, RepoError> {
        let mut posts = self.posts.write().await;

        if posts.iter().any(|p| p.id == post.id) {
            return Err(RepoError::Constraint(format!("post {} already exists", post.id)));
        }

        let id = post.id;
        posts.push(post);
        Ok(id)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let posts = self.posts.read().await;
        Ok(posts.iter().find(|p| p.id == id).cloned())
    }

    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<bool, RepoError> {
        let mut posts = self.posts.write().await;

        match posts.iter_mut().find(|p| p.id == id) {
            Some(post) => {
                post.apply(changes);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut posts = self.posts.write().await;

        match posts.iter().position(|p| p.id == id) {
            Some(index) => {
                // `remove`, not `swap_remove`: listing order is insertion order.
                posts.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn paginate(&self, offset: u64, limit: u64) -> Result<(Vec<Post>, u64), RepoError> {
        let posts = self.posts.read().await;
        let total = posts.len() as u64;

        let page = posts
            .iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Ok((page, total))
    }
}
