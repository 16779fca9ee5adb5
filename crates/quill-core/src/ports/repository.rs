use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Post, PostChanges, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Resolve display names for a set of user ids. Unknown ids are absent
    /// from the result.
    async fn find_names(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>, RepoError>;
}

/// Keyed storage for posts.
///
/// Every call is atomic per record; a failed write leaves nothing behind.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Persist a new post and return its id.
    async fn insert(&self, post: Post) -> Result<Uuid, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError>;

    /// Overwrite title and content. Returns `false` if no such post exists.
    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<bool, RepoError>;

    /// Hard delete. Returns `false` if no such post exists.
    async fn delete_by_id(&self, id: Uuid) -> Result<bool, RepoError>;

    /// Posts in insertion order, skipping `offset` and taking at most
    /// `limit`, together with the total number of posts.
    async fn paginate(&self, offset: u64, limit: u64) -> Result<(Vec<Post>, u64), RepoError>;
}
