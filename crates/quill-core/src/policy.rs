//! Ownership-based authorization for post mutation.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::Post;
use crate::error::RepoError;
use crate::ports::PostStore;

/// Decides whether an acting user may mutate a post.
///
/// There is a single rule for update, delete and edit: the actor must be
/// the post's owner. No roles, no overrides.
#[derive(Clone)]
pub struct OwnershipPolicy {
    posts: Arc<dyn PostStore>,
}

impl OwnershipPolicy {
    pub fn new(posts: Arc<dyn PostStore>) -> Self {
        Self { posts }
    }

    /// Ownership predicate on an already resolved post.
    pub fn permits(post: &Post, acting_user_id: Uuid) -> bool {
        post.is_owned_by(acting_user_id)
    }

    /// Look the post up and check ownership. A missing post yields `false`.
    pub async fn can_mutate(&self, acting_user_id: Uuid, post_id: Uuid) -> Result<bool, RepoError> {
        let allowed = self
            .posts
            .find_by_id(post_id)
            .await?
            .is_some_and(|post| Self::permits(&post, acting_user_id));

        Ok(allowed)
    }
}
