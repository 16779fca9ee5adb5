//! Post lifecycle: list, read, create, update and delete.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Page, Post, PostChanges, PostInput};
use crate::error::DomainError;
use crate::policy::OwnershipPolicy;
use crate::ports::{PostStore, UserRepository};

/// Orchestrates validated input, the ownership gate and store calls.
///
/// The acting user is always an explicit argument. Input is assumed to be
/// validated already; this layer never inspects field contents.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostStore>,
    users: Arc<dyn UserRepository>,
    policy: OwnershipPolicy,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostStore>, users: Arc<dyn UserRepository>) -> Self {
        let policy = OwnershipPolicy::new(posts.clone());
        Self {
            posts,
            users,
            policy,
        }
    }

    /// One page of posts in insertion order. `page` is 1-based; 0 is read as 1.
    pub async fn list(&self, page: u64, per_page: u64) -> Result<Page<Post>, DomainError> {
        let page = page.max(1);
        let offset = (page - 1).saturating_mul(per_page);

        let (items, total) = self.posts.paginate(offset, per_page).await?;
        Ok(Page::new(items, total, page, per_page))
    }

    pub async fn get(&self, post_id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(post_id))
    }

    pub async fn create(&self, owner_id: Uuid, input: PostInput) -> Result<Post, DomainError> {
        let post = Post::new(owner_id, input.title, input.content);

        match self.posts.insert(post.clone()).await {
            Ok(id) => {
                tracing::info!(post_id = %id, user_id = %owner_id, "Post created");
                Ok(Post { id, ..post })
            }
            Err(e) => {
                tracing::error!(user_id = %owner_id, error = %e, "Failed to create post");
                Err(DomainError::CreationFailed(e.to_string()))
            }
        }
    }

    /// The post as it should appear in its owner's edit form.
    pub async fn edit(&self, post_id: Uuid, acting_user_id: Uuid) -> Result<Post, DomainError> {
        self.authorize(post_id, acting_user_id).await
    }

    /// Overwrite title and content. Identity fields are left untouched.
    pub async fn update(
        &self,
        post_id: Uuid,
        acting_user_id: Uuid,
        input: PostInput,
    ) -> Result<Post, DomainError> {
        let mut post = self.authorize(post_id, acting_user_id).await?;
        let changes: PostChanges = input.into();

        match self.posts.update(post_id, changes.clone()).await {
            Ok(true) => {
                tracing::info!(post_id = %post_id, "Post updated");
                post.apply(changes);
                Ok(post)
            }
            // Removed between the ownership check and the write.
            Ok(false) => Err(DomainError::post_not_found(post_id)),
            Err(e) => {
                tracing::error!(post_id = %post_id, error = %e, "Failed to update post");
                Err(DomainError::PersistenceFailed {
                    operation: "update",
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Hard delete.
    pub async fn delete(&self, post_id: Uuid, acting_user_id: Uuid) -> Result<(), DomainError> {
        self.authorize(post_id, acting_user_id).await?;

        match self.posts.delete_by_id(post_id).await {
            Ok(true) => {
                tracing::info!(post_id = %post_id, "Post deleted");
                Ok(())
            }
            Ok(false) => Err(DomainError::post_not_found(post_id)),
            Err(e) => {
                tracing::error!(post_id = %post_id, error = %e, "Failed to delete post");
                Err(DomainError::PersistenceFailed {
                    operation: "delete",
                    reason: e.to_string(),
                })
            }
        }
    }

    /// See [`OwnershipPolicy::can_mutate`].
    pub async fn can_mutate(&self, acting_user_id: Uuid, post_id: Uuid) -> Result<bool, DomainError> {
        Ok(self.policy.can_mutate(acting_user_id, post_id).await?)
    }

    /// Display names of the owners of `posts`.
    pub async fn author_names(&self, posts: &[Post]) -> Result<HashMap<Uuid, String>, DomainError> {
        let mut ids: Vec<Uuid> = posts.iter().map(|p| p.user_id).collect();
        ids.sort_unstable();
        ids.dedup();

        Ok(self.users.find_names(&ids).await?)
    }

    /// Resolve the post, then apply the ownership gate. Missing posts are
    /// NotFound, never Forbidden.
    async fn authorize(&self, post_id: Uuid, acting_user_id: Uuid) -> Result<Post, DomainError> {
        let post = self.get(post_id).await?;

        if !OwnershipPolicy::permits(&post, acting_user_id) {
            tracing::warn!(
                post_id = %post_id,
                user_id = %acting_user_id,
                "Rejected mutation by non-owner"
            );
            return Err(DomainError::Forbidden);
        }

        Ok(post)
    }
}
