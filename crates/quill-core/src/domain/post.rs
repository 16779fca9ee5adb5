use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a text post owned by exactly one user.
///
/// `id`, `user_id` and `created_at` are fixed at creation. Only `title`
/// and `content` ever change, and only through [`PostChanges`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post owned by `user_id`.
    pub fn new(user_id: Uuid, title: String, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title,
            content,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether `user_id` owns this post.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Overwrite the mutable fields in place.
    pub fn apply(&mut self, changes: PostChanges) {
        self.title = changes.title;
        self.content = changes.content;
        self.updated_at = changes.updated_at;
    }
}

/// Validated title and content, as submitted for create or update.
///
/// Callers are expected to have trimmed and checked both fields already.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostInput {
    pub title: String,
    pub content: String,
}

impl PostInput {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// The fields a store is allowed to overwrite on an existing post.
///
/// `updated_at` is stamped once here so the store and the caller agree on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostChanges {
    pub title: String,
    pub content: String,
    pub updated_at: DateTime<Utc>,
}

impl PostChanges {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            updated_at: Utc::now(),
        }
    }
}

impl From<PostInput> for PostChanges {
    fn from(input: PostInput) -> Self {
        Self::new(input.title, input.content)
    }
}
