use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity - an author of posts.
///
/// Only `id` and `name` matter to the post lifecycle; the rest belongs to
/// authentication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamps. The email is
    /// stored in its normalized form.
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            email: Self::normalize_email(&email),
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    /// Emails identify one account regardless of case or surrounding space.
    pub fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }
}
