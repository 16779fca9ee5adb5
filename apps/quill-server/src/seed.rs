//! Development seed data.

use quill_core::DomainError;
use quill_core::domain::User;
use quill_core::ports::{BaseRepository, PasswordService, UserRepository};

pub const TEST_USER_NAME: &str = "Test User";
pub const TEST_USER_EMAIL: &str = "test@gmail.com";
pub const TEST_USER_PASSWORD: &str = "test1234";

/// Make sure the well-known test account exists. Idempotent.
pub async fn seed_test_user(
    users: &dyn UserRepository,
    passwords: &dyn PasswordService,
) -> Result<User, DomainError> {
    if let Some(existing) = users.find_by_email(TEST_USER_EMAIL).await? {
        tracing::debug!(user_id = %existing.id, "Test user already present");
        return Ok(existing);
    }

    let password_hash = passwords
        .hash(TEST_USER_PASSWORD)
        .map_err(|e| DomainError::Internal(e.to_string()))?;

    let user = users
        .save(User::new(
            TEST_USER_NAME.to_string(),
            TEST_USER_EMAIL.to_string(),
            password_hash,
        ))
        .await?;

    tracing::info!(user_id = %user.id, email = TEST_USER_EMAIL, "Seeded test user");
    Ok(user)
}
