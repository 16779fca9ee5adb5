use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::User;
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, UserRepository};

/// In-memory user repository keyed by id. Emails are unique.
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;

        let taken = users
            .values()
            .any(|u| u.id != user.id && u.email.eq_ignore_ascii_case(&user.email));
        if taken {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.users.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_names(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>, RepoError> {
        let users = self.users.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| users.get(id).map(|u| (*id, u.name.clone())))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str, email: &str) -> User {
        User::new(name.to_string(), email.to_string(), "hash".to_string())
    }

    #[tokio::test]
    async fn test_save_and_find_by_email() {
        let repo = InMemoryUserRepository::new();
        let saved = repo.save(user("Test User", "test@gmail.com")).await.unwrap();

        let found = repo.find_by_email("TEST@gmail.com").await.unwrap().unwrap();
        assert_eq!(found.id, saved.id);
        assert!(repo.find_by_email("other@gmail.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = InMemoryUserRepository::new();
        repo.save(user("A", "a@example.com")).await.unwrap();

        let result = repo.save(user("B", "a@example.com")).await;
        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_find_names_skips_unknown() {
        let repo = InMemoryUserRepository::new();
        let ada = repo.save(user("Ada", "ada@example.com")).await.unwrap();
        let unknown = Uuid::new_v4();

        let names = repo.find_names(&[ada.id, unknown]).await.unwrap();
        assert_eq!(names.len(), 1);
        assert_eq!(names[&ada.id], "Ada");
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = InMemoryUserRepository::new();
        let ada = repo.save(user("Ada", "ada@example.com")).await.unwrap();

        repo.delete(ada.id).await.unwrap();
        assert!(repo.find_by_id(ada.id).await.unwrap().is_none());
        assert!(matches!(repo.delete(ada.id).await, Err(RepoError::NotFound)));
    }
}
