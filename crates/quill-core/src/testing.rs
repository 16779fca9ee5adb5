//! Test doubles for the store ports.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Post, PostChanges, User};
use crate::error::RepoError;
use crate::ports::{BaseRepository, PostStore, UserRepository};

/// Vec-backed post store. Flip `reject_writes` to simulate a store that
/// refuses every write.
#[derive(Default)]
pub struct FakePostStore {
    posts: Mutex<Vec<Post>>,
    pub reject_writes: AtomicBool,
}

impl FakePostStore {
    fn check_writable(&self) -> Result<(), RepoError> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(RepoError::Query("write rejected".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl PostStore for FakePostStore {
    async fn insert(&self, post: Post) -> Result<Uuid, RepoError> {
        self.check_writable()?;
        let id = post.id;
        self.posts.lock().unwrap().push(post);
        Ok(id)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.posts.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<bool, RepoError> {
        self.check_writable()?;
        let mut posts = self.posts.lock().unwrap();
        match posts.iter_mut().find(|p| p.id == id) {
            Some(post) => {
                post.apply(changes);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, RepoError> {
        self.check_writable()?;
        let mut posts = self.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|p| p.id != id);
        Ok(posts.len() != before)
    }

    async fn paginate(&self, offset: u64, limit: u64) -> Result<(Vec<Post>, u64), RepoError> {
        let posts = self.posts.lock().unwrap();
        let page = posts
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect();
        Ok((page, posts.len() as u64))
    }
}

#[derive(Default)]
pub struct FakeUserRepository {
    users: Mutex<HashMap<Uuid, User>>,
}

#[async_trait]
impl BaseRepository<User, Uuid> for FakeUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        self.users.lock().unwrap().insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.users
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl UserRepository for FakeUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let users = self.users.lock().unwrap();
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_names(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>, RepoError> {
        let users = self.users.lock().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| users.get(id).map(|u| (*id, u.name.clone())))
            .collect())
    }
}
