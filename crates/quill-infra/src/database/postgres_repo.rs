//! PostgreSQL repository implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use quill_core::domain::{Post, PostChanges, User};
use quill_core::error::RepoError;
use quill_core::ports::{PostStore, UserRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        // Stored emails are always normalized; see `User::new`.
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(User::normalize_email(email)))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_names(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>, RepoError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(Uuid, String)> = UserEntity::find()
            .select_only()
            .column(user::Column::Id)
            .column(user::Column::Name)
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().collect())
    }
}

/// Keep the first character of the local part; emails are PII.
fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => match local.chars().next() {
            Some(first) if local.chars().count() > 1 => format!("{first}***@{domain}"),
            _ => format!("***@{domain}"),
        },
        None => "***".to_string(),
    }
}

const MAX_BIGINT: u64 = i64::MAX as u64;

/// PostgreSQL post store. Listing order is `created_at`, then `id`.
pub struct PostgresPostStore {
    pub(crate) db: DbConn,
}

impl PostgresPostStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PostStore for PostgresPostStore {
    async fn insert(&self, post: Post) -> Result<Uuid, RepoError> {
        let active_model: post::ActiveModel = post.into();
        let model = active_model.insert(&self.db).await.map_err(map_db_err)?;

        Ok(model.id)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<bool, RepoError> {
        let updated_at: DateTimeWithTimeZone = changes.updated_at.into();

        // Single statement: id, user_id and created_at are never written.
        let result = PostEntity::update_many()
            .col_expr(post::Column::Title, Expr::value(changes.title))
            .col_expr(post::Column::Content, Expr::value(changes.content))
            .col_expr(post::Column::UpdatedAt, Expr::value(updated_at))
            .filter(post::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, RepoError> {
        let result = PostEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn paginate(&self, offset: u64, limit: u64) -> Result<(Vec<Post>, u64), RepoError> {
        let total = PostEntity::find()
            .count(&self.db)
            .await
            .map_err(map_db_err)?;

        // Postgres binds OFFSET/LIMIT as BIGINT.
        if offset >= total {
            return Ok((Vec::new(), total));
        }
        let limit = limit.min(MAX_BIGINT);

        let models = PostEntity::find()
            .order_by_asc(post::Column::CreatedAt)
            .order_by_asc(post::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok((models.into_iter().map(Into::into).collect(), total))
    }
}

#[cfg(test)]
mod tests {
    use super::mask_email;

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("test@gmail.com"), "t***@gmail.com");
        assert_eq!(mask_email("a@b.c"), "***@b.c");
        assert_eq!(mask_email("not-an-email"), "***");
    }
}
