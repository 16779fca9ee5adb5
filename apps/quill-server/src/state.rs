//! Application state - shared across all handlers.

use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use quill_core::PostService;
use quill_core::ports::{PostStore, UserRepository};
use quill_infra::{
    DatabaseConnections, InMemoryPostStore, InMemoryUserRepository, PostgresPostStore,
    PostgresUserRepository,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub users: Arc<dyn UserRepository>,
    pub posts_per_page: u64,
}

impl AppState {
    /// Build the state with PostgreSQL stores when a database is configured,
    /// in-memory stores otherwise.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let Some(db_config) = config.database.as_ref() else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Ok(Self::in_memory(config.posts_per_page));
        };

        let connections = DatabaseConnections::init(db_config).await?;

        if config.run_migrations {
            Migrator::up(&connections.main, None).await?;
            tracing::info!("Migrations applied");
        }

        let posts: Arc<dyn PostStore> = Arc::new(PostgresPostStore::new(connections.conn()));
        let users: Arc<dyn UserRepository> =
            Arc::new(PostgresUserRepository::new(connections.conn()));

        tracing::info!("Application state initialized");
        Ok(Self::from_stores(posts, users, config.posts_per_page))
    }

    /// State over fresh in-memory stores.
    pub fn in_memory(posts_per_page: u64) -> Self {
        Self::from_stores(
            Arc::new(InMemoryPostStore::new()),
            Arc::new(InMemoryUserRepository::new()),
            posts_per_page,
        )
    }

    fn from_stores(
        posts: Arc<dyn PostStore>,
        users: Arc<dyn UserRepository>,
        posts_per_page: u64,
    ) -> Self {
        Self {
            posts: PostService::new(posts, users.clone()),
            users,
            posts_per_page,
        }
    }
}
