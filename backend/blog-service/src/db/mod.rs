/// Database access layer
///
/// This module provides:
/// - Database connection pooling and embedded migrations
/// - The [`BlogRepository`] seam the services depend on
/// - A PostgreSQL implementation built from per-entity query modules
/// - A process-local implementation used for development and tests
pub mod comment_repo;
pub mod group_repo;
pub mod memory;
pub mod post_repo;
pub mod postgres;
pub mod user_repo;

pub use memory::MemoryBlogRepository;
pub use postgres::PgBlogRepository;

use async_trait::async_trait;
use sqlx::migrate::Migrator;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::config::{DatabaseConfig, StorageBackend};
use crate::error::Result;
use crate::models::{
    Comment, CommentChanges, Group, NewComment, NewGroup, NewPost, Page, Post, PostChanges, User,
};

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Persistence operations for users, groups, posts and comments.
///
/// Lists come back in their canonical order: posts newest first, comments
/// newest first, groups by title. Updates and deletes report a missing row
/// as `None`/`false` rather than an error.
#[async_trait]
pub trait BlogRepository: Send + Sync {
    /// Cheap liveness probe for readiness checks.
    async fn ping(&self) -> Result<()>;

    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn create_group(&self, group: NewGroup) -> Result<Group>;
    async fn list_groups(&self, page: Page) -> Result<Vec<Group>>;
    async fn find_group(&self, id: Uuid) -> Result<Option<Group>>;

    async fn list_posts(&self, page: Page) -> Result<Vec<Post>>;
    async fn find_post(&self, id: Uuid) -> Result<Option<Post>>;
    async fn insert_post(&self, post: NewPost) -> Result<Post>;
    async fn update_post(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>>;
    /// Removes the post and every comment under it.
    async fn delete_post(&self, id: Uuid) -> Result<bool>;

    async fn list_comments(&self, post_id: Uuid, page: Page) -> Result<Vec<Comment>>;
    /// Only matches a comment that belongs to `post_id`.
    async fn find_comment(&self, post_id: Uuid, id: Uuid) -> Result<Option<Comment>>;
    async fn insert_comment(&self, comment: NewComment) -> Result<Comment>;
    async fn update_comment(&self, id: Uuid, changes: CommentChanges) -> Result<Option<Comment>>;
    async fn delete_comment(&self, id: Uuid) -> Result<bool>;
}

/// Create a PostgreSQL connection pool and verify it answers.
pub async fn create_pool(config: &DatabaseConfig) -> std::result::Result<PgPool, sqlx::Error> {
    debug!(
        max = config.max_connections,
        min = config.min_connections,
        acquire_timeout_secs = config.acquire_timeout_secs,
        "Creating database pool"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .test_before_acquire(true)
        .connect(&config.url)
        .await?;

    match tokio::time::timeout(
        Duration::from_secs(config.connect_timeout_secs),
        sqlx::query("SELECT 1").execute(&pool),
    )
    .await
    {
        Ok(Ok(_)) => {
            info!("Database pool created and verified");
            Ok(pool)
        }
        Ok(Err(e)) => {
            error!(error = %e, "Database connection verification failed");
            Err(e)
        }
        Err(_) => {
            error!(
                timeout_secs = config.connect_timeout_secs,
                "Database connection verification timeout"
            );
            Err(sqlx::Error::Io(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "Database verification timeout",
            )))
        }
    }
}

/// Apply embedded migrations.
pub async fn migrate(pool: &PgPool) -> std::result::Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await?;
    info!("Database migrations completed");
    Ok(())
}

/// Build the repository selected by configuration.
pub async fn connect(config: &DatabaseConfig) -> anyhow::Result<Arc<dyn BlogRepository>> {
    match config.backend {
        StorageBackend::Memory => {
            info!("Using in-memory storage; data will not survive a restart");
            Ok(Arc::new(MemoryBlogRepository::new()))
        }
        StorageBackend::Postgres => {
            let pool = create_pool(config).await?;
            if config.run_migrations {
                migrate(&pool).await?;
            }
            Ok(Arc::new(PgBlogRepository::new(pool)))
        }
    }
}
