use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{comment_repo, group_repo, post_repo, user_repo, BlogRepository};
use crate::error::Result;
use crate::models::{
    Comment, CommentChanges, Group, NewComment, NewGroup, NewPost, Page, Post, PostChanges, User,
};

/// [`BlogRepository`] backed by PostgreSQL.
#[derive(Clone)]
pub struct PgBlogRepository {
    pool: PgPool,
}

impl PgBlogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl BlogRepository for PgBlogRepository {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User> {
        Ok(user_repo::create_user(&self.pool, username, password_hash).await?)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(user_repo::find_by_username(&self.pool, username).await?)
    }

    async fn create_group(&self, group: NewGroup) -> Result<Group> {
        Ok(group_repo::create_group(&self.pool, &group).await?)
    }

    async fn list_groups(&self, page: Page) -> Result<Vec<Group>> {
        Ok(group_repo::list_groups(&self.pool, page).await?)
    }

    async fn find_group(&self, id: Uuid) -> Result<Option<Group>> {
        Ok(group_repo::get_group_by_id(&self.pool, id).await?)
    }

    async fn list_posts(&self, page: Page) -> Result<Vec<Post>> {
        Ok(post_repo::list_posts(&self.pool, page).await?)
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>> {
        Ok(post_repo::get_post_by_id(&self.pool, id).await?)
    }

    async fn insert_post(&self, post: NewPost) -> Result<Post> {
        Ok(post_repo::create_post(&self.pool, &post).await?)
    }

    async fn update_post(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>> {
        Ok(post_repo::update_post(&self.pool, id, &changes).await?)
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool> {
        Ok(post_repo::delete_post(&self.pool, id).await?)
    }

    async fn list_comments(&self, post_id: Uuid, page: Page) -> Result<Vec<Comment>> {
        Ok(comment_repo::get_comments_by_post(&self.pool, post_id, page).await?)
    }

    async fn find_comment(&self, post_id: Uuid, id: Uuid) -> Result<Option<Comment>> {
        Ok(comment_repo::get_comment_by_id(&self.pool, post_id, id).await?)
    }

    async fn insert_comment(&self, comment: NewComment) -> Result<Comment> {
        Ok(comment_repo::create_comment(&self.pool, &comment).await?)
    }

    async fn update_comment(&self, id: Uuid, changes: CommentChanges) -> Result<Option<Comment>> {
        Ok(comment_repo::update_comment(&self.pool, id, &changes).await?)
    }

    async fn delete_comment(&self, id: Uuid) -> Result<bool> {
        Ok(comment_repo::delete_comment(&self.pool, id).await?)
    }
}
