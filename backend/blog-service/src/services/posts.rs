/// Post service - handles post creation, retrieval, and management
use crate::db::BlogRepository;
use crate::error::{AppError, Result};
use crate::metrics::ENTITY_WRITES_TOTAL;
use crate::middleware::{AccessPolicy, RequestContext};
use crate::models::{NewPost, Page, Post, PostPayload, WriteMode};
use std::sync::Arc;
use uuid::Uuid;

pub struct PostService {
    repo: Arc<dyn BlogRepository>,
    policy: AccessPolicy,
}

impl PostService {
    pub fn new(repo: Arc<dyn BlogRepository>, policy: AccessPolicy) -> Self {
        Self { repo, policy }
    }

    /// List posts, newest first
    pub async fn list_posts(&self, ctx: &RequestContext, page: Page) -> Result<Vec<Post>> {
        self.policy.check_read(ctx)?;
        self.repo.list_posts(page).await
    }

    /// Get a post by ID
    pub async fn get_post(&self, ctx: &RequestContext, post_id: Uuid) -> Result<Post> {
        self.policy.check_read(ctx)?;
        self.find(post_id).await
    }

    /// Create a new post owned by the calling actor
    pub async fn create_post(
        &self,
        ctx: &RequestContext,
        payload: Result<PostPayload>,
    ) -> Result<Post> {
        let actor = self.policy.require_actor(ctx)?;
        let payload = payload?;
        self.validate(&payload, WriteMode::Create).await?;

        let changes = payload.into_changes();
        let post = self
            .repo
            .insert_post(NewPost {
                author_id: actor.id,
                text: changes.text.unwrap_or_default(),
                image: changes.image.flatten(),
                group_id: changes.group_id.flatten(),
            })
            .await?;

        ENTITY_WRITES_TOTAL
            .with_label_values(&["post", "create"])
            .inc();
        tracing::info!(post_id = %post.id, author = %actor.username, "post created");
        Ok(post)
    }

    /// Apply `payload` to a post the actor owns.
    ///
    /// A body that failed to parse is only reported once the post is known
    /// to exist and belong to the actor.
    ///
    /// `Replace` requires `text`; both modes leave omitted fields untouched
    /// and clear `image`/`group` when they are sent as `null`.
    pub async fn update_post(
        &self,
        ctx: &RequestContext,
        post_id: Uuid,
        payload: Result<PostPayload>,
        mode: WriteMode,
    ) -> Result<Post> {
        self.policy.require_actor(ctx)?;
        let post = self.find(post_id).await?;
        self.policy.check_object(ctx, &post)?;
        let payload = payload?;
        self.validate(&payload, mode).await?;

        let post = self
            .repo
            .update_post(post_id, payload.into_changes())
            .await?
            .ok_or_else(|| not_found(post_id))?;

        ENTITY_WRITES_TOTAL
            .with_label_values(&["post", "update"])
            .inc();
        tracing::info!(post_id = %post.id, ?mode, "post updated");
        Ok(post)
    }

    /// Delete a post the actor owns, along with its comments
    pub async fn delete_post(&self, ctx: &RequestContext, post_id: Uuid) -> Result<()> {
        self.policy.require_actor(ctx)?;
        let post = self.find(post_id).await?;
        self.policy.check_object(ctx, &post)?;

        if !self.repo.delete_post(post_id).await? {
            return Err(not_found(post_id));
        }

        ENTITY_WRITES_TOTAL
            .with_label_values(&["post", "delete"])
            .inc();
        tracing::info!(%post_id, "post deleted");
        Ok(())
    }

    async fn find(&self, post_id: Uuid) -> Result<Post> {
        self.repo
            .find_post(post_id)
            .await?
            .ok_or_else(|| not_found(post_id))
    }

    async fn validate(&self, payload: &PostPayload, mode: WriteMode) -> Result<()> {
        let mut errors = payload.field_errors(mode);

        if let Some(group_id) = payload.group_id() {
            if self.repo.find_group(group_id).await?.is_none() {
                errors.add(
                    "group",
                    format!("Invalid pk \"{}\" - object does not exist.", group_id),
                );
            }
        }

        errors.into_result()
    }
}

fn not_found(post_id: Uuid) -> AppError {
    AppError::NotFound(format!("Post {} not found", post_id))
}
