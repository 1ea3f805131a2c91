/// Comment service - comments are always addressed through their parent post
use crate::db::BlogRepository;
use crate::error::{AppError, Result};
use crate::metrics::ENTITY_WRITES_TOTAL;
use crate::middleware::{AccessPolicy, RequestContext};
use crate::models::{Comment, CommentPayload, NewComment, Page, Post, WriteMode};
use std::sync::Arc;
use uuid::Uuid;

pub struct CommentService {
    repo: Arc<dyn BlogRepository>,
    policy: AccessPolicy,
}

impl CommentService {
    pub fn new(repo: Arc<dyn BlogRepository>, policy: AccessPolicy) -> Self {
        Self { repo, policy }
    }

    /// List comments under a post, newest first. 404 if the post is missing.
    pub async fn list_comments(
        &self,
        ctx: &RequestContext,
        post_id: Uuid,
        page: Page,
    ) -> Result<Vec<Comment>> {
        self.policy.check_read(ctx)?;
        self.parent(post_id).await?;
        self.repo.list_comments(post_id, page).await
    }

    pub async fn get_comment(
        &self,
        ctx: &RequestContext,
        post_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Comment> {
        self.policy.check_read(ctx)?;
        self.find(post_id, comment_id).await
    }

    /// Create a comment on `post_id`, authored by the calling actor
    pub async fn create_comment(
        &self,
        ctx: &RequestContext,
        post_id: Uuid,
        payload: Result<CommentPayload>,
    ) -> Result<Comment> {
        let actor = self.policy.require_actor(ctx)?;
        self.parent(post_id).await?;
        let payload = payload?;
        payload.field_errors(WriteMode::Create).into_result()?;

        let comment = self
            .repo
            .insert_comment(NewComment {
                post_id,
                author_id: actor.id,
                text: payload.into_changes().text.unwrap_or_default(),
            })
            .await?;

        ENTITY_WRITES_TOTAL
            .with_label_values(&["comment", "create"])
            .inc();
        tracing::info!(comment_id = %comment.id, %post_id, author = %actor.username, "comment created");
        Ok(comment)
    }

    pub async fn update_comment(
        &self,
        ctx: &RequestContext,
        post_id: Uuid,
        comment_id: Uuid,
        payload: Result<CommentPayload>,
        mode: WriteMode,
    ) -> Result<Comment> {
        self.policy.require_actor(ctx)?;
        let comment = self.find(post_id, comment_id).await?;
        self.policy.check_object(ctx, &comment)?;
        let payload = payload?;
        payload.field_errors(mode).into_result()?;

        let comment = self
            .repo
            .update_comment(comment_id, payload.into_changes())
            .await?
            .ok_or_else(|| comment_not_found(comment_id))?;

        ENTITY_WRITES_TOTAL
            .with_label_values(&["comment", "update"])
            .inc();
        tracing::info!(%comment_id, %post_id, ?mode, "comment updated");
        Ok(comment)
    }

    pub async fn delete_comment(
        &self,
        ctx: &RequestContext,
        post_id: Uuid,
        comment_id: Uuid,
    ) -> Result<()> {
        self.policy.require_actor(ctx)?;
        let comment = self.find(post_id, comment_id).await?;
        self.policy.check_object(ctx, &comment)?;

        if !self.repo.delete_comment(comment_id).await? {
            return Err(comment_not_found(comment_id));
        }

        ENTITY_WRITES_TOTAL
            .with_label_values(&["comment", "delete"])
            .inc();
        tracing::info!(%comment_id, %post_id, "comment deleted");
        Ok(())
    }

    async fn parent(&self, post_id: Uuid) -> Result<Post> {
        self.repo
            .find_post(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post {} not found", post_id)))
    }

    /// Resolve the post first so a missing post is reported as such.
    async fn find(&self, post_id: Uuid, comment_id: Uuid) -> Result<Comment> {
        self.parent(post_id).await?;
        self.repo
            .find_comment(post_id, comment_id)
            .await?
            .ok_or_else(|| comment_not_found(comment_id))
    }
}

fn comment_not_found(comment_id: Uuid) -> AppError {
    AppError::NotFound(format!("Comment {} not found", comment_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryBlogRepository;
    use crate::middleware::{Actor, Operation};
    use crate::models::{NewPost, User};

    fn ctx(user: &User) -> RequestContext {
        RequestContext::authenticated(
            Actor {
                id: user.id,
                username: user.username.clone(),
            },
            Operation::Write,
        )
    }

    fn text(text: &str) -> Result<CommentPayload> {
        Ok(CommentPayload {
            text: Some(text.to_string()),
        })
    }

    #[tokio::test]
    async fn test_comments_on_missing_post_are_not_found() {
        let repo = Arc::new(MemoryBlogRepository::new());
        let alice = repo.create_user("alice", "hash").await.unwrap();
        let service = CommentService::new(repo, AccessPolicy::default());
        let missing = Uuid::new_v4();

        let read = RequestContext::anonymous(Operation::Read);
        assert!(matches!(
            service.list_comments(&read, missing, Page::default()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.create_comment(&ctx(&alice), missing, text("hi")).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_comment_post_comes_from_path() {
        let repo = Arc::new(MemoryBlogRepository::new());
        let alice = repo.create_user("alice", "hash").await.unwrap();
        let post = repo
            .insert_post(NewPost {
                author_id: alice.id,
                text: "hi".into(),
                image: None,
                group_id: None,
            })
            .await
            .unwrap();
        let service = CommentService::new(repo, AccessPolicy::default());

        let comment = service
            .create_comment(&ctx(&alice), post.id, text("first"))
            .await
            .unwrap();
        assert_eq!(comment.post_id, post.id);
        assert_eq!(comment.author, "alice");
    }
}
