/// Group service - read-only access; groups are created from the admin CLI
use crate::db::BlogRepository;
use crate::error::{AppError, Result};
use crate::middleware::{AccessPolicy, RequestContext};
use crate::models::{Group, Page};
use std::sync::Arc;
use uuid::Uuid;

pub struct GroupService {
    repo: Arc<dyn BlogRepository>,
    policy: AccessPolicy,
}

impl GroupService {
    pub fn new(repo: Arc<dyn BlogRepository>, policy: AccessPolicy) -> Self {
        Self { repo, policy }
    }

    pub async fn list_groups(&self, ctx: &RequestContext, page: Page) -> Result<Vec<Group>> {
        self.policy.check_read(ctx)?;
        self.repo.list_groups(page).await
    }

    pub async fn get_group(&self, ctx: &RequestContext, group_id: Uuid) -> Result<Group> {
        self.policy.check_read(ctx)?;
        self.repo
            .find_group(group_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Group {} not found", group_id)))
    }
}
