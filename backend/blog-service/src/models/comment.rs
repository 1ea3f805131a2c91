use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{check_text, WriteMode};
use crate::error::FieldErrors;

/// Comment on a post.
///
/// Serialized as `{id, author, post, text, created}`.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub author_id: Uuid,
    /// Username of the author
    pub author: String,
    #[serde(rename = "post")]
    pub post_id: Uuid,
    pub text: String,
    pub created: DateTime<Utc>,
}

/// Request body for creating or updating a comment.
///
/// `author` and `post` are server-assigned.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CommentPayload {
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub text: Option<String>,
}

impl CommentPayload {
    pub fn field_errors(&self, mode: WriteMode) -> FieldErrors {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => FieldErrors::from(e),
        };
        check_text(self.text.as_deref(), mode, &mut errors);
        errors
    }

    pub fn into_changes(self) -> CommentChanges {
        CommentChanges { text: self.text }
    }
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct CommentChanges {
    pub text: Option<String>,
}
