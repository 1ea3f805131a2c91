/// Data models for blog-service
///
/// This module defines structures for:
/// - User: accounts that author posts and comments
/// - Group: read-only categories posts can belong to
/// - Post: authored text entries, optionally grouped
/// - Comment: authored replies scoped to a single post
///
/// Request payloads live next to the entity they write.
pub mod comment;
pub mod group;
pub mod post;
pub mod user;

pub use comment::{Comment, CommentChanges, CommentPayload, NewComment};
pub use group::{Group, NewGroup};
pub use post::{NewPost, Post, PostChanges, PostPayload};
pub use user::{Credentials, User};

use serde::Deserialize;

use crate::error::{FieldErrors, Result};

const MAX_PAGE_LIMIT: i64 = 100;

/// How much of an entity a write payload describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// POST: required fields must be present.
    Create,
    /// PUT: required fields must be present; omitted optional fields are kept.
    Replace,
    /// PATCH: only the fields present are applied.
    Partial,
}

impl WriteMode {
    pub fn requires_all(self) -> bool {
        !matches!(self, WriteMode::Partial)
    }
}

/// Window over a list endpoint. `limit: None` returns everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub limit: Option<i64>,
    pub offset: i64,
}

/// Optional `?limit=&offset=` query parameters
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListParams {
    pub fn into_page(self) -> Result<Page> {
        let mut errors = FieldErrors::new();

        if let Some(limit) = self.limit {
            if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
                errors.add(
                    "limit",
                    format!("Ensure this value is between 1 and {}.", MAX_PAGE_LIMIT),
                );
            }
        }
        let offset = self.offset.unwrap_or(0);
        if offset < 0 {
            errors.add("offset", "Ensure this value is greater than or equal to 0.");
        }

        errors.into_result()?;
        Ok(Page {
            limit: self.limit,
            offset,
        })
    }
}

/// Shared "text" rules: required unless partial, never blank.
pub(crate) fn check_text(text: Option<&str>, mode: WriteMode, errors: &mut FieldErrors) {
    match text {
        None if mode.requires_all() => errors.add("text", crate::error::FIELD_REQUIRED),
        // Empty strings are reported by the validator length rule.
        Some(t) if !t.is_empty() && t.trim().is_empty() => {
            errors.add("text", crate::error::FIELD_BLANK)
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_params_default_to_everything() {
        let page = ListParams::default().into_page().unwrap();
        assert_eq!(page, Page { limit: None, offset: 0 });
    }

    #[test]
    fn list_params_reject_out_of_range_limit() {
        let err = ListParams {
            limit: Some(0),
            offset: Some(-1),
        }
        .into_page()
        .unwrap_err();

        match err {
            crate::error::AppError::Validation(fields) => {
                assert!(fields.get("limit").is_some());
                assert!(fields.get("offset").is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
