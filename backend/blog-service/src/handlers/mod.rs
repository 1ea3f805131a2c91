/// HTTP handlers for blog endpoints
///
/// This module contains handlers for:
/// - Posts: list, retrieve, create, update, partial update, delete
/// - Comments: the same set, nested under a post
/// - Groups: list and retrieve
/// - Auth: token issuance
/// - Health: liveness and readiness probes
///
/// Handlers only translate HTTP to service calls; authorization lives in
/// the services.
pub mod auth;
pub mod comments;
pub mod groups;
pub mod health;
pub mod posts;

// Re-export handler functions at module level
pub use auth::obtain_token;
pub use comments::{
    create_comment, delete_comment, get_comment, list_comments, patch_comment, put_comment,
};
pub use groups::{get_group, list_groups};
pub use health::{health_summary, liveness_check, readiness_summary};
pub use posts::{create_post, delete_post, get_post, list_posts, patch_post, put_post};
