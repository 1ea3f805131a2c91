/// Business logic layer for blog-service
///
/// This module provides high-level operations:
/// - Post service: list, retrieve, create, update, delete posts
/// - Comment service: the same lifecycle, scoped to a parent post
/// - Group service: read-only group access
/// - Auth service: credential exchange for access tokens
///
/// Every write goes through [`AccessPolicy`](crate::middleware::AccessPolicy)
/// before the repository is touched.
pub mod auth;
pub mod comments;
pub mod groups;
pub mod posts;

// Re-export commonly used services
pub use auth::AuthService;
pub use comments::CommentService;
pub use groups::GroupService;
pub use posts::PostService;
