//! Shared fixtures for HTTP integration tests.
//!
//! Every test gets its own in-memory store. Users are inserted directly with
//! a placeholder hash and tokens are minted from the app's own
//! `TokenService`, so only the auth tests pay for Argon2.

#![allow(dead_code)]

use actix_web::web;
use blog_service::db::{BlogRepository, MemoryBlogRepository};
use blog_service::middleware::AccessPolicy;
use blog_service::models::{Group, NewGroup, User};
use blog_service::security::TokenService;
use blog_service::AppState;
use serde_json::Value;
use std::sync::Arc;

pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";

pub struct TestContext {
    pub state: web::Data<AppState>,
    pub repo: Arc<MemoryBlogRepository>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_policy(AccessPolicy::default())
    }

    pub fn with_policy(policy: AccessPolicy) -> Self {
        let repo = Arc::new(MemoryBlogRepository::new());
        let tokens = Arc::new(TokenService::new(TEST_SECRET, 3600));
        let state = web::Data::new(AppState::new(repo.clone(), tokens, policy));
        Self { state, repo }
    }

    /// Insert a user and return it with a valid bearer header value.
    pub async fn user(&self, username: &str) -> (User, String) {
        let user = self
            .repo
            .create_user(username, "not-a-real-hash")
            .await
            .expect("create user");
        let token = self.state.tokens.issue(&user).expect("issue token");
        (user, format!("Bearer {}", token))
    }

    pub async fn group(&self, title: &str, slug: &str) -> Group {
        self.repo
            .create_group(NewGroup {
                title: title.to_string(),
                slug: slug.to_string(),
                description: format!("All about {}", title),
            })
            .await
            .expect("create group")
    }
}

/// Extract `id` from a JSON representation.
pub fn id_of(value: &Value) -> String {
    value["id"].as_str().expect("id field").to_string()
}
