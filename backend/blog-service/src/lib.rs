/// Blog Service Library
///
/// REST API for posts, groups and comments with token authentication and
/// author-only writes.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers
/// - `routes`: URL table and extractor configuration
/// - `models`: Entities and request payloads
/// - `services`: Business logic and authorization
/// - `db`: Repository trait with PostgreSQL and in-memory implementations
/// - `middleware`: Request context, token authentication, ownership policy
/// - `security`: Password hashing and access tokens
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `metrics`: Prometheus collectors
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod security;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::NormalizePath;
use actix_web::{web, App};
use std::sync::Arc;

use db::BlogRepository;
use middleware::AccessPolicy;
use security::TokenService;
use services::{AuthService, CommentService, GroupService, PostService};

/// Shared per-process state handed to every handler.
pub struct AppState {
    pub repo: Arc<dyn BlogRepository>,
    pub tokens: Arc<TokenService>,
    pub posts: PostService,
    pub comments: CommentService,
    pub groups: GroupService,
    pub auth: AuthService,
}

impl AppState {
    pub fn new(
        repo: Arc<dyn BlogRepository>,
        tokens: Arc<TokenService>,
        policy: AccessPolicy,
    ) -> Self {
        Self {
            posts: PostService::new(repo.clone(), policy),
            comments: CommentService::new(repo.clone(), policy),
            groups: GroupService::new(repo.clone(), policy),
            auth: AuthService::new(repo.clone(), tokens.clone()),
            repo,
            tokens,
        }
    }
}

/// Assemble the application: state, routes and path normalization.
///
/// The binary layers CORS and request logging on top.
pub fn build_app(
    state: web::Data<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let tokens = state.tokens.clone();

    App::new()
        .app_data(state)
        .wrap(NormalizePath::trim())
        .configure(|cfg| routes::configure(cfg, tokens))
}
