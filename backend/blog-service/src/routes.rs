/// URL table.
///
/// Everything under `/api/v1` except health passes through token
/// authentication. Paths are registered without trailing slashes;
/// `NormalizePath` strips them from incoming requests.
use actix_web::{error, web, HttpRequest};
use std::sync::Arc;

use crate::error::AppError;
use crate::handlers;
use crate::metrics::serve_metrics;
use crate::middleware::{MetricsMiddleware, TokenAuthMiddleware};
use crate::security::TokenService;

const JSON_LIMIT_BYTES: usize = 64 * 1024;

pub fn configure(cfg: &mut web::ServiceConfig, tokens: Arc<TokenService>) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(JSON_LIMIT_BYTES)
            .content_type_required(false),
    )
    .app_data(web::PathConfig::default().error_handler(path_error))
    .app_data(web::QueryConfig::default().error_handler(query_error))
    .route("/metrics", web::get().to(serve_metrics))
    // Health check endpoints
    .route("/api/v1/health", web::get().to(handlers::health_summary))
    .route("/api/v1/health/ready", web::get().to(handlers::readiness_summary))
    .route("/api/v1/health/live", web::get().to(handlers::liveness_check))
    .service(
        web::scope("/api/v1")
            .wrap(TokenAuthMiddleware::new(tokens))
            .wrap(MetricsMiddleware)
            .route("/api-token-auth", web::post().to(handlers::obtain_token))
            .service(
                web::scope("/posts")
                    .service(
                        web::resource("")
                            .route(web::get().to(handlers::list_posts))
                            .route(web::post().to(handlers::create_post)),
                    )
                    .service(
                        web::resource("/{post_id}")
                            .route(web::get().to(handlers::get_post))
                            .route(web::put().to(handlers::put_post))
                            .route(web::patch().to(handlers::patch_post))
                            .route(web::delete().to(handlers::delete_post)),
                    )
                    .service(
                        web::resource("/{post_id}/comments")
                            .route(web::get().to(handlers::list_comments))
                            .route(web::post().to(handlers::create_comment)),
                    )
                    .service(
                        web::resource("/{post_id}/comments/{comment_id}")
                            .route(web::get().to(handlers::get_comment))
                            .route(web::put().to(handlers::put_comment))
                            .route(web::patch().to(handlers::patch_comment))
                            .route(web::delete().to(handlers::delete_comment)),
                    ),
            )
            .service(
                web::scope("/groups")
                    .service(web::resource("").route(web::get().to(handlers::list_groups)))
                    .service(web::resource("/{group_id}").route(web::get().to(handlers::get_group))),
            ),
    );
}

/// A path segment that is not a valid id cannot name an existing object.
fn path_error(err: error::PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::NotFound(err.to_string()).into()
}

fn query_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}
