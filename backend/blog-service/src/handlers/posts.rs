/// Post handlers - HTTP endpoints for post operations
use crate::error::Result;
use crate::middleware::{JsonBody, RequestContext};
use crate::models::{ListParams, PostPayload, WriteMode};
use crate::AppState;
use actix_web::{web, HttpResponse};
use uuid::Uuid;

/// List posts, newest first
pub async fn list_posts(
    state: web::Data<AppState>,
    ctx: RequestContext,
    query: web::Query<ListParams>,
) -> Result<HttpResponse> {
    let page = query.into_inner().into_page()?;
    let posts = state.posts.list_posts(&ctx, page).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// Get a single post
pub async fn get_post(
    state: web::Data<AppState>,
    ctx: RequestContext,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post = state.posts.get_post(&ctx, post_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// Create a new post authored by the caller
pub async fn create_post(
    state: web::Data<AppState>,
    ctx: RequestContext,
    body: JsonBody<PostPayload>,
) -> Result<HttpResponse> {
    let post = state.posts.create_post(&ctx, body.into_result()).await?;
    Ok(HttpResponse::Created().json(post))
}

/// Full update (PUT)
pub async fn put_post(
    state: web::Data<AppState>,
    ctx: RequestContext,
    post_id: web::Path<Uuid>,
    body: JsonBody<PostPayload>,
) -> Result<HttpResponse> {
    update(state, ctx, post_id.into_inner(), body, WriteMode::Replace).await
}

/// Partial update (PATCH)
pub async fn patch_post(
    state: web::Data<AppState>,
    ctx: RequestContext,
    post_id: web::Path<Uuid>,
    body: JsonBody<PostPayload>,
) -> Result<HttpResponse> {
    update(state, ctx, post_id.into_inner(), body, WriteMode::Partial).await
}

async fn update(
    state: web::Data<AppState>,
    ctx: RequestContext,
    post_id: Uuid,
    body: JsonBody<PostPayload>,
    mode: WriteMode,
) -> Result<HttpResponse> {
    let post = state
        .posts
        .update_post(&ctx, post_id, body.into_result(), mode)
        .await?;
    Ok(HttpResponse::Ok().json(post))
}

/// Delete a post and its comments
pub async fn delete_post(
    state: web::Data<AppState>,
    ctx: RequestContext,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    state.posts.delete_post(&ctx, post_id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
