/// Comment handlers - every route is nested under `/posts/{post_id}/comments`
use crate::error::Result;
use crate::middleware::{JsonBody, RequestContext};
use crate::models::{CommentPayload, ListParams, WriteMode};
use crate::AppState;
use actix_web::{web, HttpResponse};
use uuid::Uuid;

pub async fn list_comments(
    state: web::Data<AppState>,
    ctx: RequestContext,
    post_id: web::Path<Uuid>,
    query: web::Query<ListParams>,
) -> Result<HttpResponse> {
    let page = query.into_inner().into_page()?;
    let comments = state
        .comments
        .list_comments(&ctx, post_id.into_inner(), page)
        .await?;
    Ok(HttpResponse::Ok().json(comments))
}

pub async fn get_comment(
    state: web::Data<AppState>,
    ctx: RequestContext,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment = state.comments.get_comment(&ctx, post_id, comment_id).await?;
    Ok(HttpResponse::Ok().json(comment))
}

pub async fn create_comment(
    state: web::Data<AppState>,
    ctx: RequestContext,
    post_id: web::Path<Uuid>,
    body: JsonBody<CommentPayload>,
) -> Result<HttpResponse> {
    let comment = state
        .comments
        .create_comment(&ctx, post_id.into_inner(), body.into_result())
        .await?;
    Ok(HttpResponse::Created().json(comment))
}

pub async fn put_comment(
    state: web::Data<AppState>,
    ctx: RequestContext,
    path: web::Path<(Uuid, Uuid)>,
    body: JsonBody<CommentPayload>,
) -> Result<HttpResponse> {
    update(state, ctx, path.into_inner(), body, WriteMode::Replace).await
}

pub async fn patch_comment(
    state: web::Data<AppState>,
    ctx: RequestContext,
    path: web::Path<(Uuid, Uuid)>,
    body: JsonBody<CommentPayload>,
) -> Result<HttpResponse> {
    update(state, ctx, path.into_inner(), body, WriteMode::Partial).await
}

async fn update(
    state: web::Data<AppState>,
    ctx: RequestContext,
    (post_id, comment_id): (Uuid, Uuid),
    body: JsonBody<CommentPayload>,
    mode: WriteMode,
) -> Result<HttpResponse> {
    let comment = state
        .comments
        .update_comment(&ctx, post_id, comment_id, body.into_result(), mode)
        .await?;
    Ok(HttpResponse::Ok().json(comment))
}

pub async fn delete_comment(
    state: web::Data<AppState>,
    ctx: RequestContext,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    state
        .comments
        .delete_comment(&ctx, post_id, comment_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
