/// Group handlers - read-only
use crate::error::Result;
use crate::middleware::RequestContext;
use crate::models::ListParams;
use crate::AppState;
use actix_web::{web, HttpResponse};
use uuid::Uuid;

pub async fn list_groups(
    state: web::Data<AppState>,
    ctx: RequestContext,
    query: web::Query<ListParams>,
) -> Result<HttpResponse> {
    let page = query.into_inner().into_page()?;
    let groups = state.groups.list_groups(&ctx, page).await?;
    Ok(HttpResponse::Ok().json(groups))
}

pub async fn get_group(
    state: web::Data<AppState>,
    ctx: RequestContext,
    group_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let group = state.groups.get_group(&ctx, group_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(group))
}
