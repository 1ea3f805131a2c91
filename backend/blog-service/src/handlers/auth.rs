/// Token endpoint
use crate::error::Result;
use crate::middleware::JsonBody;
use crate::models::Credentials;
use crate::AppState;
use actix_web::{web, HttpResponse};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Exchange `{username, password}` for `{token}`
pub async fn obtain_token(
    state: web::Data<AppState>,
    body: JsonBody<Credentials>,
) -> Result<HttpResponse> {
    let token = state.auth.obtain_token(body.into_result()?).await?;
    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}
