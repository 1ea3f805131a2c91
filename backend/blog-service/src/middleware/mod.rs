/// HTTP middleware utilities for blog-service
///
/// Token authentication attaches an explicit [`RequestContext`] to each
/// request: who is asking (if anyone) and whether the operation reads or
/// writes. Handlers receive it as an extractor and pass it down to the
/// services and the authorization policy.
pub mod permissions;

pub use permissions::*;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::{header, header::HeaderMap, Method};
use actix_web::{web, Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use serde::de::DeserializeOwned;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::error::AppError;
use crate::security::TokenService;

// =====================================================================
// Request context
// =====================================================================

/// Authenticated identity making a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub username: String,
}

/// Two-valued classification of what a request does to state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// list / retrieve
    Read,
    /// create / update / partial-update / delete
    Write,
}

impl Operation {
    /// Classify a request at dispatch time.
    pub fn from_method(method: &Method) -> Self {
        match *method {
            Method::GET | Method::HEAD | Method::OPTIONS => Operation::Read,
            _ => Operation::Write,
        }
    }

    pub fn is_safe(self) -> bool {
        matches!(self, Operation::Read)
    }
}

/// Request-scoped authorization input.
#[derive(Debug, Clone)]
pub struct RequestContext {
    actor: Option<Actor>,
    operation: Operation,
}

impl RequestContext {
    pub fn new(actor: Option<Actor>, operation: Operation) -> Self {
        Self { actor, operation }
    }

    pub fn anonymous(operation: Operation) -> Self {
        Self::new(None, operation)
    }

    pub fn authenticated(actor: Actor, operation: Operation) -> Self {
        Self::new(Some(actor), operation)
    }

    pub fn actor(&self) -> Option<&Actor> {
        self.actor.as_ref()
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }
}

impl FromRequest for RequestContext {
    type Error = Error;
    type Future = Ready<std::result::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        // Routes outside the authenticated scope are treated as anonymous.
        let ctx = req
            .extensions()
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_else(|| RequestContext::anonymous(Operation::from_method(req.method())));
        ready(Ok(ctx))
    }
}

/// JSON request body whose parse failure is held instead of rejected.
///
/// Lets the services report 401/403/404 before a malformed body's 400.
pub struct JsonBody<T>(crate::error::Result<T>);

impl<T> JsonBody<T> {
    pub fn into_result(self) -> crate::error::Result<T> {
        self.0
    }
}

impl<T> FromRequest for JsonBody<T>
where
    T: DeserializeOwned + 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let body = web::Json::<T>::from_request(req, payload);
        Box::pin(async move {
            let parsed = body
                .await
                .map(web::Json::into_inner)
                .map_err(|e| AppError::BadRequest(e.to_string()));
            Ok(JsonBody(parsed))
        })
    }
}

// =====================================================================
// Token authentication
// =====================================================================

/// Extract the token from `Authorization: Bearer <t>` (or `Token <t>`).
///
/// No header is not an error: the request proceeds anonymously.
fn token_from_headers(headers: &HeaderMap) -> crate::error::Result<Option<&str>> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid Authorization header".into()))?;

    value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("Token "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(Some)
        .ok_or_else(|| AppError::Unauthorized("Invalid Authorization scheme".into()))
}

fn authenticate(
    headers: &HeaderMap,
    tokens: &TokenService,
) -> crate::error::Result<Option<Actor>> {
    let Some(token) = token_from_headers(headers)? else {
        return Ok(None);
    };

    let claims = tokens.validate(token)?;
    Ok(Some(Actor {
        id: claims.user_id()?,
        username: claims.username,
    }))
}

/// Actix middleware that resolves the caller from a signed token.
///
/// A request without credentials continues anonymously; a request with
/// credentials that fail validation is rejected with 401.
pub struct TokenAuthMiddleware {
    tokens: Arc<TokenService>,
}

impl TokenAuthMiddleware {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }
}

impl<S, B> Transform<S, ServiceRequest> for TokenAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = TokenAuthMiddlewareService<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TokenAuthMiddlewareService {
            service: Rc::new(service),
            tokens: self.tokens.clone(),
        }))
    }
}

pub struct TokenAuthMiddlewareService<S> {
    service: Rc<S>,
    tokens: Arc<TokenService>,
}

impl<S, B> Service<ServiceRequest> for TokenAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let tokens = self.tokens.clone();

        Box::pin(async move {
            let operation = Operation::from_method(req.method());

            let actor = match authenticate(req.headers(), &tokens) {
                Ok(actor) => actor,
                Err(err) => {
                    tracing::debug!(path = %req.path(), error = %err, "rejected credentials");
                    return Ok(req.error_response(err).map_into_right_body());
                }
            };

            req.extensions_mut()
                .insert(RequestContext::new(actor, operation));

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

// =====================================================================
// Metrics middleware
// =====================================================================

/// Bounded `method` label; extension methods share one series.
fn method_label(method: &Method) -> &'static str {
    match *method {
        Method::GET => "GET",
        Method::HEAD => "HEAD",
        Method::OPTIONS => "OPTIONS",
        Method::POST => "POST",
        Method::PUT => "PUT",
        Method::PATCH => "PATCH",
        Method::DELETE => "DELETE",
        _ => "other",
    }
}

/// Logs method, path, status and latency of every request.
pub struct MetricsMiddleware;

impl<S, B> Transform<S, ServiceRequest> for MetricsMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = MetricsMiddlewareService<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MetricsMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct MetricsMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for MetricsMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let path = req.path().to_string();
        let method = method_label(req.method());
        let start = Instant::now();

        Box::pin(async move {
            let res = service.call(req).await?;
            let elapsed = start.elapsed();
            let status = res.status().as_u16();

            crate::metrics::HTTP_REQUEST_DURATION_SECONDS
                .with_label_values(&[method, &status.to_string()])
                .observe(elapsed.as_secs_f64());
            tracing::debug!(%method, %path, status, elapsed_ms = elapsed.as_millis() as u64, "request completed");

            Ok(res)
        })
    }
}
