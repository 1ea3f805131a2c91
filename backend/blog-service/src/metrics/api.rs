use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec,
};

lazy_static! {
    /// Writes refused by the authorization policy, by entity kind and reason
    /// (unauthenticated, not_owner).
    pub static ref AUTHORIZATION_DENIED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "blog_authorization_denied_total",
        "Requests refused by the authorization policy segmented by entity and reason",
        &["entity", "reason"]
    )
    .expect("failed to register blog_authorization_denied_total");

    /// Successful mutations by entity kind and action (create, update, delete).
    pub static ref ENTITY_WRITES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "blog_entity_writes_total",
        "Successful entity mutations segmented by entity and action",
        &["entity", "action"]
    )
    .expect("failed to register blog_entity_writes_total");

    /// Request latency by method and response status.
    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "blog_http_request_duration_seconds",
        "HTTP request duration segmented by method and status",
        &["method", "status"]
    )
    .expect("failed to register blog_http_request_duration_seconds");
}
