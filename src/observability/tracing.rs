//! Request spans.
//!
//! Every request runs inside a `request` span carrying the `x-request-id`
//! assigned by the request ID layer, so log lines from the fetch strategies
//! can be correlated without repeating the ID.

use axum::body::Body;
use axum::http::Request;
use tracing::Span;

use crate::http::request::request_id;

/// Span factory for `TraceLayer::make_span_with`.
pub fn make_request_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        request_id = %request_id(request.headers()),
        method = %request.method(),
        path_len = request.uri().path().len(),
    )
}
