//! Response construction.
//!
//! # Responsibilities
//! - Set Content-Type from the fetch result before any body byte
//! - Stream the fetched body without buffering it
//! - Log a body that fails partway; the status line is already gone by then
//! - Produce the bare 404 used for every failure

use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use futures_util::TryStreamExt;

use crate::fetch::FetchResult;

/// Turn a fetch result into a streaming `200 OK` response.
///
/// The body stream is owned by the response and dropped when the transfer
/// completes, fails, or the client goes away.
pub fn stream(result: FetchResult) -> Response {
    let FetchResult { body, content_type } = result;

    let body = body.inspect_err(|e| {
        tracing::error!(error = %e, kind = e.kind(), "Failed to write response");
    });
    let mut response = Response::new(Body::from_stream(body));

    if let Some(content_type) = content_type {
        match HeaderValue::from_str(&content_type) {
            Ok(value) => {
                response.headers_mut().insert(CONTENT_TYPE, value);
            }
            Err(e) => {
                tracing::warn!(
                    content_type = %content_type,
                    error = %e,
                    "Dropping unrepresentable Content-Type"
                );
            }
        }
    }

    response
}

/// Empty-bodied `404 Not Found`.
pub fn not_found() -> Response {
    StatusCode::NOT_FOUND.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProxyError;
    use crate::fetch::once_stream;
    use bytes::Bytes;
    use futures_util::StreamExt;

    #[tokio::test]
    async fn test_stream_sets_content_type() {
        let result = FetchResult::new(
            once_stream(Bytes::from_static(b"hello")),
            Some("text/plain".into()),
        );
        let response = stream(result);

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/plain");
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(body.as_ref(), b"hello");
    }

    #[tokio::test]
    async fn test_stream_without_content_type() {
        let result = FetchResult::new(once_stream(Bytes::from_static(b"x")), None);
        let response = stream(result);
        assert!(response.headers().get(CONTENT_TYPE).is_none());
    }

    #[tokio::test]
    async fn test_stream_drops_invalid_content_type() {
        let result = FetchResult::new(
            once_stream(Bytes::from_static(b"x")),
            Some("text/plain\nx".into()),
        );
        let response = stream(result);
        assert!(response.headers().get(CONTENT_TYPE).is_none());
    }

    #[tokio::test]
    async fn test_stream_surfaces_mid_body_failure() {
        let chunks = futures_util::stream::iter(vec![
            Ok(Bytes::from_static(b"partial")),
            Err(ProxyError::StreamLimitExceeded { limit: 7 }),
        ])
        .boxed();
        let response = stream(FetchResult::new(chunks, None));

        assert_eq!(response.status(), StatusCode::OK);
        assert!(axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .is_err());
    }

    #[test]
    fn test_not_found_is_empty() {
        let response = not_found();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().get(CONTENT_TYPE).is_none());
    }
}
