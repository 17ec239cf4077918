//! The request pipeline.
//!
//! # Responsibilities
//! - Run route → decode → select → fetch for every request, any method
//! - Log failures with their cause and answer them with a bare 404
//! - Record request metrics

use std::time::Instant;

use axum::extract::State;
use axum::http::Uri;
use axum::response::Response;

use crate::error::{ProxyError, ProxyResult};
use crate::fetch::{FetchResult, Fetcher, Strategy};
use crate::http::response;
use crate::observability::metrics;
use crate::routing;

/// Application state injected into the handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub fetcher: Fetcher,
}

/// Fallback handler serving every path.
pub async fn proxy_handler(State(state): State<AppState>, uri: Uri) -> Response {
    let start = Instant::now();

    match resolve(&state.fetcher, uri.path()).await {
        Ok((strategy, result)) => {
            tracing::debug!(
                strategy = %strategy,
                content_type = ?result.content_type,
                "Streaming fetched content"
            );
            metrics::record_request(strategy.as_str(), 200, start);
            response::stream(result)
        }
        Err(e) => {
            match &e {
                ProxyError::MalformedPath { segments } => {
                    tracing::debug!(segments, "Path does not match /<locator>/<name>");
                }
                _ => {
                    tracing::error!(error = %e, kind = e.kind(), "Failed to process locator");
                }
            }
            metrics::record_fetch_error(e.kind());
            metrics::record_request("none", 404, start);
            response::not_found()
        }
    }
}

/// Run the pipeline up to the point where the body is ready to stream.
pub async fn resolve(fetcher: &Fetcher, path: &str) -> ProxyResult<(Strategy, FetchResult)> {
    let encoded = routing::route(path)?;
    let decoded = routing::decode(&encoded)?;
    let strategy = Strategy::select(decoded.as_str())?;

    tracing::debug!(strategy = %strategy, locator_len = decoded.as_str().len(), "Selected fetch strategy");

    let result = fetcher.fetch(strategy, decoded.as_str()).await?;
    Ok((strategy, result))
}
