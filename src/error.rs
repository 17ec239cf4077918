//! Error taxonomy for the request pipeline.
//!
//! Every variant is caught at the request boundary, logged, and answered with
//! `404 Not Found`. The client never sees which one occurred.

use thiserror::Error;

use crate::fetch::data::DataUrlError;

/// Failure to turn the encoded path segment into locator text.
#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("decoded bytes are not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Errors raised while routing, decoding, fetching or streaming a locator.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Request path did not split into exactly three segments.
    #[error("malformed path: expected 3 segments, got {segments}")]
    MalformedPath { segments: usize },

    /// Middle segment is not a decodable locator.
    #[error("invalid locator encoding: {0}")]
    InvalidEncoding(#[from] EncodingError),

    /// Decoded locator matches no fetch strategy.
    #[error("unsupported locator starting with {prefix:?}")]
    UnsupportedLocator { prefix: String },

    /// Remote locator is not an absolute http(s) URL.
    #[error("invalid upstream url: {reason}")]
    InvalidUrl { reason: String },

    /// Inline locator is not a well-formed data URL.
    #[error("invalid data url: {0}")]
    InvalidDataUrl(#[from] DataUrlError),

    /// Upstream request failed before a response arrived.
    #[error("upstream unreachable: {0}")]
    UpstreamUnreachable(#[source] reqwest::Error),

    /// Upstream declared a body larger than the configured limit.
    #[error("upstream body of {declared} bytes exceeds limit of {limit} bytes")]
    BodyTooLarge { declared: u64, limit: u64 },

    /// Reading the upstream body failed partway.
    #[error("stream error: {0}")]
    Stream(#[source] reqwest::Error),

    /// Upstream body grew past the configured limit while streaming.
    #[error("stream exceeded limit of {limit} bytes")]
    StreamLimitExceeded { limit: u64 },
}

impl ProxyError {
    /// Short, stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProxyError::MalformedPath { .. } => "malformed_path",
            ProxyError::InvalidEncoding(_) => "invalid_encoding",
            ProxyError::UnsupportedLocator { .. } => "unsupported_locator",
            ProxyError::InvalidUrl { .. } => "invalid_url",
            ProxyError::InvalidDataUrl(_) => "invalid_data_url",
            ProxyError::UpstreamUnreachable(_) => "upstream_unreachable",
            ProxyError::BodyTooLarge { .. } => "body_too_large",
            ProxyError::Stream(_) | ProxyError::StreamLimitExceeded { .. } => "stream",
        }
    }
}

/// Result type for pipeline operations.
pub type ProxyResult<T> = Result<T, ProxyError>;
