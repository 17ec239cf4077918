//! Request path validation.
//!
//! # Responsibilities
//! - Percent-decode the request path
//! - Require exactly three `/`-delimited segments
//! - Hand back the middle segment as the encoded locator

use percent_encoding::percent_decode_str;

use crate::error::{ProxyError, ProxyResult};

/// Number of segments in `/<locator>/<name>` after splitting on `/`.
const EXPECTED_SEGMENTS: usize = 3;

/// The base64 segment taken from the middle of the request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedLocator(String);

impl EncodedLocator {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Extract the encoded locator from a request path.
///
/// The path is percent-decoded first, so `%3D` padding arrives as `=` and an
/// escaped `%2F` counts as a separator.
pub fn route(path: &str) -> ProxyResult<EncodedLocator> {
    let decoded = percent_decode_str(path).decode_utf8_lossy();
    let segments: Vec<&str> = decoded.split('/').collect();

    if segments.len() != EXPECTED_SEGMENTS {
        return Err(ProxyError::MalformedPath {
            segments: segments.len(),
        });
    }

    Ok(EncodedLocator(segments[1].to_string()))
}
