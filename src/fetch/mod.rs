//! Fetch strategies.
//!
//! # Data Flow
//! ```text
//! DecodedLocator
//!     → Strategy::select (prefix: "http" → Remote, "data" → Data)
//!     → remote.rs (GET via reqwest, body streamed)
//!       | data.rs (RFC 2397 decode, no I/O)
//!     → FetchResult { body stream, content type }
//! ```
//!
//! # Design Decisions
//! - The strategy is chosen once per request and never re-dispatched
//! - Both strategies hand back the same stream type so the response path is shared
//! - The body is read at most once and released on drop

pub mod data;
pub mod policy;
pub mod remote;

use std::fmt;
use std::future::Future;

use bytes::Bytes;
use futures_util::stream::{BoxStream, StreamExt, TryStreamExt};

use crate::error::{ProxyError, ProxyResult};

pub use data::{DataFetch, DataUrl, DataUrlError};
pub use policy::FetchPolicy;
pub use remote::RemoteFetch;

/// Read-once body stream produced by a fetch.
pub type ByteStream = BoxStream<'static, ProxyResult<Bytes>>;

/// Maximum number of characters of an unsupported locator echoed into logs.
const PREFIX_PREVIEW_CHARS: usize = 16;

/// Fetched content: a body stream plus the content type, if one is known.
pub struct FetchResult {
    pub body: ByteStream,
    pub content_type: Option<String>,
}

impl FetchResult {
    /// Create a result, treating an empty content type as unknown.
    pub fn new(body: ByteStream, content_type: Option<String>) -> Self {
        Self {
            body,
            content_type: content_type.filter(|ct| !ct.is_empty()),
        }
    }

    /// Drain the stream into a single buffer.
    pub async fn into_bytes(self) -> ProxyResult<Bytes> {
        let chunks: Vec<Bytes> = self.body.try_collect().await?;
        Ok(chunks.concat().into())
    }
}

impl fmt::Debug for FetchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchResult")
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// A way of turning locator text into content.
pub trait Fetch {
    fn fetch(&self, locator: &str) -> impl Future<Output = ProxyResult<FetchResult>> + Send;
}

/// Which fetch implementation handles a locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Remote,
    Data,
}

impl Strategy {
    /// Pick a strategy from the locator's literal prefix.
    ///
    /// `http` is checked before `data`.
    pub fn select(decoded: &str) -> ProxyResult<Self> {
        if decoded.starts_with("http") {
            Ok(Strategy::Remote)
        } else if decoded.starts_with("data") {
            Ok(Strategy::Data)
        } else {
            Err(ProxyError::UnsupportedLocator {
                prefix: decoded.chars().take(PREFIX_PREVIEW_CHARS).collect(),
            })
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Remote => "remote",
            Strategy::Data => "data",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owns one instance of each strategy and dispatches to the selected one.
#[derive(Debug, Clone)]
pub struct Fetcher {
    remote: RemoteFetch,
    data: DataFetch,
}

impl Fetcher {
    pub fn new(remote: RemoteFetch) -> Self {
        Self {
            remote,
            data: DataFetch,
        }
    }

    pub async fn fetch(&self, strategy: Strategy, locator: &str) -> ProxyResult<FetchResult> {
        match strategy {
            Strategy::Remote => self.remote.fetch(locator).await,
            Strategy::Data => self.data.fetch(locator).await,
        }
    }
}

/// Wrap a single in-memory buffer as a body stream.
pub(crate) fn once_stream(bytes: Bytes) -> ByteStream {
    futures_util::stream::once(async move { Ok(bytes) }).boxed()
}
