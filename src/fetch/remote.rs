//! Remote fetch over HTTP(S).
//!
//! # Responsibilities
//! - Validate the locator as an absolute http(s) URL
//! - Issue a single GET (no retries, client-default redirects)
//! - Relay the upstream body as a stream with its Content-Type
//! - Keep the upstream URL out of logs and error messages
//!
//! The upstream status code is deliberately ignored: error pages are relayed
//! as if they were the requested content.

use bytes::Bytes;
use futures_util::future;
use futures_util::stream::{Stream, StreamExt, TryStreamExt};
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::error::{ProxyError, ProxyResult};
use crate::fetch::{ByteStream, Fetch, FetchPolicy, FetchResult};

/// Fetches locators that name a remote resource.
#[derive(Debug, Clone)]
pub struct RemoteFetch {
    client: reqwest::Client,
    policy: FetchPolicy,
}

impl RemoteFetch {
    /// Build a client that honors the policy's connect timeout and user agent.
    pub fn new(policy: FetchPolicy) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = policy.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(user_agent) = &policy.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }
        Ok(Self::with_client(builder.build()?, policy))
    }

    /// Use an existing client, e.g. one shared with other components.
    pub fn with_client(client: reqwest::Client, policy: FetchPolicy) -> Self {
        Self { client, policy }
    }

    pub fn policy(&self) -> &FetchPolicy {
        &self.policy
    }
}

impl Fetch for RemoteFetch {
    async fn fetch(&self, locator: &str) -> ProxyResult<FetchResult> {
        let url = parse_upstream_url(locator)?;

        let mut request = self.client.get(url.clone());
        if let Some(timeout) = self.policy.timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ProxyError::UpstreamUnreachable(e.without_url()))?;

        tracing::debug!(
            host = url.host_str().unwrap_or_default(),
            path_len = url.path().len(),
            status = %response.status(),
            content_length = ?response.content_length(),
            "Upstream responded"
        );

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        if let (Some(limit), Some(declared)) =
            (self.policy.max_body_bytes, response.content_length())
        {
            if declared > limit {
                return Err(ProxyError::BodyTooLarge { declared, limit });
            }
        }

        let stream = response
            .bytes_stream()
            .map_err(|e| ProxyError::Stream(e.without_url()));
        let body: ByteStream = match self.policy.max_body_bytes {
            Some(limit) => limit_stream(stream, limit).boxed(),
            None => stream.boxed(),
        };

        Ok(FetchResult::new(body, content_type))
    }
}

/// Parse locator text as an absolute URL with an http or https scheme.
pub fn parse_upstream_url(locator: &str) -> ProxyResult<Url> {
    let url = Url::parse(locator).map_err(|e| ProxyError::InvalidUrl {
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ProxyError::InvalidUrl {
            reason: format!("unsupported scheme {other:?}"),
        }),
    }
}

/// End the stream with an error once more than `limit` bytes have passed.
fn limit_stream<S>(stream: S, limit: u64) -> impl Stream<Item = ProxyResult<Bytes>>
where
    S: Stream<Item = ProxyResult<Bytes>>,
{
    stream.scan((0u64, false), move |(seen, done), chunk| {
        if *done {
            return future::ready(None);
        }
        let item = match chunk {
            Ok(bytes) => {
                *seen += bytes.len() as u64;
                if *seen > limit {
                    *done = true;
                    Err(ProxyError::StreamLimitExceeded { limit })
                } else {
                    Ok(bytes)
                }
            }
            Err(e) => {
                *done = true;
                Err(e)
            }
        };
        future::ready(Some(item))
    })
}
