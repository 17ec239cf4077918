//! Inline `data:` locators (RFC 2397).
//!
//! ```text
//! data:[<media-type>][;base64],<payload>
//! ```
//!
//! Parsing follows the WHATWG fetch rules via the `data-url` crate: the
//! payload is percent-decoded, then base64-decoded when the `;base64` marker
//! is present. A missing or unparsable media type becomes `text/plain`.

use bytes::Bytes;
use thiserror::Error;

use crate::error::ProxyResult;
use crate::fetch::{once_stream, Fetch, FetchResult};

/// Reasons a `data:` locator fails to parse.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DataUrlError {
    #[error("missing \"data:\" scheme")]
    MissingScheme,

    #[error("missing ',' between header and payload")]
    MissingComma,

    #[error("invalid base64 payload")]
    Base64,
}

impl From<data_url::DataUrlError> for DataUrlError {
    fn from(e: data_url::DataUrlError) -> Self {
        match e {
            data_url::DataUrlError::NotADataUrl => DataUrlError::MissingScheme,
            data_url::DataUrlError::NoComma => DataUrlError::MissingComma,
        }
    }
}

/// A parsed `data:` locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    media_type: String,
    data: Bytes,
}

impl DataUrl {
    pub fn parse(input: &str) -> Result<Self, DataUrlError> {
        let url = data_url::DataUrl::process(input)?;

        let mime = url.mime_type();
        let media_type = format!("{}/{}", mime.type_, mime.subtype);

        let (data, _fragment) = url.decode_to_vec().map_err(|_| DataUrlError::Base64)?;

        Ok(Self {
            media_type,
            data: Bytes::from(data),
        })
    }

    /// The declared `type/subtype`, lowercased, without parameters.
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn into_data(self) -> Bytes {
        self.data
    }
}

/// Serves `data:` locators from memory.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataFetch;

impl Fetch for DataFetch {
    async fn fetch(&self, locator: &str) -> ProxyResult<FetchResult> {
        let url = DataUrl::parse(locator)?;
        tracing::debug!(
            media_type = %url.media_type(),
            bytes = url.data().len(),
            "Decoded data locator"
        );
        let content_type = url.media_type().to_string();
        Ok(FetchResult::new(
            once_stream(url.into_data()),
            Some(content_type),
        ))
    }
}
