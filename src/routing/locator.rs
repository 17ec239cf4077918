//! Base64 locator decoding.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::EncodingError;
use crate::routing::router::EncodedLocator;

/// Locator text recovered from the path. Prefix interpretation happens later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedLocator(String);

impl DecodedLocator {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Decode a path segment with the standard, padded base64 alphabet.
pub fn decode(loc: &EncodedLocator) -> Result<DecodedLocator, EncodingError> {
    let bytes = STANDARD.decode(loc.as_str())?;
    let text = String::from_utf8(bytes)?;
    Ok(DecodedLocator(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::router::route;

    fn decode_path(path: &str) -> Result<DecodedLocator, EncodingError> {
        decode(&route(path).unwrap())
    }

    #[test]
    fn test_decode_url() {
        let decoded = decode_path("/aHR0cDovL2V4YW1wbGUuY29tL2Zvbw==/x").unwrap();
        assert_eq!(decoded.as_str(), "http://example.com/foo");
    }

    #[test]
    fn test_decode_rejects_invalid_base64() {
        assert!(matches!(
            decode_path("/not*base64/x"),
            Err(EncodingError::Base64(_))
        ));
        // URL-safe alphabet is not accepted.
        assert!(matches!(decode_path("/__4=/x"), Err(EncodingError::Base64(_))));
        // Padding is mandatory.
        assert!(matches!(
            decode_path("/SGVsbG8/x"),
            Err(EncodingError::Base64(_))
        ));
    }

    #[test]
    fn test_decode_rejects_invalid_utf8() {
        // 0xc3 0x28
        assert!(matches!(decode_path("/wyg=/x"), Err(EncodingError::Utf8(_))));
    }

    #[test]
    fn test_decode_empty_segment() {
        let decoded = decode_path("//x").unwrap();
        assert_eq!(decoded.as_str(), "");
    }
}
