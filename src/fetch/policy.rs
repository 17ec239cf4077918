//! Limits applied to remote fetches.
//!
//! # Design Decisions
//! - Every limit is optional; the default policy imposes none
//! - Timeouts cover the whole exchange, body included
//! - Body limits check the declared length first, then count streamed bytes

use std::time::Duration;

use crate::config::FetchConfig;

/// Timeouts and size limits for [`RemoteFetch`](super::RemoteFetch).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchPolicy {
    /// Total time allowed for one upstream exchange.
    pub timeout: Option<Duration>,

    /// Time allowed to establish the upstream connection.
    pub connect_timeout: Option<Duration>,

    /// Largest upstream body that will be relayed.
    pub max_body_bytes: Option<u64>,

    /// User-Agent sent upstream; the client default when unset.
    pub user_agent: Option<String>,
}

impl From<&FetchConfig> for FetchPolicy {
    fn from(config: &FetchConfig) -> Self {
        Self {
            timeout: config.timeout_secs.map(Duration::from_secs),
            connect_timeout: config.connect_timeout_secs.map(Duration::from_secs),
            max_body_bytes: config.max_body_bytes,
            user_agent: config.user_agent.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_unbounded() {
        let policy = FetchPolicy::from(&FetchConfig::default());
        assert_eq!(policy, FetchPolicy::default());
        assert!(policy.timeout.is_none());
        assert!(policy.max_body_bytes.is_none());
    }

    #[test]
    fn test_policy_from_config() {
        let config = FetchConfig {
            timeout_secs: Some(30),
            connect_timeout_secs: Some(5),
            max_body_bytes: Some(1024),
            user_agent: Some("external-proxy".into()),
        };
        let policy = FetchPolicy::from(&config);
        assert_eq!(policy.timeout, Some(Duration::from_secs(30)));
        assert_eq!(policy.connect_timeout, Some(Duration::from_secs(5)));
        assert_eq!(policy.max_body_bytes, Some(1024));
        assert_eq!(policy.user_agent.as_deref(), Some("external-proxy"));
    }
}
