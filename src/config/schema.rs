//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the external proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (host, port, header limits).
    pub listener: ListenerConfig,

    /// Upstream fetch limits.
    pub fetch: FetchConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Listening host; empty means all interfaces.
    pub host: String,

    /// Listening port.
    pub port: u16,

    /// Largest request head accepted, in bytes. Locators travel in the path,
    /// so this is far above typical server defaults.
    pub max_header_bytes: usize,
}

impl ListenerConfig {
    /// Host to bind, with an empty host meaning every interface.
    pub fn bind_host(&self) -> &str {
        if self.host.is_empty() {
            "0.0.0.0"
        } else {
            &self.host
        }
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 8080,
            max_header_bytes: 50 << 20,
        }
    }
}

/// Upstream fetch configuration. Every limit is off unless set.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct FetchConfig {
    /// Total time allowed for one upstream exchange, in seconds.
    pub timeout_secs: Option<u64>,

    /// Upstream connection establishment timeout, in seconds.
    pub connect_timeout_secs: Option<u64>,

    /// Largest upstream body relayed to the client, in bytes.
    pub max_body_bytes: Option<u64>,

    /// User-Agent header sent upstream.
    pub user_agent: Option<String>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
