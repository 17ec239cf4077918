//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, header limit within server bounds)
//! - Check addresses and log levels parse before anything starts

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ProxyConfig;

/// Smallest request-head buffer the HTTP/1 connection accepts.
pub const MIN_HEADER_BYTES: usize = 8192;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("listener.max_header_bytes must be at least 8192, got {0}")]
    HeaderLimitTooSmall(usize),

    #[error("fetch.{field} must be greater than zero")]
    ZeroLimit { field: &'static str },

    #[error("observability.log_level {0:?} is not a log level")]
    LogLevel(String),

    #[error("observability.metrics_address {0:?} is not a socket address")]
    MetricsAddress(String),
}

/// Collect every problem rather than stopping at the first.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.max_header_bytes < MIN_HEADER_BYTES {
        errors.push(ValidationError::HeaderLimitTooSmall(
            config.listener.max_header_bytes,
        ));
    }

    let fetch = &config.fetch;
    let limits = [
        ("timeout_secs", fetch.timeout_secs),
        ("connect_timeout_secs", fetch.connect_timeout_secs),
        ("max_body_bytes", fetch.max_body_bytes),
    ];
    for (field, value) in limits {
        if value == Some(0) {
            errors.push(ValidationError::ZeroLimit { field });
        }
    }

    let observability = &config.observability;
    if observability.log_level.parse::<tracing::Level>().is_err() {
        errors.push(ValidationError::LogLevel(observability.log_level.clone()));
    }
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
