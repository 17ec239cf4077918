//! Startup configuration resolution.
//!
//! # Responsibilities
//! - Load the optional config file
//! - Apply command-line / environment overrides on top
//! - Validate the merged result before anything binds
//!
//! Precedence, lowest first: built-in defaults, config file, overrides.

use std::path::Path;

use crate::config::{load_config, validate_config, ConfigError, ProxyConfig};

/// Listener settings given on the command line or through the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Build the effective configuration.
pub fn resolve_config(
    file: Option<&Path>,
    overrides: Overrides,
) -> Result<ProxyConfig, ConfigError> {
    let mut config = match file {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Loading config file");
            load_config(path)?
        }
        None => ProxyConfig::default(),
    };

    if let Some(host) = overrides.host {
        config.listener.host = host;
    }
    if let Some(port) = overrides.port {
        config.listener.port = port;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
