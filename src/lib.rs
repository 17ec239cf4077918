//! External Proxy Library
//!
//! Serves arbitrary external content through one origin. A request for
//! `/<base64 locator>/<name>` decodes the locator and relays either a remote
//! HTTP(S) resource or an inline `data:` payload.

pub mod config;
pub mod error;
pub mod fetch;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod routing;

pub use config::schema::ProxyConfig;
pub use error::{ProxyError, ProxyResult};
pub use http::{ProxyServer, ServerError, ServerState};
pub use lifecycle::Shutdown;
