//! TCP listener setup.
//!
//! # Responsibilities
//! - Bind to the configured host and port
//! - Abstract the accept call so the serve loop can run on any source
//! - Decide how long to back off after an accept failure

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};

use crate::config::ListenerConfig;

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Failed to bind to address.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },
}

/// Bind a TCP listener for the configured host and port.
pub async fn bind(config: &ListenerConfig) -> Result<TcpListener, ListenerError> {
    let host = config.bind_host();
    let addr = format!("{host}:{}", config.port);

    let listener = TcpListener::bind((host, config.port))
        .await
        .map_err(|source| ListenerError::Bind {
            addr: addr.clone(),
            source,
        })?;

    tracing::info!(
        address = %addr,
        local_addr = ?listener.local_addr().ok(),
        "Listener bound"
    );

    Ok(listener)
}

/// Pause after an accept failure that is not tied to a single connection,
/// such as running out of file descriptors.
pub const ACCEPT_BACKOFF: Duration = Duration::from_secs(1);

/// A source of accepted TCP connections.
pub trait Accept {
    fn accept(&self) -> impl Future<Output = io::Result<(TcpStream, SocketAddr)>> + Send;

    fn local_addr(&self) -> io::Result<SocketAddr>;
}

impl Accept for TcpListener {
    fn accept(&self) -> impl Future<Output = io::Result<(TcpStream, SocketAddr)>> + Send {
        TcpListener::accept(self)
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        TcpListener::local_addr(self)
    }
}

/// How long to wait before accepting again after `e`.
///
/// Failures of the connection being accepted retry at once. Anything else
/// (`EMFILE`, `ENFILE`, `ENOBUFS`, ...) is usually resource exhaustion that
/// clears on its own, so the loop sleeps instead of spinning. No accept error
/// ends serving.
pub fn accept_backoff(e: &io::Error) -> Option<Duration> {
    if is_connection_error(e) {
        None
    } else {
        Some(ACCEPT_BACKOFF)
    }
}

/// Whether an accept error concerns only the connection being accepted.
pub fn is_connection_error(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset
    )
}
