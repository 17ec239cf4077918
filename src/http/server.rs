//! HTTP server setup and lifecycle.
//!
//! # Responsibilities
//! - Create the Axum router with the pipeline handler as the only route
//! - Wire up middleware (request ID, tracing)
//! - Accept connections and serve each on its own task
//! - Keep accepting through transient accept failures such as fd exhaustion
//! - Configure the request head limit for long locators
//! - Close abruptly on request: stop accepting, leave in-flight requests alone
//!
//! # States
//! ```text
//! Created ──serve()──▶ Listening ──close()──▶ Closed
//!    └───────────────────close()──────────────────┘
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::Router;
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto;
use thiserror::Error;
use tokio::net::TcpListener;
use tower::{ServiceBuilder, ServiceExt};
use tower_http::trace::TraceLayer;
use tracing::Instrument;

use crate::config::validation::MIN_HEADER_BYTES;
use crate::config::{ListenerConfig, ProxyConfig};
use crate::fetch::{FetchPolicy, Fetcher, RemoteFetch};
use crate::http::handler::{proxy_handler, AppState};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::lifecycle::Shutdown;
use crate::net::listener::{self, Accept, ListenerError};
use crate::observability::tracing::make_request_span;

/// Errors that end `serve`.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Bind(#[from] ListenerError),

    #[error("server is closed")]
    Closed,

    #[error("failed to build upstream client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Observable lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    Created,
    Listening,
    Closed,
}

/// HTTP server for the external proxy.
pub struct ProxyServer {
    router: Router,
    config: ListenerConfig,
    shutdown: Shutdown,
    listening: AtomicBool,
}

impl ProxyServer {
    /// Create a server with an upstream client built from the fetch config.
    pub fn new(config: ProxyConfig) -> Result<Self, ServerError> {
        let remote =
            RemoteFetch::new(FetchPolicy::from(&config.fetch)).map_err(ServerError::Client)?;
        Ok(Self::with_fetcher(config.listener, Fetcher::new(remote)))
    }

    /// Create a server around an existing fetcher.
    pub fn with_fetcher(config: ListenerConfig, fetcher: Fetcher) -> Self {
        let router = Self::build_router(AppState { fetcher });
        Self {
            router,
            config,
            shutdown: Shutdown::new(),
            listening: AtomicBool::new(false),
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .fallback(proxy_handler)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
                    .layer(propagate_request_id_layer()),
            )
    }

    pub fn state(&self) -> ServerState {
        if self.shutdown.is_triggered() {
            ServerState::Closed
        } else if self.listening.load(Ordering::SeqCst) {
            ServerState::Listening
        } else {
            ServerState::Created
        }
    }

    /// Bind the configured address and serve until closed.
    pub async fn serve(&self) -> Result<(), ServerError> {
        if self.shutdown.is_triggered() {
            return Err(ServerError::Closed);
        }
        let listener = listener::bind(&self.config).await?;
        self.serve_on(listener).await
    }

    /// Serve on an already bound listener until closed.
    pub async fn serve_on(&self, listener: TcpListener) -> Result<(), ServerError> {
        self.accept_loop(listener).await
    }

    /// Accept connections from `listener` until `close` is called.
    ///
    /// Accept failures never end the loop. Errors that are not tied to a
    /// single connection pause it for [`listener::ACCEPT_BACKOFF`], and a
    /// `close` during that pause still returns at once.
    async fn accept_loop<L>(&self, listener: L) -> Result<(), ServerError>
    where
        L: Accept + Send + Sync,
    {
        if self.shutdown.is_triggered() {
            return Err(ServerError::Closed);
        }
        self.listening.store(true, Ordering::SeqCst);

        tracing::info!(
            address = ?listener.local_addr().ok(),
            max_header_bytes = self.config.max_header_bytes,
            "Serving Web"
        );

        let builder = Arc::new(self.connection_builder());
        let mut closed = self.shutdown.subscribe();

        loop {
            let accepted = tokio::select! {
                _ = closed.recv() => break,
                accepted = listener.accept() => accepted,
            };

            let (stream, peer_addr) = match accepted {
                Ok(conn) => conn,
                Err(e) => match listener::accept_backoff(&e) {
                    None => {
                        tracing::debug!(error = %e, "Connection failed during accept");
                        continue;
                    }
                    Some(backoff) => {
                        tracing::error!(
                            error = %e,
                            backoff_ms = backoff.as_millis() as u64,
                            "Failed to accept connection, retrying"
                        );
                        tokio::select! {
                            _ = closed.recv() => break,
                            _ = tokio::time::sleep(backoff) => continue,
                        }
                    }
                },
            };

            let router = self.router.clone();
            let service = service_fn(move |request: Request<Incoming>| {
                router.clone().oneshot(request)
            });
            let builder = Arc::clone(&builder);
            let connection = async move {
                if let Err(e) = builder.serve_connection(TokioIo::new(stream), service).await {
                    tracing::debug!(error = %e, "Connection closed with error");
                }
            };
            tokio::spawn(connection.instrument(tracing::debug_span!("connection", %peer_addr)));
        }

        drop(listener);
        self.listening.store(false, Ordering::SeqCst);
        self.shutdown.trigger();

        tracing::info!("Web server stopped");
        Ok(())
    }

    /// Stop accepting connections. Idempotent, and safe before `serve`.
    pub fn close(&self) {
        if self.shutdown.trigger() {
            tracing::info!("Closing web listener");
        }
    }

    fn connection_builder(&self) -> auto::Builder<TokioExecutor> {
        let max_header_bytes = self.config.max_header_bytes.max(MIN_HEADER_BYTES);

        let mut builder = auto::Builder::new(TokioExecutor::new());
        builder.http1().max_buf_size(max_header_bytes);
        builder
            .http2()
            .max_header_list_size(u32::try_from(max_header_bytes).unwrap_or(u32::MAX));
        builder
    }

    /// Get a reference to the listener config.
    pub fn config(&self) -> &ListenerConfig {
        &self.config
    }
}
