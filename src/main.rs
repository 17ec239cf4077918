//! External Proxy
//!
//! Proxies external URLs and inline data through a single origin.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                EXTERNAL PROXY                 │
//!   GET /<b64>/<name>    │  ┌─────────┐   ┌─────────┐   ┌────────────┐  │
//!   ─────────────────────┼─▶│   net   │──▶│  http   │──▶│  routing   │  │
//!                        │  │listener │   │ server  │   │route+decode│  │
//!                        │  └─────────┘   └─────────┘   └─────┬──────┘  │
//!                        │                                    ▼         │
//!                        │                             ┌────────────┐   │
//!                        │                             │   fetch    │───┼──▶ Upstream
//!                        │                             │remote│data │   │
//!   200 + body / 404     │  ┌──────────┐               └─────┬──────┘   │
//!   ◀────────────────────┼──│ response │◀────────────────────┘          │
//!                        │  └──────────┘                                │
//!                        └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use external_proxy::config::ObservabilityConfig;
use external_proxy::lifecycle::{resolve_config, signals, Overrides};
use external_proxy::observability::{logging, metrics};
use external_proxy::ProxyServer;

#[derive(Parser, Debug)]
#[command(name = "external-proxy", version, about = "Proxies external urls")]
struct Args {
    /// Listening host (all interfaces when empty)
    #[arg(long, env = "WEB_HOST")]
    host: Option<String>,

    /// HTTP listening port
    #[arg(long, env = "WEB_PORT")]
    port: Option<u16>,

    /// Optional TOML configuration file
    #[arg(short, long, env = "EXTERNAL_PROXY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match resolve_config(
        args.config.as_deref(),
        Overrides {
            host: args.host,
            port: args.port,
        },
    ) {
        Ok(config) => config,
        Err(e) => {
            // The subscriber is configured from the file that just failed.
            let _ = logging::init(&ObservabilityConfig::default());
            tracing::error!(error = %e, "Failed to load configuration");
            return Err(e.into());
        }
    };

    logging::init(&config.observability)?;

    tracing::info!("external-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        host = %config.listener.bind_host(),
        port = config.listener.port,
        max_header_bytes = config.listener.max_header_bytes,
        fetch_timeout_secs = ?config.fetch.timeout_secs,
        max_body_bytes = ?config.fetch.max_body_bytes,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(e) => {
                tracing::error!(
                    metrics_address = %config.observability.metrics_address,
                    error = %e,
                    "Failed to parse metrics address"
                );
            }
        }
    }

    let server = Arc::new(ProxyServer::new(config)?);

    let closer = Arc::clone(&server);
    tokio::spawn(async move {
        signals::shutdown_signal().await;
        closer.close();
    });

    if let Err(e) = server.serve().await {
        tracing::error!(error = %e, "Failed to serve application");
        return Err(e.into());
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
