//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (subscriber setup: env filter, pretty or JSON output)
//!     → tracing.rs (per-request spans carrying the request ID)
//!     → metrics.rs (counters and histograms, Prometheus scrape endpoint)
//! ```
//!
//! # Design Decisions
//! - Structured fields on every event, never interpolated strings
//! - Request ID flows from the inbound header into every log line
//! - Locator text is never logged in full; paths can be megabytes long
//! - Metrics are no-ops until an exporter is installed

pub mod logging;
pub mod metrics;
pub mod tracing;
