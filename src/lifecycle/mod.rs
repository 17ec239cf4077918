//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config file → Apply CLI/env overrides → Validate
//!
//! Close (shutdown.rs):
//!     close() → Stop accepting → Drop listener (in-flight requests keep running)
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → close()
//! ```
//!
//! # Design Decisions
//! - Close is abrupt: connections already accepted are not drained
//! - Close may happen before serving starts and is remembered

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{Shutdown, ShutdownSignal};
pub use startup::{resolve_config, Overrides};
