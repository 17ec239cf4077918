//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! ListenerConfig (host, port)
//!     → listener.rs (bind, accept, back off on accept errors)
//!     → Hand accepted streams to the HTTP layer
//! ```
//!
//! # Design Decisions
//! - An empty host binds every interface
//! - No accept error ends serving; resource exhaustion pauses the loop briefly

pub mod listener;

pub use listener::{accept_backoff, bind, Accept, ListenerError, ACCEPT_BACKOFF};
