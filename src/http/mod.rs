//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (accept loop, hyper connection with a large header limit)
//!     → request.rs (assign x-request-id, open request span)
//!     → handler.rs (route → decode → select → fetch)
//!     → response.rs (Content-Type + streamed body, or bare 404)
//!     → Send to client
//! ```

pub mod handler;
pub mod request;
pub mod response;
pub mod server;

pub use request::{request_id, X_REQUEST_ID};
pub use server::{ProxyServer, ServerError, ServerState};
