//! Path routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path ("/<base64>/<name>")
//!     → router.rs (percent-decode, split, validate segment count)
//!     → locator.rs (base64 → locator text)
//!     → fetch::Strategy::select (prefix dispatch)
//! ```
//!
//! # Design Decisions
//! - Pure functions of the path; no state, no allocation beyond the decoded text
//! - Exactly one route shape exists; everything else is a miss
//! - The trailing segment is required but never interpreted

pub mod locator;
pub mod router;

pub use locator::{decode, DecodedLocator};
pub use router::{route, EncodedLocator};
