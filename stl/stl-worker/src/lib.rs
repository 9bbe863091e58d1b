//! Background STL decoding with a streamed event protocol.
//!
//! `stl-decode` does the parsing; this crate keeps it off the caller's
//! latency-sensitive thread. A submission moves its byte buffer into a
//! worker thread and hands back a [`DecodeHandle`], a one-directional,
//! ordered stream of [`DecodeEvent`]s:
//!
//! - zero or more `Progress` events, percentages non-decreasing in
//!   `0..=100`;
//! - exactly one terminal `Success` (carrying the decoded buffers by
//!   move) or `Error` event.
//!
//! Dropping the handle cancels the decode; no further events are
//! delivered after that.
//!
//! # Example
//!
//! ```
//! use stl_worker::{spawn, DecodeEvent, DecodeJob};
//!
//! let text = "solid t
//! facet normal 0 0 1
//!   outer loop
//!     vertex 0 0 0
//!     vertex 1 0 0
//!     vertex 0 1 0
//!   endloop
//! endfacet
//! endsolid t";
//!
//! let handle = spawn(DecodeJob::new(text.as_bytes().to_vec(), "triangle.stl"));
//! match handle.wait() {
//!     Some(DecodeEvent::Success { triangle_count, .. }) => assert_eq!(triangle_count, 1),
//!     other => panic!("expected success, got {other:?}"),
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod event;
mod worker;

pub use event::DecodeEvent;
pub use worker::{spawn, DecodeHandle, DecodeJob};

// Callers matching on Success events need the format type.
pub use stl_decode::StlFormat;
