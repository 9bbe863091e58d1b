//! STL decoding into flat per-vertex attribute buffers.
//!
//! This crate turns the raw bytes of an STL file — binary or ASCII, the
//! variant is detected automatically — into two flat `f32` buffers
//! (positions and normals) ready for upload to a rendering pipeline.
//!
//! - **No indexing**: every triangle contributes 3 independent vertices,
//!   and the facet normal is repeated once per vertex. Topology validation
//!   and vertex deduplication are out of scope.
//! - **No transforms**: coordinates come out exactly as stored.
//! - **Move semantics**: the input buffer is consumed by the decoder and
//!   the result buffers are moved out to the caller; multi-megabyte meshes
//!   are never copied at the API boundary.
//!
//! Long decodes report progress through a [`ProgressSink`], which can also
//! cancel the operation. For running a decode off a latency-sensitive
//! thread with a streamed event protocol, see the `stl-worker` crate.
//!
//! # Example
//!
//! ```
//! use stl_decode::{decode, StlFormat};
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
//! let decoded = decode(text.as_bytes().to_vec()).unwrap();
//! assert_eq!(decoded.format, StlFormat::Ascii);
//! assert_eq!(decoded.triangle_count, 1);
//! assert_eq!(decoded.buffers.vertices.len(), 9);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod ascii;
mod binary;
mod buffers;
mod error;
mod progress;
mod sniff;

pub use ascii::encode_ascii;
pub use binary::encode_binary;
pub use buffers::{Facet, MeshBuffers};
pub use error::{DecodeError, DecodeResult};
pub use progress::{Discard, ProgressMeter, ProgressSink};
pub use sniff::{classify, KEYWORD_SCAN_LEN, MIN_BINARY_LEN};

use std::fmt;

use tracing::debug;

#[cfg(feature = "serde")]
use serde::Serialize;

/// The two on-disk STL encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(rename_all = "lowercase"))]
pub enum StlFormat {
    /// Fixed-width little-endian records behind an 80-byte header.
    Binary,
    /// Whitespace-delimited keyword grammar.
    Ascii,
}

impl StlFormat {
    /// Stable lowercase name, `"binary"` or `"ascii"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Ascii => "ascii",
        }
    }
}

impl fmt::Display for StlFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A successful decode: the attribute buffers plus summary metadata.
///
/// Constructed once per decode call and moved out to the caller; the
/// decoder retains no reference to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    /// Flat position and normal streams.
    pub buffers: MeshBuffers,
    /// Number of triangles decoded.
    pub triangle_count: u32,
    /// Which encoding the sniffer detected.
    pub format: StlFormat,
}

/// Decode STL bytes, reporting progress to `sink`.
///
/// The format is detected with [`classify`] and the matching decoder runs
/// to completion. The input buffer is consumed; the result buffers are
/// moved to the caller.
///
/// # Errors
///
/// - [`DecodeError::EmptyInput`] for a zero-length buffer.
/// - [`DecodeError::ShortHeader`] / [`DecodeError::BinaryOverrun`] when a
///   binary input is shorter than its declared layout.
/// - [`DecodeError::Cancelled`] when `sink` returns `false`.
pub fn decode_with_progress(
    bytes: Vec<u8>,
    sink: &mut dyn ProgressSink,
) -> DecodeResult<Decoded> {
    if bytes.is_empty() {
        return Err(DecodeError::EmptyInput);
    }

    let format = classify(&bytes);
    debug!(format = %format, len = bytes.len(), "classified STL input");

    let buffers = match format {
        StlFormat::Binary => binary::decode_binary(&bytes, sink)?,
        StlFormat::Ascii => ascii::decode_ascii(&bytes, sink)?,
    };

    #[allow(clippy::cast_possible_truncation)]
    // Truncation: binary counts are u32 on disk; an ASCII file with more
    // than u32::MAX facets does not fit in memory.
    let triangle_count = buffers.triangle_count() as u32;

    Ok(Decoded {
        buffers,
        triangle_count,
        format,
    })
}

/// Decode STL bytes, discarding progress.
///
/// # Errors
///
/// See [`decode_with_progress`].
pub fn decode(bytes: Vec<u8>) -> DecodeResult<Decoded> {
    decode_with_progress(bytes, &mut Discard)
}
