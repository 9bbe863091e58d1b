//! Event protocol between a running decode and its consumer.

use stl_decode::StlFormat;

#[cfg(feature = "serde")]
use serde::Serialize;

/// One message from a background decode.
///
/// For a given submission the stream is zero or more `Progress` events, in
/// order and with non-decreasing percentages, followed by exactly one
/// terminal event (`Success` or `Error`). Nothing follows a terminal
/// event; a cancelled decode delivers nothing further at all.
///
/// With the `serde` feature the variants serialize as
/// `{"kind": "progress", "percent": ...}` and so on.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
pub enum DecodeEvent {
    /// Periodic completion report, `percent` in `0..=100`.
    Progress {
        /// Estimated completion percentage.
        percent: u8,
    },

    /// Terminal event: the decode finished and ownership of the attribute
    /// buffers transfers to the receiver.
    Success {
        /// Flat vertex positions, 9 floats per triangle.
        vertices: Vec<f32>,
        /// Flat per-vertex normals, same layout as `vertices`.
        normals: Vec<f32>,
        /// Number of triangles decoded.
        triangle_count: u32,
        /// Which encoding was detected.
        format: StlFormat,
    },

    /// Terminal event: the decode failed. `message` is the literal,
    /// human-readable reason and should be reported without
    /// re-interpretation.
    Error {
        /// Why the file could not be loaded.
        message: String,
    },
}

impl DecodeEvent {
    /// `true` for `Success` and `Error`, the events that end a stream.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Success { .. } | Self::Error { .. })
    }
}
