//! Error types for STL decoding.

use thiserror::Error;

/// Result type for decode operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Errors that can occur while decoding an STL byte stream.
///
/// Per-facet malformations in ASCII input are not represented here: the
/// ASCII decoder recovers by skipping the offending facet, so a slightly
/// damaged file still yields a usable (shorter) mesh.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The input buffer was empty.
    #[error("empty input: no bytes to decode")]
    EmptyInput,

    /// A buffer routed to the binary decoder is too short to hold the
    /// mandatory 80-byte header and 4-byte triangle count.
    #[error("malformed binary STL: {got} bytes is too short for the 84-byte header")]
    ShortHeader {
        /// Bytes actually present.
        got: usize,
    },

    /// A binary STL header declared more triangles than the buffer holds.
    ///
    /// The fixed-width record layout has no way to resynchronize after an
    /// overrun, so this is fatal rather than truncated.
    #[error(
        "malformed binary STL: {declared} triangles require {needed} bytes, but only {got} are present"
    )]
    BinaryOverrun {
        /// Triangle count declared in the header.
        declared: u32,
        /// Total bytes required by the declared count.
        needed: u64,
        /// Bytes actually present.
        got: usize,
    },

    /// The caller requested cancellation through its progress sink.
    #[error("decode cancelled by caller")]
    Cancelled,
}
