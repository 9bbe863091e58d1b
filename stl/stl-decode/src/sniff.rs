//! ASCII/binary format detection.
//!
//! STL has no magic number, and the informal specification gives no binding
//! rule for telling the two encodings apart. The heuristics here mirror the
//! behavior loaders have converged on in practice:
//!
//! 1. A buffer whose length equals exactly 84 + 50 * T, where T is the
//!    little-endian count at offset 80, is binary: an ASCII file matching
//!    that arithmetic by accident is vanishingly unlikely.
//! 2. Otherwise, inputs shorter than [`MIN_BINARY_LEN`] are routed to the
//!    ASCII path: a binary STL cannot be meaningfully shorter than its
//!    84-byte header plus one 50-byte record.
//! 3. A header that does not start with `solid` is binary.
//! 4. A `solid` header alone is not conclusive (binary files sometimes carry
//!    one), so the first [`KEYWORD_SCAN_LEN`] bytes are scanned for the
//!    `facet`/`vertex` keywords that an ASCII body must contain.
//!
//! An ASCII file whose first facet sits beyond the scan window is an
//! accepted misclassification risk, not a contract violation.

use crate::binary::{HEADER_SIZE, RECORD_SIZE};
use crate::StlFormat;

/// Inputs shorter than this are classified as ASCII without further
/// inspection.
pub const MIN_BINARY_LEN: usize = 200;

/// Number of leading bytes scanned for ASCII keywords when the header
/// starts with `solid`.
pub const KEYWORD_SCAN_LEN: usize = 2000;

/// Classify raw STL bytes as binary or ASCII.
///
/// Pure and cheap: inspects at most `min(N, 2000)` bytes and never faults
/// on non-UTF8 content.
///
/// # Example
///
/// ```
/// use stl_decode::{classify, StlFormat};
///
/// assert_eq!(classify(b"solid tiny\nendsolid tiny"), StlFormat::Ascii);
/// ```
#[must_use]
pub fn classify(bytes: &[u8]) -> StlFormat {
    if matches_binary_layout(bytes) {
        return StlFormat::Binary;
    }

    if bytes.len() < MIN_BINARY_LEN {
        return StlFormat::Ascii;
    }

    let header = String::from_utf8_lossy(&bytes[..HEADER_SIZE]);
    if !header.trim_start().to_lowercase().starts_with("solid") {
        return StlFormat::Binary;
    }

    let sample = String::from_utf8_lossy(&bytes[..KEYWORD_SCAN_LEN.min(bytes.len())]).to_lowercase();
    if sample.contains("facet") || sample.contains("vertex") {
        StlFormat::Ascii
    } else {
        StlFormat::Binary
    }
}

/// `true` when the buffer length exactly matches the binary record
/// arithmetic for the count stored at offset 80.
fn matches_binary_layout(bytes: &[u8]) -> bool {
    const RECORDS_START: usize = HEADER_SIZE + 4;
    if bytes.len() < RECORDS_START {
        return false;
    }
    let declared = u32::from_le_bytes([
        bytes[HEADER_SIZE],
        bytes[HEADER_SIZE + 1],
        bytes[HEADER_SIZE + 2],
        bytes[HEADER_SIZE + 3],
    ]);
    RECORDS_START as u64 + u64::from(declared) * RECORD_SIZE as u64 == bytes.len() as u64
}
