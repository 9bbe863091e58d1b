//! Binary STL decoding and encoding.
//!
//! Layout (all little-endian):
//!
//! ```text
//! UINT8[80]    – Header (content ignored)
//! UINT32       – Triangle count T
//! T records of 50 bytes:
//!     REAL32[3] – Facet normal
//!     REAL32[9] – Three vertices
//!     UINT16    – Attribute byte count (ignored)
//! ```

use nalgebra::Vector3;
use tracing::debug;

use crate::buffers::{Facet, MeshBuffers};
use crate::error::{DecodeError, DecodeResult};
use crate::progress::{ProgressMeter, ProgressSink};

/// Binary STL header size in bytes.
pub(crate) const HEADER_SIZE: usize = 80;

/// Size of one triangle record (normal + 3 vertices + attribute count).
pub(crate) const RECORD_SIZE: usize = 50;

/// Byte offset of the first triangle record.
const RECORDS_START: usize = HEADER_SIZE + 4;

/// Decode a binary STL buffer into flat attribute buffers.
///
/// The declared triangle count is validated against the buffer length
/// before any record is read; an overrun is fatal, never truncated.
/// Progress is reported roughly 50 times over the record walk.
pub(crate) fn decode_binary(
    bytes: &[u8],
    sink: &mut dyn ProgressSink,
) -> DecodeResult<MeshBuffers> {
    if bytes.len() < RECORDS_START {
        return Err(DecodeError::ShortHeader { got: bytes.len() });
    }

    let declared = u32::from_le_bytes([
        bytes[HEADER_SIZE],
        bytes[HEADER_SIZE + 1],
        bytes[HEADER_SIZE + 2],
        bytes[HEADER_SIZE + 3],
    ]);

    // Overflow-safe: the worst case (u32::MAX records) exceeds usize on
    // 32-bit targets.
    let needed = RECORDS_START as u64 + u64::from(declared) * RECORD_SIZE as u64;
    if needed > bytes.len() as u64 {
        return Err(DecodeError::BinaryOverrun {
            declared,
            needed,
            got: bytes.len(),
        });
    }

    debug!(triangles = declared, "decoding binary STL");

    let mut buffers = MeshBuffers::with_capacity(declared as usize);
    let mut meter = ProgressMeter::new();
    let cadence = (declared / 50).max(1);

    let mut offset = RECORDS_START;
    for i in 0..declared {
        let facet = Facet {
            normal: read_vector(bytes, offset),
            vertices: [
                read_vector(bytes, offset + 12),
                read_vector(bytes, offset + 24),
                read_vector(bytes, offset + 36),
            ],
        };
        buffers.push_facet(&facet);
        // The trailing 2 attribute bytes are skipped regardless of content.
        offset += RECORD_SIZE;

        if (i + 1) % cadence == 0 || i + 1 == declared {
            #[allow(clippy::cast_possible_truncation)]
            // Truncation: the ratio is at most 100.
            let percent = (u64::from(i + 1) * 100 / u64::from(declared)) as u8;
            if !meter.update(percent, sink) {
                return Err(DecodeError::Cancelled);
            }
        }
    }

    Ok(buffers)
}

/// Encode flat attribute buffers as a binary STL byte stream.
///
/// The inverse of the decoder, modulo the ignored header and attribute
/// bytes: decoding the result yields bit-identical buffers.
#[must_use]
pub fn encode_binary(buffers: &MeshBuffers) -> Vec<u8> {
    let triangles = buffers.triangle_count();
    let mut out = Vec::with_capacity(RECORDS_START + triangles * RECORD_SIZE);

    let mut header = [b' '; HEADER_SIZE];
    let text = b"Binary STL generated by stl-decode";
    header[..text.len()].copy_from_slice(text);
    out.extend_from_slice(&header);

    #[allow(clippy::cast_possible_truncation)]
    // Truncation: the on-disk count field is u32 by format definition.
    out.extend_from_slice(&(triangles as u32).to_le_bytes());

    for i in 0..triangles {
        let base = i * MeshBuffers::FLOATS_PER_TRIANGLE;
        // One normal per facet; the buffers repeat it per vertex.
        for f in &buffers.normals[base..base + 3] {
            out.extend_from_slice(&f.to_le_bytes());
        }
        for f in &buffers.vertices[base..base + 9] {
            out.extend_from_slice(&f.to_le_bytes());
        }
        out.extend_from_slice(&0u16.to_le_bytes());
    }

    out
}

/// Read 3 little-endian f32s starting at `offset`.
fn read_vector(bytes: &[u8], offset: usize) -> Vector3<f32> {
    Vector3::new(
        read_f32(bytes, offset),
        read_f32(bytes, offset + 4),
        read_f32(bytes, offset + 8),
    )
}

fn read_f32(bytes: &[u8], offset: usize) -> f32 {
    f32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}
