//! ASCII STL decoding and encoding.
//!
//! Grammar (keywords case-insensitive, arbitrary whitespace between
//! tokens, floats in decimal or exponential form):
//!
//! ```text
//! solid name
//!   facet normal ni nj nk
//!     outer loop
//!       vertex v1x v1y v1z
//!       vertex v2x v2y v2z
//!       vertex v3x v3y v3z
//!     endloop
//!   endfacet
//!   ...
//! endsolid name
//! ```
//!
//! The scanner is deliberately tolerant: it extracts `facet ... endfacet`
//! regions from free-form text and skips any region that does not yield
//! exactly one normal and exactly three vertices. A malformed facet
//! degrades the result by one triangle; it never aborts the decode.

use std::fmt::Write as _;

use nalgebra::Vector3;
use tracing::{debug, warn};

use crate::buffers::{Facet, MeshBuffers};
use crate::error::{DecodeError, DecodeResult};
use crate::progress::{ProgressMeter, ProgressSink};

/// Facet-count cadence for progress reports.
const PROGRESS_EVERY_FACETS: u32 = 3000;

/// Decode ASCII STL text (lossily decoded from the input bytes) into flat
/// attribute buffers.
///
/// The triangle count is unknown until the scan completes, so the buffers
/// grow as facets are accepted and progress is estimated from the byte
/// offset scanned, capped below 100 until the decode finishes.
pub(crate) fn decode_ascii(bytes: &[u8], sink: &mut dyn ProgressSink) -> DecodeResult<MeshBuffers> {
    let text = String::from_utf8_lossy(bytes);
    let total_bytes = text.len().max(1);

    let mut buffers = MeshBuffers::new();
    let mut parser = FacetParser::default();
    let mut meter = ProgressMeter::new();
    let mut accepted: u32 = 0;
    let mut skipped: u32 = 0;
    let mut offset = 0usize;

    for line in text.lines() {
        // `lines` strips the terminator; +1 keeps the estimate honest
        // without tracking `\r\n` exactly.
        offset += line.len() + 1;

        for token in line.split_whitespace() {
            match parser.feed(token) {
                None => {}
                Some(FacetOutcome::Accepted(facet)) => {
                    buffers.push_facet(&facet);
                    accepted += 1;
                    if accepted % PROGRESS_EVERY_FACETS == 0 {
                        let percent = estimate_percent(offset, total_bytes);
                        if !meter.update(percent, sink) {
                            return Err(DecodeError::Cancelled);
                        }
                    }
                }
                Some(FacetOutcome::Skipped) => skipped += 1,
            }
        }
    }

    if skipped > 0 {
        warn!(skipped, "skipped malformed ASCII facets");
    }
    debug!(triangles = accepted, "decoded ASCII STL");

    Ok(buffers)
}

/// Byte-offset based completion estimate, always below 100: the terminal
/// event owns the final value.
#[allow(clippy::cast_possible_truncation)]
// Truncation: the ratio is at most 99.
fn estimate_percent(offset: usize, total: usize) -> u8 {
    ((offset.min(total) * 100 / total) as u8).min(99)
}

/// What a completed `facet ... endfacet` region produced.
enum FacetOutcome {
    /// Exactly one normal and exactly three vertices.
    Accepted(Facet),
    /// Anything else; the region is dropped and scanning continues.
    Skipped,
}

/// Where the floats currently being collected belong.
#[derive(Clone, Copy)]
enum Target {
    Normal,
    Vertex,
}

/// Incremental token-level parser for `facet ... endfacet` regions.
///
/// Fed one whitespace-delimited token at a time; line structure is
/// irrelevant. Tokens outside a region (`solid`, `endsolid`, solid names)
/// are ignored.
#[derive(Default)]
struct FacetParser {
    in_facet: bool,
    malformed: bool,
    normal: Option<Vector3<f32>>,
    vertices: Vec<Vector3<f32>>,
    collecting: Option<(Target, [f32; 3], usize)>,
}

impl FacetParser {
    /// Consume one token. Returns an outcome when a region closes.
    fn feed(&mut self, token: &str) -> Option<FacetOutcome> {
        if token.eq_ignore_ascii_case("facet") {
            // A `facet` inside an open region means the previous region
            // never closed; drop it and start fresh.
            let unclosed = self.in_facet.then_some(FacetOutcome::Skipped);
            self.reset();
            self.in_facet = true;
            return unclosed;
        }

        if token.eq_ignore_ascii_case("endfacet") {
            if !self.in_facet {
                return None;
            }
            let outcome = self.close();
            self.reset();
            return Some(outcome);
        }

        if !self.in_facet {
            return None;
        }

        if token.eq_ignore_ascii_case("normal") {
            self.collecting = Some((Target::Normal, [0.0; 3], 0));
            return None;
        }
        if token.eq_ignore_ascii_case("vertex") {
            self.collecting = Some((Target::Vertex, [0.0; 3], 0));
            return None;
        }

        if let Some((target, mut acc, filled)) = self.collecting.take() {
            match token.parse::<f32>() {
                Ok(value) => {
                    acc[filled] = value;
                    if filled + 1 == 3 {
                        self.complete_triple(target, acc);
                    } else {
                        self.collecting = Some((target, acc, filled + 1));
                    }
                }
                // A non-numeric token where a float was expected: the
                // triple is incomplete, so the region cannot be valid.
                Err(_) => self.malformed = true,
            }
        }
        // Structural keywords (`outer`, `loop`, `endloop`) and stray
        // tokens are ignored.
        None
    }

    fn complete_triple(&mut self, target: Target, acc: [f32; 3]) {
        let triple = Vector3::new(acc[0], acc[1], acc[2]);
        match target {
            Target::Normal => {
                if self.normal.replace(triple).is_some() {
                    // Two normals in one region.
                    self.malformed = true;
                }
            }
            Target::Vertex => self.vertices.push(triple),
        }
    }

    fn close(&mut self) -> FacetOutcome {
        if self.malformed || self.collecting.is_some() {
            return FacetOutcome::Skipped;
        }
        match (self.normal, self.vertices.as_slice()) {
            (Some(normal), &[v0, v1, v2]) => FacetOutcome::Accepted(Facet {
                normal,
                vertices: [v0, v1, v2],
            }),
            _ => FacetOutcome::Skipped,
        }
    }

    fn reset(&mut self) {
        self.in_facet = false;
        self.malformed = false;
        self.normal = None;
        self.vertices.clear();
        self.collecting = None;
    }
}

/// Encode flat attribute buffers in the ASCII STL keyword grammar.
///
/// The stored facet normal (the first of the three identical per-vertex
/// normals) is written back as-is.
#[must_use]
pub fn encode_ascii(buffers: &MeshBuffers) -> String {
    let mut out = String::from("solid mesh\n");

    for i in 0..buffers.triangle_count() {
        let base = i * MeshBuffers::FLOATS_PER_TRIANGLE;
        let n = &buffers.normals[base..base + 3];
        let _ = writeln!(out, "  facet normal {:.6e} {:.6e} {:.6e}", n[0], n[1], n[2]);
        out.push_str("    outer loop\n");
        for v in 0..3 {
            let p = &buffers.vertices[base + 3 * v..base + 3 * v + 3];
            let _ = writeln!(out, "      vertex {:.6e} {:.6e} {:.6e}", p[0], p[1], p[2]);
        }
        out.push_str("    endloop\n");
        out.push_str("  endfacet\n");
    }

    out.push_str("endsolid mesh\n");
    out
}
