//! Canonical decode output: flat per-vertex attribute buffers.

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::Serialize;

/// One STL triangle record: a facet normal plus three vertices.
///
/// A facet has no identity beyond its position in decode order. The normal
/// is carried exactly as stored in the file; it is neither recomputed from
/// the vertices nor normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Facet {
    /// Facet normal as stored in the file.
    pub normal: Vector3<f32>,
    /// The three vertices in file order.
    pub vertices: [Vector3<f32>; 3],
}

/// Flat per-vertex position and normal streams for a triangle soup.
///
/// Both buffers hold `9 * triangle_count` floats. Triangle `i` owns floats
/// `[9i, 9i + 9)` of `vertices` in `(x, y, z)` order per vertex, and the
/// matching slice of `normals` repeats the facet normal three times, once
/// per vertex. The duplication trades memory for a uniform per-vertex
/// attribute stream that renders without an index buffer.
///
/// # Example
///
/// ```
/// use nalgebra::Vector3;
/// use stl_decode::{Facet, MeshBuffers};
///
/// let mut buffers = MeshBuffers::new();
/// buffers.push_facet(&Facet {
///     normal: Vector3::new(0.0, 0.0, 1.0),
///     vertices: [
///         Vector3::new(0.0, 0.0, 0.0),
///         Vector3::new(1.0, 0.0, 0.0),
///         Vector3::new(0.0, 1.0, 0.0),
///     ],
/// });
///
/// assert_eq!(buffers.triangle_count(), 1);
/// assert_eq!(buffers.vertices.len(), 9);
/// assert_eq!(buffers.normals, vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct MeshBuffers {
    /// Vertex positions, `[x0, y0, z0, x1, y1, z1, ...]`, 3 vertices per
    /// triangle.
    pub vertices: Vec<f32>,

    /// Per-vertex normals, same length and layout as `vertices`; the 3
    /// normals of a triangle are identical.
    pub normals: Vec<f32>,
}

impl MeshBuffers {
    /// Floats contributed by one triangle to each buffer.
    pub const FLOATS_PER_TRIANGLE: usize = 9;

    /// Create empty buffers.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            normals: Vec::new(),
        }
    }

    /// Create buffers with capacity for `triangle_count` triangles.
    ///
    /// Used by the binary decoder, which knows the exact count up front
    /// and fills the buffers in a single pass with no resizing.
    #[inline]
    #[must_use]
    pub fn with_capacity(triangle_count: usize) -> Self {
        let floats = triangle_count * Self::FLOATS_PER_TRIANGLE;
        Self {
            vertices: Vec::with_capacity(floats),
            normals: Vec::with_capacity(floats),
        }
    }

    /// Append one facet: 9 position floats and the normal repeated 3x.
    pub fn push_facet(&mut self, facet: &Facet) {
        for vertex in &facet.vertices {
            self.vertices.extend_from_slice(&[vertex.x, vertex.y, vertex.z]);
            self.normals
                .extend_from_slice(&[facet.normal.x, facet.normal.y, facet.normal.z]);
        }
    }

    /// Number of triangles held.
    #[inline]
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / Self::FLOATS_PER_TRIANGLE
    }

    /// `true` when no triangles are held.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}
