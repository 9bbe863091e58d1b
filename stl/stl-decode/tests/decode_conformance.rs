//! End-to-end decode conformance tests.
//!
//! These exercise the public API only: automatic format detection, both
//! decode paths, the buffer layout invariants, progress reporting, and the
//! failure modes.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]

use approx::assert_relative_eq;
use stl_decode::{
    decode, decode_with_progress, encode_ascii, encode_binary, DecodeError, Decoded, MeshBuffers,
    StlFormat,
};

/// Build a binary STL buffer from (normal, [v0, v1, v2]) facets.
fn binary_fixture(facets: &[([f32; 3], [[f32; 3]; 3])]) -> Vec<u8> {
    let mut bytes = vec![0u8; 80];
    bytes.extend_from_slice(&u32::try_from(facets.len()).unwrap().to_le_bytes());
    for (normal, vertices) in facets {
        for f in normal {
            bytes.extend_from_slice(&f.to_le_bytes());
        }
        for vertex in vertices {
            for f in vertex {
                bytes.extend_from_slice(&f.to_le_bytes());
            }
        }
        bytes.extend_from_slice(&0u16.to_le_bytes());
    }
    bytes
}

fn two_triangle_fixture() -> Vec<u8> {
    binary_fixture(&[
        (
            [0.0, 0.0, 1.0],
            [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        ),
        (
            [0.0, 0.0, 1.0],
            [[1.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        ),
    ])
}

fn assert_layout_invariants(decoded: &Decoded) {
    let buffers = &decoded.buffers;
    assert_eq!(buffers.vertices.len(), buffers.normals.len());
    assert_eq!(buffers.vertices.len() % MeshBuffers::FLOATS_PER_TRIANGLE, 0);
    assert_eq!(
        buffers.triangle_count(),
        decoded.triangle_count as usize
    );

    // The 3 normal sub-triples of each triangle are bit-identical.
    for i in 0..buffers.triangle_count() {
        let base = 9 * i;
        let first: [u32; 3] = [
            buffers.normals[base].to_bits(),
            buffers.normals[base + 1].to_bits(),
            buffers.normals[base + 2].to_bits(),
        ];
        for v in 1..3 {
            let triple = [
                buffers.normals[base + 3 * v].to_bits(),
                buffers.normals[base + 3 * v + 1].to_bits(),
                buffers.normals[base + 3 * v + 2].to_bits(),
            ];
            assert_eq!(triple, first);
        }
    }
}

#[test]
fn binary_two_triangle_scenario() {
    let decoded = decode(two_triangle_fixture()).unwrap();

    assert_eq!(decoded.format, StlFormat::Binary);
    assert_eq!(decoded.triangle_count, 2);
    assert_eq!(
        decoded.buffers.vertices,
        vec![
            0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, //
            1.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0,
        ]
    );
    assert_eq!(decoded.buffers.normals, vec![0.0, 0.0, 1.0].repeat(6));
    assert_layout_invariants(&decoded);
}

#[test]
fn ascii_single_facet_scenario() {
    let text = "solid t\nfacet normal 0 0 1\nouter loop\nvertex 0 0 0\nvertex 1 0 0\nvertex 0 1 0\nendloop\nendfacet\nendsolid t";
    let decoded = decode(text.as_bytes().to_vec()).unwrap();

    assert_eq!(decoded.format, StlFormat::Ascii);
    assert_eq!(decoded.triangle_count, 1);
    assert_eq!(
        decoded.buffers.vertices,
        vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]
    );
    assert_eq!(
        decoded.buffers.normals,
        vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]
    );
    assert_layout_invariants(&decoded);
}

#[test]
fn ascii_malformed_facet_degrades_not_fails() {
    let text = "solid t\n\
        facet normal 0 0 1\nouter loop\nvertex 0 0 0\nvertex 1 0 0\nvertex 0 1 0\nendloop\nendfacet\n\
        facet normal 0 0 1\nouter loop\nvertex 0 0 0\nvertex 1 0 0\nendloop\nendfacet\n\
        endsolid t";
    let decoded = decode(text.as_bytes().to_vec()).unwrap();

    assert_eq!(decoded.triangle_count, 1);
    assert_layout_invariants(&decoded);
}

#[test]
fn empty_input_is_invalid() {
    let err = decode(Vec::new()).unwrap_err();
    assert!(matches!(err, DecodeError::EmptyInput));
    assert_eq!(err.to_string(), "empty input: no bytes to decode");
}

#[test]
fn truncated_binary_is_fatal_not_partial() {
    let facet = (
        [0.0f32, 0.0, 1.0],
        [[0.0f32, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
    );
    let mut bytes = binary_fixture(&vec![facet; 5]);
    // Declare more triangles than the buffer carries.
    bytes[80..84].copy_from_slice(&1000u32.to_le_bytes());

    let err = decode(bytes).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::BinaryOverrun { declared: 1000, .. }
    ));
}

#[test]
fn binary_round_trip_is_bit_identical() {
    let original = decode(two_triangle_fixture()).unwrap();
    let reencoded = encode_binary(&original.buffers);
    let redecoded = decode(reencoded).unwrap();

    assert_eq!(redecoded.format, StlFormat::Binary);
    let bits = |floats: &[f32]| floats.iter().map(|f| f.to_bits()).collect::<Vec<_>>();
    assert_eq!(
        bits(&redecoded.buffers.vertices),
        bits(&original.buffers.vertices)
    );
    assert_eq!(
        bits(&redecoded.buffers.normals),
        bits(&original.buffers.normals)
    );
}

#[test]
fn ascii_round_trip_preserves_simple_values() {
    let text = "solid t\nfacet normal 0 0 1\nouter loop\nvertex 0 0 0\nvertex 1 0 0\nvertex 0 1 0\nendloop\nendfacet\nendsolid t";
    let original = decode(text.as_bytes().to_vec()).unwrap();
    let redecoded = decode(encode_ascii(&original.buffers).into_bytes()).unwrap();

    assert_eq!(redecoded.format, StlFormat::Ascii);
    assert_eq!(redecoded.buffers, original.buffers);
}

#[test]
fn ascii_round_trip_tolerates_formatting_precision() {
    // The ASCII encoder writes 6 significant digits, so values that are
    // not exactly representable at that precision come back close, not
    // bit-identical.
    let text = "solid t\n\
        facet normal 0.26726124 0.53452247 0.80178368\n\
        outer loop\n\
        vertex 0.1 0.2 0.3\n\
        vertex 1.7 0.0001 -2.3\n\
        vertex -0.333333 0.666667 1e-3\n\
        endloop\nendfacet\nendsolid t";
    let original = decode(text.as_bytes().to_vec()).unwrap();
    let redecoded = decode(encode_ascii(&original.buffers).into_bytes()).unwrap();

    assert_eq!(redecoded.triangle_count, 1);
    for (got, want) in redecoded.buffers.vertices.iter().zip(&original.buffers.vertices) {
        assert_relative_eq!(*got, *want, max_relative = 1e-5);
    }
    for (got, want) in redecoded.buffers.normals.iter().zip(&original.buffers.normals) {
        assert_relative_eq!(*got, *want, max_relative = 1e-5);
    }
}

#[test]
fn decoding_is_idempotent() {
    let bytes = two_triangle_fixture();
    let first = decode(bytes.clone()).unwrap();
    let second = decode(bytes).unwrap();

    assert_eq!(first, second);
}

#[test]
fn binary_progress_is_monotone_and_bounded() {
    let facet = (
        [0.0f32, 0.0, 1.0],
        [[0.0f32, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
    );
    let bytes = binary_fixture(&vec![facet; 500]);

    let mut percents = Vec::new();
    let mut sink = |p: u8| {
        percents.push(p);
        true
    };
    let decoded = decode_with_progress(bytes, &mut sink).unwrap();

    assert_eq!(decoded.triangle_count, 500);
    assert!(!percents.is_empty());
    assert!(percents.windows(2).all(|w| w[0] < w[1]));
    assert!(percents.iter().all(|&p| p <= 100));
    assert_eq!(*percents.last().unwrap(), 100);
}

#[test]
fn ascii_progress_is_monotone_and_below_100() {
    // Enough facets to cross the 3000-facet reporting cadence twice.
    let facet = "facet normal 0 0 1\nouter loop\nvertex 0 0 0\nvertex 1 0 0\nvertex 0 1 0\nendloop\nendfacet\n";
    let mut text = String::from("solid big\n");
    for _ in 0..6500 {
        text.push_str(facet);
    }
    text.push_str("endsolid big\n");

    let mut percents = Vec::new();
    let mut sink = |p: u8| {
        percents.push(p);
        true
    };
    let decoded = decode_with_progress(text.into_bytes(), &mut sink).unwrap();

    assert_eq!(decoded.triangle_count, 6500);
    assert!(!percents.is_empty());
    assert!(percents.windows(2).all(|w| w[0] < w[1]));
    assert!(percents.iter().all(|&p| p < 100));
}

#[test]
fn cancellation_aborts_the_decode() {
    let facet = (
        [0.0f32, 0.0, 1.0],
        [[0.0f32, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
    );
    let bytes = binary_fixture(&vec![facet; 500]);

    let mut sink = |_: u8| false;
    let err = decode_with_progress(bytes, &mut sink).unwrap_err();
    assert!(matches!(err, DecodeError::Cancelled));
}

#[test]
fn input_buffer_is_consumed_by_move() {
    // Compile-time property more than a runtime one: `decode` takes the
    // buffer by value, so the bytes cannot be touched after submission.
    let bytes = two_triangle_fixture();
    let decoded = decode(bytes).unwrap();
    assert_eq!(decoded.triangle_count, 2);
}
