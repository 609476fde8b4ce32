//! Closed-loop checks for extracted edge sets.

use anyhow::{bail, Result};
use glam::DVec3;
use std::collections::HashMap;

/// Bit-exact vertex key with `-0.0` folded into `+0.0`.
pub type VertexKey = [u64; 3];

/// Key for `p`.
pub fn vertex_key(p: DVec3) -> VertexKey {
    let bits = |v: f64| (v + 0.0).to_bits();
    [bits(p.x), bits(p.y), bits(p.z)]
}

/// How many segment endpoints touch each vertex. Zero-length segments are
/// skipped.
pub fn endpoint_degrees<I>(segments: I) -> HashMap<VertexKey, usize>
where
    I: IntoIterator<Item = (DVec3, DVec3)>,
{
    let mut degrees = HashMap::new();
    for (a, b) in segments {
        if vertex_key(a) == vertex_key(b) {
            continue;
        }
        *degrees.entry(vertex_key(a)).or_insert(0) += 1;
        *degrees.entry(vertex_key(b)).or_insert(0) += 1;
    }
    degrees
}

/// Fails unless the segments form closed loops (every vertex has even
/// degree) and at least one segment is present.
pub fn assert_closed_loops<I>(segments: I) -> Result<()>
where
    I: IntoIterator<Item = (DVec3, DVec3)>,
{
    let degrees = endpoint_degrees(segments);
    if degrees.is_empty() {
        bail!("no edges to check");
    }
    let odd: Vec<_> = degrees
        .iter()
        .filter(|(_, &degree)| degree % 2 == 1)
        .map(|(key, degree)| {
            let [x, y, z] = key.map(f64::from_bits);
            format!("({x}, {y}, {z}) x{degree}")
        })
        .collect();
    if !odd.is_empty() {
        bail!("{} open endpoints: {}", odd.len(), odd.join(", "));
    }
    Ok(())
}
