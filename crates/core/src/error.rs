use thiserror::Error;

use crate::MeshError;

/// Failures the hit tester recovers from locally.
///
/// None of these escape a pointer query: extraction degrades to an empty edge
/// set and hit tests to "no hit". They exist so the degradation can be logged
/// and asserted on.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HitError {
    /// Camera or 2D-ancestor transform missing or not invertible.
    #[error("transform is unavailable or not invertible")]
    InvalidTransform,
    /// Zero-area triangle or zero-length edge.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(&'static str),
    /// Content bounds with no area; texture/visual mapping is undefined.
    #[error("degenerate content bounds {width}x{height}")]
    DegenerateRectangle {
        /// Width of the rejected rectangle.
        width: f64,
        /// Height of the rejected rectangle.
        height: f64,
    },
    /// Mesh data the extractor cannot use.
    #[error(transparent)]
    Mesh(#[from] MeshError),
}
