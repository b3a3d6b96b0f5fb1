use thiserror::Error;

/// Errors produced by the rectification core.
///
/// Only [`RectifyError::InvalidInput`] ever escapes the pipeline; detection
/// failures (`NoQuadrilateralFound`, `DegenerateHomography`) are recovered
/// internally by falling back to the full-image quadrilateral.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RectifyError {
    /// No 4-vertex boundary candidate met the area threshold.
    #[error("no quadrilateral candidate met the area threshold")]
    NoQuadrilateralFound,

    /// Source corners are collinear or the projective system is near-singular.
    #[error("degenerate geometry: {0}")]
    DegenerateHomography(&'static str),

    /// Caller contract violation (zero-sized image, wrong corner count).
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
