use crate::geometry::OrderedQuad;
use crate::homography::Homography;
use crate::image::Raster;
use serde::Serialize;

/// Terminal state of a rectification run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RectifyOutcome {
    /// A document quadrilateral was found and resampled.
    Rectified,
    /// No usable quadrilateral; the full image stands in for the document.
    FallbackFullImage,
}

/// Result of one rectification request.
#[derive(Clone, Debug)]
pub struct RectificationResult {
    /// Rectified raster, or an unmodified copy of the input on fallback.
    pub output: Raster,
    /// Source→destination transform used (identity on fallback).
    pub homography: Homography,
    /// Ordered source corners the transform was built from.
    pub corners: OrderedQuad,
    pub outcome: RectifyOutcome,
    pub latency_ms: f64,
}
