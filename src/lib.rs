#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod corners;
pub mod diagnostics;
pub mod error;
pub mod geometry;
pub mod homography;
pub mod image;
pub mod pipeline;
pub mod scanner;
pub mod types;
pub mod warp;

// Collaborator modules around the rectification core. Public, but their
// surfaces are considered unstable internals.
pub mod boundary;
pub mod candidates;
pub mod config;
pub mod enhance;
pub mod preprocess;

// --- High-level re-exports -------------------------------------------------

// Main entry points: rectifier + scanner and their results.
pub use crate::error::RectifyError;
pub use crate::pipeline::{Rectifier, RectifyOptions};
pub use crate::scanner::{DocumentScanner, ScanOptions, ScanResult};
pub use crate::types::{RectificationResult, RectifyOutcome};

// Geometry and transform types that appear in the public API.
pub use crate::geometry::{OrderedQuad, Polygon, Quad};
pub use crate::homography::Homography;
pub use crate::warp::Interpolation;

// Stage-by-stage diagnostics returned by the pipeline.
pub use crate::diagnostics::{RectifyReport, RectifyTrace};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use doc_rectify::prelude::*;
///
/// # fn main() {
/// let image = Raster::new(640, 480, 1);
/// let rectifier = Rectifier::new(RectifyOptions::default());
/// let result = rectifier.rectify(&image, &[]).unwrap();
/// println!(
///     "outcome={:?} latency_ms={:.3}",
///     result.outcome, result.latency_ms
/// );
/// # }
/// ```
pub mod prelude {
    pub use crate::image::Raster;
    pub use crate::{
        DocumentScanner, Rectifier, RectificationResult, RectifyOptions, RectifyOutcome,
        ScanOptions,
    };
}
