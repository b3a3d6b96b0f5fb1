//! Parameters controlling candidate selection and resampling.
//!
//! Defaults follow the usual document-scanning heuristics: a document is
//! expected to cover a sizeable part of the frame, and a 2%-of-perimeter
//! simplification tolerance collapses noise-induced vertices while keeping
//! true corners.

use crate::warp::Interpolation;
use serde::Deserialize;

/// Rectifier-wide parameters.
#[derive(Clone, Debug, Deserialize)]
pub struct RectifyOptions {
    /// Minimum candidate area as a fraction of the image area.
    pub min_area_fraction: f64,
    /// Douglas–Peucker tolerance as a fraction of the candidate's perimeter.
    pub approx_epsilon_fraction: f64,
    /// How many area-ranked boundaries to inspect before giving up.
    pub max_candidates: usize,
    /// Sampling mode used by the perspective resampler.
    pub interpolation: Interpolation,
}

impl Default for RectifyOptions {
    fn default() -> Self {
        Self {
            min_area_fraction: 0.10,
            approx_epsilon_fraction: 0.02,
            max_candidates: 10,
            interpolation: Interpolation::Bilinear,
        }
    }
}
