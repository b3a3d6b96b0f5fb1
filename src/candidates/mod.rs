//! Document-boundary candidate selection.
//!
//! Boundary polygons arrive from contour extraction in arbitrary order and
//! with noisy, dense vertices. Selection considers them in descending order
//! of enclosed area, capped to the strongest few, simplifies each one with a
//! perimeter-proportional Douglas–Peucker pass, and accepts the first result
//! that is exactly a quadrilateral covering a meaningful fraction of the
//! image.

mod simplify;

pub use simplify::simplify_closed;

use crate::error::RectifyError;
use crate::geometry::{Polygon, Quad};
use crate::pipeline::RectifyOptions;
use log::debug;
use serde::Serialize;

/// Per-candidate record of what the selection pass saw.
#[derive(Clone, Debug, Serialize)]
pub struct CandidateDescriptor {
    /// Index into the caller's boundary list.
    pub index: usize,
    pub vertices: usize,
    pub simplified_vertices: usize,
    /// Simplified area as a fraction of the image area.
    pub area_fraction: f64,
    pub accepted: bool,
}

/// Diagnostics emitted alongside the selection result.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SearchDetails {
    /// Boundaries inspected after the area ranking and cap.
    pub considered: usize,
    /// Boundaries skipped for having fewer than 3 vertices.
    pub skipped_degenerate: usize,
    pub candidates: Vec<CandidateDescriptor>,
}

/// Select the most plausible document quadrilateral from `boundaries`.
pub fn select_document_quad(
    boundaries: &[Polygon],
    width: usize,
    height: usize,
    options: &RectifyOptions,
) -> Result<Quad, RectifyError> {
    select_document_quad_with_details(boundaries, width, height, options).0
}

/// Selection variant reporting per-candidate diagnostics.
pub fn select_document_quad_with_details(
    boundaries: &[Polygon],
    width: usize,
    height: usize,
    options: &RectifyOptions,
) -> (Result<Quad, RectifyError>, SearchDetails) {
    let image_area = (width * height) as f64;
    let min_area = options.min_area_fraction * image_area;
    let mut details = SearchDetails::default();

    let mut ranked: Vec<(usize, f64)> = boundaries
        .iter()
        .enumerate()
        .filter_map(|(i, poly)| {
            if poly.len() < 3 {
                details.skipped_degenerate += 1;
                return None;
            }
            Some((i, poly.area()))
        })
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(options.max_candidates);
    details.considered = ranked.len();

    for (index, _) in ranked {
        let poly = &boundaries[index];
        let epsilon = options.approx_epsilon_fraction * poly.perimeter();
        let simplified = simplify_closed(&poly.points, epsilon);
        let approx = Polygon::new(simplified);
        let area_fraction = if image_area > 0.0 {
            approx.area() / image_area
        } else {
            0.0
        };
        let accepted = approx.len() == 4 && approx.area() > min_area;
        details.candidates.push(CandidateDescriptor {
            index,
            vertices: poly.len(),
            simplified_vertices: approx.len(),
            area_fraction,
            accepted,
        });

        if accepted {
            debug!(
                "select_document_quad: boundary {} accepted ({} -> 4 vertices, {:.1}% of image)",
                index,
                poly.len(),
                area_fraction * 100.0
            );
            let p = approx.points;
            return (
                Ok(Quad::new([p[0], p[1], p[2], p[3]])),
                details,
            );
        }
    }

    debug!(
        "select_document_quad: no candidate accepted out of {} considered",
        details.considered
    );
    (Err(RectifyError::NoQuadrilateralFound), details)
}
