//! Rectification pipeline driving the stages end-to-end.
//!
//! The [`Rectifier`] exposes a simple API: feed a raster plus the closed
//! boundary polygons extracted from it and get a rectified raster with the
//! transform that produced it. Internally it walks a fixed stage order —
//! candidate search, corner ordering, size estimation, homography solve,
//! perspective resampling — where each stage consumes the immutable output of
//! the previous one.
//!
//! Ordinary detection failures (no quadrilateral candidate, degenerate
//! corner geometry) never surface as errors: the pipeline degrades to the
//! full-image quadrilateral with an identity transform, so every run ends in
//! either `Rectified` or `FallbackFullImage`. Only caller contract
//! violations (an empty raster) propagate.
//!
//! Typical usage:
//! ```no_run
//! use doc_rectify::{Rectifier, RectifyOptions};
//! use doc_rectify::image::Raster;
//! use doc_rectify::geometry::Polygon;
//!
//! # fn example(image: Raster, boundaries: Vec<Polygon>) {
//! let rectifier = Rectifier::new(RectifyOptions::default());
//! let result = rectifier.rectify(&image, &boundaries).unwrap();
//! println!("outcome={:?} {}x{}", result.outcome, result.output.w, result.output.h);
//! # }
//! ```

mod options;

pub use options::RectifyOptions;

use crate::candidates::select_document_quad_with_details;
use crate::corners::{order_corners, output_size};
use crate::diagnostics::{
    CornerStage, HomographyStage, InputDescriptor, RectifyReport, RectifyTrace, SearchStage,
    TimingBreakdown, WarpStage,
};
use crate::error::RectifyError;
use crate::geometry::{OrderedQuad, Polygon};
use crate::homography::Homography;
use crate::image::Raster;
use crate::types::{RectificationResult, RectifyOutcome};
use crate::warp::warp_perspective;
use log::debug;
use std::time::Instant;

/// Pipeline orchestrator holding the selection and resampling parameters.
pub struct Rectifier {
    options: RectifyOptions,
}

impl Rectifier {
    /// Create a rectifier with the supplied parameters.
    pub fn new(options: RectifyOptions) -> Self {
        Self { options }
    }

    #[inline]
    pub fn options(&self) -> &RectifyOptions {
        &self.options
    }

    /// Rectify `image` using the boundary polygons extracted from it,
    /// returning a compact result.
    pub fn rectify(
        &self,
        image: &Raster,
        boundaries: &[Polygon],
    ) -> Result<RectificationResult, RectifyError> {
        self.rectify_with_report(image, boundaries)
            .map(|report| report.result)
    }

    /// Rectify and return both the result and a stage-by-stage trace.
    pub fn rectify_with_report(
        &self,
        image: &Raster,
        boundaries: &[Polygon],
    ) -> Result<RectifyReport, RectifyError> {
        if image.is_empty() {
            return Err(RectifyError::InvalidInput(
                "cannot rectify an empty raster".into(),
            ));
        }

        debug!(
            "Rectifier::rectify start w={} h={} boundaries={}",
            image.w,
            image.h,
            boundaries.len()
        );
        let total_start = Instant::now();

        let search_start = Instant::now();
        let (selection, details) =
            select_document_quad_with_details(boundaries, image.w, image.h, &self.options);
        let search_ms = search_start.elapsed().as_secs_f64() * 1000.0;
        let search_stage = SearchStage {
            elapsed_ms: search_ms,
            details,
        };

        let mut corner_stage = None;
        let mut homography_stage = None;
        let mut warp_stage = None;
        let mut rectified: Option<(Raster, Homography, OrderedQuad)> = None;

        match selection {
            Ok(quad) => {
                let ordered = order_corners(&quad.points)?;
                let (width, height) = output_size(&ordered);
                corner_stage = Some(CornerStage {
                    corners: ordered.points(),
                    output_width: width,
                    output_height: height,
                });

                let solve_start = Instant::now();
                match Homography::from_quad_to_rect(&ordered, width, height) {
                    Ok(transform) => {
                        homography_stage = Some(HomographyStage {
                            elapsed_ms: solve_start.elapsed().as_secs_f64() * 1000.0,
                            hmtx: *transform.matrix(),
                            determinant: transform.determinant(),
                        });

                        let warp_start = Instant::now();
                        let output = warp_perspective(
                            image,
                            &transform,
                            width,
                            height,
                            self.options.interpolation,
                        )?;
                        warp_stage = Some(WarpStage {
                            elapsed_ms: warp_start.elapsed().as_secs_f64() * 1000.0,
                            width,
                            height,
                            interpolation: self.options.interpolation,
                        });
                        rectified = Some((output, transform, ordered));
                    }
                    Err(RectifyError::DegenerateHomography(reason)) => {
                        debug!("Rectifier::rectify degenerate homography ({reason}) -> fallback");
                    }
                    Err(other) => return Err(other),
                }
            }
            Err(RectifyError::NoQuadrilateralFound) => {
                debug!("Rectifier::rectify no document quadrilateral -> fallback");
            }
            Err(other) => return Err(other),
        }

        let (output, homography, corners, outcome) = match rectified {
            Some((output, transform, ordered)) => {
                (output, transform, ordered, RectifyOutcome::Rectified)
            }
            None => (
                image.clone(),
                Homography::identity(),
                OrderedQuad::full_image(image.w, image.h),
                RectifyOutcome::FallbackFullImage,
            ),
        };

        let latency = total_start.elapsed().as_secs_f64() * 1000.0;
        debug!(
            "Rectifier::rectify done outcome={:?} {}x{} latency_ms={:.3}",
            outcome, output.w, output.h, latency
        );

        let mut timings = TimingBreakdown::with_total(latency);
        timings.push("search", search_stage.elapsed_ms);
        if let Some(stage) = &homography_stage {
            timings.push("homography", stage.elapsed_ms);
        }
        if let Some(stage) = &warp_stage {
            timings.push("warp", stage.elapsed_ms);
        }

        let trace = RectifyTrace {
            input: InputDescriptor {
                width: image.w,
                height: image.h,
                channels: image.channels,
                boundaries: boundaries.len(),
            },
            outcome,
            timings,
            search: Some(search_stage),
            corners: corner_stage,
            homography: homography_stage,
            warp: warp_stage,
        };

        Ok(RectifyReport {
            result: RectificationResult {
                output,
                homography,
                corners,
                outcome,
                latency_ms: latency,
            },
            trace,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_boundary(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon {
        Polygon::new(vec![[x0, y0], [x1, y0], [x1, y1], [x0, y1]])
    }

    #[test]
    fn empty_image_is_a_contract_violation() {
        let rectifier = Rectifier::new(RectifyOptions::default());
        let err = rectifier.rectify(&Raster::new(0, 0, 1), &[]).unwrap_err();
        assert!(matches!(err, RectifyError::InvalidInput(_)));
    }

    #[test]
    fn empty_boundary_list_falls_back_to_the_full_image() {
        let mut image = Raster::new(64, 48, 1);
        image.data.fill(180);
        let rectifier = Rectifier::new(RectifyOptions::default());
        let result = rectifier.rectify(&image, &[]).unwrap();

        assert_eq!(result.outcome, RectifyOutcome::FallbackFullImage);
        assert_eq!(result.output, image);
        assert_eq!(result.homography, Homography::identity());
        assert_eq!(result.corners, OrderedQuad::full_image(64, 48));
    }

    #[test]
    fn axis_aligned_document_rectifies_to_its_own_size() {
        let mut image = Raster::new(200, 200, 1);
        for y in 40..=160 {
            for x in 30..=170 {
                image.set(x, y, 0, 255);
            }
        }
        let boundaries = vec![rect_boundary(30.0, 40.0, 170.0, 160.0)];
        let rectifier = Rectifier::new(RectifyOptions::default());
        let result = rectifier.rectify(&image, &boundaries).unwrap();

        assert_eq!(result.outcome, RectifyOutcome::Rectified);
        assert_eq!((result.output.w, result.output.h), (140, 120));
        // The crop is entirely inside the white region.
        assert!(result.output.data.iter().all(|&v| v == 255));
    }

    #[test]
    fn degenerate_candidate_geometry_falls_back() {
        // A "quadrilateral" with all vertices on one line; a huge epsilon is
        // irrelevant because the shape has near-zero area and would be
        // rejected, leaving no candidate at all.
        let image = Raster::new(100, 100, 1);
        let line = Polygon::new(vec![
            [0.0, 0.0],
            [99.0, 0.0],
            [99.0, 1.0],
            [0.0, 1.0],
        ]);
        let rectifier = Rectifier::new(RectifyOptions::default());
        let result = rectifier.rectify(&image, &[line]).unwrap();
        assert_eq!(result.outcome, RectifyOutcome::FallbackFullImage);
    }

    #[test]
    fn diamond_orientation_defeats_ordering_and_falls_back() {
        // A square rotated 45° ties on both ordering keys, collapsing two
        // corner roles onto one point; the singular solve degrades to the
        // fallback instead of producing a garbage transform.
        let image = Raster::new(100, 100, 1);
        let diamond = Polygon::new(vec![
            [50.0, 0.0],
            [100.0, 50.0],
            [50.0, 100.0],
            [0.0, 50.0],
        ]);
        let rectifier = Rectifier::new(RectifyOptions::default());
        let result = rectifier.rectify(&image, &[diamond]).unwrap();
        assert_eq!(result.outcome, RectifyOutcome::FallbackFullImage);
        assert_eq!(result.homography, Homography::identity());
    }

    #[test]
    fn report_records_the_executed_stages() {
        let mut image = Raster::new(100, 100, 1);
        image.data.fill(10);
        let boundaries = vec![rect_boundary(10.0, 10.0, 90.0, 90.0)];
        let rectifier = Rectifier::new(RectifyOptions::default());
        let report = rectifier.rectify_with_report(&image, &boundaries).unwrap();

        assert_eq!(report.trace.outcome, RectifyOutcome::Rectified);
        assert!(report.trace.search.is_some());
        assert!(report.trace.corners.is_some());
        assert!(report.trace.homography.is_some());
        assert!(report.trace.warp.is_some());
        assert!(report.trace.timings.total_ms >= 0.0);

        let fallback = rectifier.rectify_with_report(&image, &[]).unwrap();
        assert_eq!(fallback.trace.outcome, RectifyOutcome::FallbackFullImage);
        assert!(fallback.trace.corners.is_none());
        assert!(fallback.trace.warp.is_none());
    }
}
