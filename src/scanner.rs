//! End-to-end document scanning: conditioning, boundary extraction,
//! rectification and output clean-up in one call.
//!
//! The scanner mirrors the classic flow: downscale and blur the input,
//! extract an edge map, dilate it to close gaps, trace closed boundaries,
//! rectify against them, then optionally binarize or sharpen the rectified
//! page. Rectification always succeeds (possibly via the full-image
//! fallback); only an empty input raster is an error.

use crate::boundary::{dilate, sobel_edge_map, trace_boundaries};
use crate::diagnostics::RectifyTrace;
use crate::enhance::{adaptive_threshold, sharpen};
use crate::error::RectifyError;
use crate::image::Raster;
use crate::pipeline::{Rectifier, RectifyOptions};
use crate::preprocess::{gaussian_blur, resize_max_dimension, to_grayscale};
use crate::types::RectificationResult;
use log::debug;
use serde::Deserialize;

/// Output clean-up applied to the rectified page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Enhancement {
    /// Adaptive mean thresholding for a clean black-on-white scan.
    #[default]
    Adaptive,
    /// 3×3 sharpening, keeping grayscale content.
    Sharpen,
    /// Leave the rectified raster untouched.
    None,
}

/// Scanner-wide parameters.
#[derive(Clone, Debug, Deserialize)]
pub struct ScanOptions {
    /// Inputs larger than this on their longest side are downscaled first.
    pub max_dimension: usize,
    /// Sobel gradient-magnitude threshold for the edge map.
    pub edge_threshold: f32,
    /// 3×3 dilation passes closing gaps in the edge map.
    pub dilate_iterations: usize,
    pub enhancement: Enhancement,
    pub rectify: RectifyOptions,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_dimension: 1000,
            edge_threshold: 80.0,
            dilate_iterations: 1,
            enhancement: Enhancement::Adaptive,
            rectify: RectifyOptions::default(),
        }
    }
}

/// Adaptive-threshold window size used for the scan look.
const ADAPTIVE_WINDOW: usize = 11;
/// Offset subtracted from the local mean before comparing.
const ADAPTIVE_OFFSET: f64 = 2.0;

/// Result of a full scan: the rectification plus the optional clean-up.
#[derive(Clone, Debug)]
pub struct ScanResult {
    pub rectification: RectificationResult,
    /// Enhanced page, absent when [`Enhancement::None`] is configured.
    pub enhanced: Option<Raster>,
}

/// One-call document scanner wiring the collaborator modules around the
/// rectification pipeline.
pub struct DocumentScanner {
    options: ScanOptions,
    rectifier: Rectifier,
}

impl DocumentScanner {
    pub fn new(options: ScanOptions) -> Self {
        let rectifier = Rectifier::new(options.rectify.clone());
        Self { options, rectifier }
    }

    /// Scan `image`, returning the rectified page and optional enhancement.
    pub fn scan(&self, image: &Raster) -> Result<ScanResult, RectifyError> {
        self.scan_with_trace(image).map(|(result, _)| result)
    }

    /// Scan and return the rectification trace alongside the result.
    pub fn scan_with_trace(
        &self,
        image: &Raster,
    ) -> Result<(ScanResult, RectifyTrace), RectifyError> {
        if image.is_empty() {
            return Err(RectifyError::InvalidInput(
                "cannot scan an empty raster".into(),
            ));
        }

        let working = resize_max_dimension(image, self.options.max_dimension);
        let gray = to_grayscale(&working);
        let blurred = gaussian_blur(&gray);

        let edges = sobel_edge_map(&blurred, self.options.edge_threshold);
        let edges = dilate(&edges, self.options.dilate_iterations);
        let boundaries = trace_boundaries(&edges);
        debug!(
            "DocumentScanner::scan {}x{} -> {} boundary polygons",
            working.w,
            working.h,
            boundaries.len()
        );

        let report = self.rectifier.rectify_with_report(&working, &boundaries)?;
        let enhanced = match self.options.enhancement {
            Enhancement::Adaptive => Some(adaptive_threshold(
                &to_grayscale(&report.result.output),
                ADAPTIVE_WINDOW,
                ADAPTIVE_OFFSET,
            )),
            Enhancement::Sharpen => Some(sharpen(&to_grayscale(&report.result.output))),
            Enhancement::None => None,
        };

        Ok((
            ScanResult {
                rectification: report.result,
                enhanced,
            },
            report.trace,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RectifyOutcome;

    #[test]
    fn blank_image_scans_to_the_fallback() {
        let mut image = Raster::new(120, 90, 1);
        image.data.fill(128);
        let scanner = DocumentScanner::new(ScanOptions::default());
        let result = scanner.scan(&image).unwrap();
        assert_eq!(
            result.rectification.outcome,
            RectifyOutcome::FallbackFullImage
        );
        assert_eq!(
            (result.rectification.output.w, result.rectification.output.h),
            (120, 90)
        );
        assert!(result.enhanced.is_some());
    }

    #[test]
    fn enhancement_none_skips_the_cleanup() {
        let image = Raster::new(50, 50, 1);
        let scanner = DocumentScanner::new(ScanOptions {
            enhancement: Enhancement::None,
            ..ScanOptions::default()
        });
        let result = scanner.scan(&image).unwrap();
        assert!(result.enhanced.is_none());
    }

    #[test]
    fn oversized_inputs_are_downscaled_before_detection() {
        let image = Raster::new(2000, 1000, 1);
        let scanner = DocumentScanner::new(ScanOptions::default());
        let result = scanner.scan(&image).unwrap();
        // Fallback output matches the downscaled working frame.
        assert_eq!(
            (result.rectification.output.w, result.rectification.output.h),
            (1000, 500)
        );
    }

    #[test]
    fn empty_input_is_rejected() {
        let scanner = DocumentScanner::new(ScanOptions::default());
        assert!(scanner.scan(&Raster::new(0, 5, 1)).is_err());
    }
}
