//! Stage-by-stage trace of a rectification run, serializable for offline
//! inspection.

use crate::candidates::SearchDetails;
use crate::geometry::Point;
use crate::types::{RectificationResult, RectifyOutcome};
use crate::warp::Interpolation;
use nalgebra::Matrix3;
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
pub struct StageTiming {
    pub name: &'static str,
    pub elapsed_ms: f64,
}

/// Named per-stage timings plus the end-to-end total.
#[derive(Clone, Debug, Default, Serialize)]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    pub fn with_total(total_ms: f64) -> Self {
        Self {
            total_ms,
            stages: Vec::new(),
        }
    }

    pub fn push(&mut self, name: &'static str, elapsed_ms: f64) {
        self.stages.push(StageTiming { name, elapsed_ms });
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct InputDescriptor {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub boundaries: usize,
}

/// Candidate-selection stage record.
#[derive(Clone, Debug, Serialize)]
pub struct SearchStage {
    pub elapsed_ms: f64,
    #[serde(flatten)]
    pub details: SearchDetails,
}

/// Corner-ordering and size-estimation record.
#[derive(Clone, Debug, Serialize)]
pub struct CornerStage {
    pub corners: [Point; 4],
    pub output_width: usize,
    pub output_height: usize,
}

/// Homography-estimation record.
#[derive(Clone, Debug, Serialize)]
pub struct HomographyStage {
    pub elapsed_ms: f64,
    pub hmtx: Matrix3<f64>,
    pub determinant: f64,
}

/// Resampling record.
#[derive(Clone, Debug, Serialize)]
pub struct WarpStage {
    pub elapsed_ms: f64,
    pub width: usize,
    pub height: usize,
    pub interpolation: Interpolation,
}

/// Full pipeline trace. Stages that never ran (fallback path) stay `None`.
#[derive(Clone, Debug, Serialize)]
pub struct RectifyTrace {
    pub input: InputDescriptor,
    pub outcome: RectifyOutcome,
    pub timings: TimingBreakdown,
    pub search: Option<SearchStage>,
    pub corners: Option<CornerStage>,
    pub homography: Option<HomographyStage>,
    pub warp: Option<WarpStage>,
}

/// Rectification result paired with its trace.
#[derive(Clone, Debug)]
pub struct RectifyReport {
    pub result: RectificationResult,
    pub trace: RectifyTrace,
}
