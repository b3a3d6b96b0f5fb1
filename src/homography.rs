//! 4-point planar homography estimation and application.
//!
//! # Algorithm Outline
//! 1. Each of the 4 point correspondences contributes two linear equations in
//!    the 8 unknown transform parameters (the ninth entry is fixed to 1).
//! 2. The resulting 8×8 system is solved by Gaussian elimination with partial
//!    pivoting in `f64`.
//! 3. A vanishing pivot (relative to the system's magnitude) or a near-zero
//!    determinant of the assembled matrix signals degenerate source geometry
//!    (collinear corners, zero-area quadrilateral) and is reported as an
//!    error instead of a numerically meaningless matrix.

use crate::error::RectifyError;
use crate::geometry::{OrderedQuad, Point};
use nalgebra::{Matrix3, Vector3};
use serde::Serialize;

const EPS_W: f64 = 1e-12;
const EPS_DET: f64 = 1e-10;

/// Projective transform between two planes, represented as a 3×3 matrix with
/// its bottom-right entry normalized to 1.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Homography {
    m: Matrix3<f64>,
}

impl Homography {
    /// The identity transform.
    pub fn identity() -> Self {
        Self {
            m: Matrix3::identity(),
        }
    }

    /// Transform mapping 4 ordered source corners onto the canonical corners
    /// of a `width × height` rectangle: `(0,0)`, `(W−1,0)`, `(W−1,H−1)`,
    /// `(0,H−1)`.
    pub fn from_quad_to_rect(
        src: &OrderedQuad,
        width: usize,
        height: usize,
    ) -> Result<Self, RectifyError> {
        let w = width.saturating_sub(1) as f64;
        let h = height.saturating_sub(1) as f64;
        let dst = [[0.0, 0.0], [w, 0.0], [w, h], [0.0, h]];
        Self::from_correspondences(&src.points(), &dst)
    }

    /// Transform mapping each `src[i]` onto `dst[i]`.
    pub fn from_correspondences(
        src: &[Point; 4],
        dst: &[Point; 4],
    ) -> Result<Self, RectifyError> {
        // Two rows per correspondence:
        //   x*h0 + y*h1 + h2 - x*u*h6 - y*u*h7 = u
        //   x*h3 + y*h4 + h5 - x*v*h6 - y*v*h7 = v
        let mut a = [[0.0f64; 9]; 8];
        for i in 0..4 {
            let [x, y] = src[i];
            let [u, v] = dst[i];

            let r = 2 * i;
            a[r][0] = x;
            a[r][1] = y;
            a[r][2] = 1.0;
            a[r][6] = -x * u;
            a[r][7] = -y * u;
            a[r][8] = u;

            a[r + 1][3] = x;
            a[r + 1][4] = y;
            a[r + 1][5] = 1.0;
            a[r + 1][6] = -x * v;
            a[r + 1][7] = -y * v;
            a[r + 1][8] = v;
        }

        let h = solve_8x8(&mut a)?;
        let m = Matrix3::new(h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0);

        let det = m.determinant();
        if !det.is_finite() || det.abs() < EPS_DET {
            return Err(RectifyError::DegenerateHomography(
                "projective matrix is not invertible",
            ));
        }
        Ok(Self { m })
    }

    /// Apply the transform to a single point. `None` when the homogeneous
    /// scale collapses (point at infinity).
    pub fn project(&self, p: Point) -> Option<Point> {
        let v = self.m * Vector3::new(p[0], p[1], 1.0);
        let w = v[2];
        if !w.is_finite() || w.abs() <= EPS_W || !v[0].is_finite() || !v[1].is_finite() {
            return None;
        }
        Some([v[0] / w, v[1] / w])
    }

    /// The inverse transform.
    pub fn inverse(&self) -> Result<Self, RectifyError> {
        let inv = self.m.try_inverse().ok_or(RectifyError::DegenerateHomography(
            "projective matrix is not invertible",
        ))?;
        Ok(Self { m: inv })
    }

    /// The underlying 3×3 matrix.
    #[inline]
    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.m
    }

    #[inline]
    pub fn determinant(&self) -> f64 {
        self.m.determinant()
    }
}

/// Gaussian elimination with partial pivoting over an 8×9 augmented system.
/// Returns the 8 solved parameters, or a degeneracy error when a pivot
/// vanishes relative to the system's magnitude.
fn solve_8x8(a: &mut [[f64; 9]; 8]) -> Result<[f64; 8], RectifyError> {
    let scale = a
        .iter()
        .flat_map(|row| row.iter())
        .fold(0.0f64, |acc, &v| acc.max(v.abs()))
        .max(1.0);
    let pivot_tol = scale * 1e-12;

    for col in 0..8 {
        let mut max_val = a[col][col].abs();
        let mut max_row = col;
        for row in (col + 1)..8 {
            let v = a[row][col].abs();
            if v > max_val {
                max_val = v;
                max_row = row;
            }
        }
        if max_val < pivot_tol {
            return Err(RectifyError::DegenerateHomography(
                "source corners are collinear or coincident",
            ));
        }
        if max_row != col {
            a.swap(col, max_row);
        }

        let pivot = a[col][col];
        for row in (col + 1)..8 {
            let factor = a[row][col] / pivot;
            if factor == 0.0 {
                continue;
            }
            for c in col..9 {
                a[row][c] -= factor * a[col][c];
            }
        }
    }

    let mut h = [0.0f64; 8];
    for row in (0..8).rev() {
        let mut sum = a[row][8];
        for c in (row + 1)..8 {
            sum -= a[row][c] * h[c];
        }
        h[row] = sum / a[row][row];
    }
    Ok(h)
}
