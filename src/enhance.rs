//! Post-rectification clean-up of the scanned document.
//!
//! Adaptive binarization gives the classic black-on-white scan look and copes
//! with uneven lighting; sharpening is the gentler alternative when the
//! grayscale content should be preserved.

use crate::image::Raster;

/// Kernel for unsharp-style 3×3 sharpening.
const SHARPEN_KERNEL: [[f32; 3]; 3] = [[-1.0, -1.0, -1.0], [-1.0, 9.0, -1.0], [-1.0, -1.0, -1.0]];

/// Mean-of-window adaptive threshold. A pixel becomes white when it exceeds
/// the local mean minus `offset`; `window` must be odd.
pub fn adaptive_threshold(gray: &Raster, window: usize, offset: f64) -> Raster {
    assert!(gray.is_grayscale(), "adaptive threshold expects grayscale");
    assert!(window % 2 == 1, "window size must be odd");
    let (w, h) = (gray.w, gray.h);
    let mut out = Raster::new(w, h, 1);
    if w == 0 || h == 0 {
        return out;
    }

    // Summed-area table with a leading zero row/column.
    let mut integral = vec![0u64; (w + 1) * (h + 1)];
    for y in 0..h {
        let mut row_sum = 0u64;
        for x in 0..w {
            row_sum += gray.get(x, y, 0) as u64;
            integral[(y + 1) * (w + 1) + (x + 1)] = integral[y * (w + 1) + (x + 1)] + row_sum;
        }
    }

    let half = (window / 2) as isize;
    for y in 0..h {
        let y0 = (y as isize - half).max(0) as usize;
        let y1 = ((y as isize + half) as usize).min(h - 1);
        for x in 0..w {
            let x0 = (x as isize - half).max(0) as usize;
            let x1 = ((x as isize + half) as usize).min(w - 1);

            let count = ((x1 - x0 + 1) * (y1 - y0 + 1)) as f64;
            let sum = integral[(y1 + 1) * (w + 1) + (x1 + 1)]
                + integral[y0 * (w + 1) + x0]
                - integral[y0 * (w + 1) + (x1 + 1)]
                - integral[(y1 + 1) * (w + 1) + x0];
            let mean = sum as f64 / count;

            let value = if gray.get(x, y, 0) as f64 > mean - offset {
                255
            } else {
                0
            };
            out.set(x, y, 0, value);
        }
    }
    out
}

/// 3×3 sharpening convolution with clamped borders.
pub fn sharpen(gray: &Raster) -> Raster {
    assert!(gray.is_grayscale(), "sharpening expects grayscale");
    let (w, h) = (gray.w, gray.h);
    let mut out = Raster::new(w, h, 1);
    if w == 0 || h == 0 {
        return out;
    }

    for y in 0..h {
        let y_idx = [y.saturating_sub(1), y, (y + 1).min(h - 1)];
        for x in 0..w {
            let x_idx = [x.saturating_sub(1), x, (x + 1).min(w - 1)];
            let mut acc = 0.0f32;
            for (ky, &yy) in y_idx.iter().enumerate() {
                for (kx, &xx) in x_idx.iter().enumerate() {
                    acc += gray.get(xx, yy, 0) as f32 * SHARPEN_KERNEL[ky][kx];
                }
            }
            out.set(x, y, 0, acc.round().clamp(0.0, 255.0) as u8);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adaptive_threshold_is_binary() {
        let mut gray = Raster::new(20, 20, 1);
        for y in 0..20 {
            for x in 0..20 {
                gray.set(x, y, 0, (x * 12) as u8);
            }
        }
        let out = adaptive_threshold(&gray, 11, 2.0);
        assert!(out.data.iter().all(|&v| v == 0 || v == 255));
    }

    #[test]
    fn dark_text_on_light_ground_separates() {
        let mut gray = Raster::new(21, 21, 1);
        gray.data.fill(220);
        gray.set(10, 10, 0, 40); // a dark stroke
        let out = adaptive_threshold(&gray, 11, 2.0);
        assert_eq!(out.get(10, 10, 0), 0);
        assert_eq!(out.get(3, 3, 0), 255);
    }

    #[test]
    fn sharpen_preserves_constant_regions() {
        let mut gray = Raster::new(8, 8, 1);
        gray.data.fill(120);
        let out = sharpen(&gray);
        assert!(out.data.iter().all(|&v| v == 120));
    }

    #[test]
    fn sharpen_amplifies_an_edge() {
        let mut gray = Raster::new(8, 8, 1);
        for y in 0..8 {
            for x in 4..8 {
                gray.set(x, y, 0, 100);
            }
        }
        let out = sharpen(&gray);
        // Bright side of the edge overshoots, dark side clamps to zero.
        assert!(out.get(4, 4, 0) > 100);
        assert_eq!(out.get(3, 4, 0), 0);
    }
}
