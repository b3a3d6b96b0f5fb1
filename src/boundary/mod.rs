//! Boundary extraction from a raster: edge maps, binary masks and closed
//! contour tracing.
//!
//! This is the collaborator feeding the rectification pipeline: a binary
//! edge/threshold map is traced into closed [`Polygon`] boundaries in image
//! pixel coordinates, in arbitrary order. Masks are single-channel rasters
//! holding 0 for background and 255 for foreground.

mod trace;

pub use trace::trace_boundaries;

use crate::image::Raster;

type Kernel3 = [[f32; 3]; 3];

const SOBEL_KERNEL_X: Kernel3 = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_KERNEL_Y: Kernel3 = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// Mask value for foreground pixels.
pub const FOREGROUND: u8 = 255;

/// Fixed-threshold binarization of a grayscale raster. Pixels strictly above
/// `threshold` become foreground.
pub fn binarize(gray: &Raster, threshold: u8) -> Raster {
    assert!(gray.is_grayscale(), "binarize expects a grayscale raster");
    let mut mask = Raster::new(gray.w, gray.h, 1);
    for (dst, &src) in mask.data.iter_mut().zip(gray.data.iter()) {
        *dst = if src > threshold { FOREGROUND } else { 0 };
    }
    mask
}

/// Sobel gradient-magnitude edge mask. Pixels whose magnitude exceeds
/// `mag_thresh` become foreground.
pub fn sobel_edge_map(gray: &Raster, mag_thresh: f32) -> Raster {
    assert!(gray.is_grayscale(), "edge map expects a grayscale raster");
    let (w, h) = (gray.w, gray.h);
    let mut mask = Raster::new(w, h, 1);
    if w == 0 || h == 0 {
        return mask;
    }

    for y in 0..h {
        let y_idx = [y.saturating_sub(1), y, (y + 1).min(h - 1)];
        for x in 0..w {
            let x_idx = [x.saturating_sub(1), x, (x + 1).min(w - 1)];

            let mut sum_x = 0.0f32;
            let mut sum_y = 0.0f32;
            for (ky, &yy) in y_idx.iter().enumerate() {
                for (kx, &xx) in x_idx.iter().enumerate() {
                    let sample = gray.get(xx, yy, 0) as f32;
                    sum_x += sample * SOBEL_KERNEL_X[ky][kx];
                    sum_y += sample * SOBEL_KERNEL_Y[ky][kx];
                }
            }

            let magnitude = (sum_x * sum_x + sum_y * sum_y).sqrt();
            if magnitude > mag_thresh {
                mask.set(x, y, 0, FOREGROUND);
            }
        }
    }
    mask
}

/// Binary 3×3 dilation, repeated `iterations` times. Closes small gaps in an
/// edge mask before contour tracing.
pub fn dilate(mask: &Raster, iterations: usize) -> Raster {
    assert!(mask.is_grayscale(), "dilate expects a single-channel mask");
    let (w, h) = (mask.w, mask.h);
    let mut current = mask.clone();
    for _ in 0..iterations {
        let mut next = Raster::new(w, h, 1);
        for y in 0..h {
            let y0 = y.saturating_sub(1);
            let y1 = (y + 1).min(h.saturating_sub(1));
            for x in 0..w {
                let x0 = x.saturating_sub(1);
                let x1 = (x + 1).min(w.saturating_sub(1));
                let mut hit = false;
                'probe: for yy in y0..=y1 {
                    for xx in x0..=x1 {
                        if current.get(xx, yy, 0) != 0 {
                            hit = true;
                            break 'probe;
                        }
                    }
                }
                if hit {
                    next.set(x, y, 0, FOREGROUND);
                }
            }
        }
        current = next;
    }
    current
}
