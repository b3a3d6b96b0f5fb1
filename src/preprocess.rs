//! Input conditioning ahead of boundary extraction: grayscale conversion,
//! downscaling and noise-suppressing blur.

use crate::image::Raster;

/// Normalised 5-tap Gaussian kernel `[1, 4, 6, 4, 1] / 16`.
const GAUSSIAN_5TAP: [f32; 5] = [0.0625, 0.25, 0.375, 0.25, 0.0625];

/// BT.601 luma conversion. Single-channel input is passed through; a fourth
/// (alpha) channel is ignored.
pub fn to_grayscale(src: &Raster) -> Raster {
    if src.is_grayscale() {
        return src.clone();
    }
    assert!(
        src.channels >= 3,
        "grayscale conversion expects 1, 3 or 4 channels"
    );
    let mut out = Raster::new(src.w, src.h, 1);
    for y in 0..src.h {
        for x in 0..src.w {
            let r = src.get(x, y, 0) as f32;
            let g = src.get(x, y, 1) as f32;
            let b = src.get(x, y, 2) as f32;
            let luma = 0.299 * r + 0.587 * g + 0.114 * b;
            out.set(x, y, 0, luma.round().clamp(0.0, 255.0) as u8);
        }
    }
    out
}

/// Downscale so that `max(w, h) <= max_dimension`, preserving aspect ratio.
/// Images already within the cap are returned unchanged.
pub fn resize_max_dimension(src: &Raster, max_dimension: usize) -> Raster {
    let largest = src.w.max(src.h);
    if max_dimension == 0 || largest <= max_dimension || src.is_empty() {
        return src.clone();
    }
    let scale = max_dimension as f64 / largest as f64;
    let new_w = ((src.w as f64 * scale) as usize).max(1);
    let new_h = ((src.h as f64 * scale) as usize).max(1);

    let sx = src.w as f64 / new_w as f64;
    let sy = src.h as f64 / new_h as f64;
    let mut out = Raster::new(new_w, new_h, src.channels);
    for y in 0..new_h {
        let src_y = ((y as f64 + 0.5) * sy - 0.5).clamp(0.0, (src.h - 1) as f64);
        for x in 0..new_w {
            let src_x = ((x as f64 + 0.5) * sx - 0.5).clamp(0.0, (src.w - 1) as f64);
            for c in 0..src.channels {
                // In-bounds by construction
                let v = src.sample_bilinear(src_x, src_y, c).unwrap_or(0);
                out.set(x, y, c, v);
            }
        }
    }
    out
}

/// Separable 5-tap Gaussian blur with clamped borders.
pub fn gaussian_blur(src: &Raster) -> Raster {
    if src.is_empty() {
        return src.clone();
    }
    let (w, h, channels) = (src.w, src.h, src.channels);

    // Horizontal pass into an f32 buffer, vertical pass back to u8.
    let mut tmp = vec![0.0f32; w * h * channels];
    for y in 0..h {
        for x in 0..w {
            for c in 0..channels {
                let mut acc = 0.0f32;
                for (k, &tap) in GAUSSIAN_5TAP.iter().enumerate() {
                    let xx = (x as isize + k as isize - 2).clamp(0, w as isize - 1) as usize;
                    acc += src.get(xx, y, c) as f32 * tap;
                }
                tmp[(y * w + x) * channels + c] = acc;
            }
        }
    }

    let mut out = Raster::new(w, h, channels);
    for y in 0..h {
        for x in 0..w {
            for c in 0..channels {
                let mut acc = 0.0f32;
                for (k, &tap) in GAUSSIAN_5TAP.iter().enumerate() {
                    let yy = (y as isize + k as isize - 2).clamp(0, h as isize - 1) as usize;
                    acc += tmp[(yy * w + x) * channels + c] * tap;
                }
                out.set(x, y, c, acc.round().clamp(0.0, 255.0) as u8);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grayscale_uses_luma_weights() {
        let mut rgb = Raster::new(1, 1, 3);
        rgb.set(0, 0, 0, 255); // pure red
        let gray = to_grayscale(&rgb);
        assert_eq!(gray.channels, 1);
        assert_eq!(gray.get(0, 0, 0), 76); // 0.299 * 255
    }

    #[test]
    fn grayscale_input_passes_through() {
        let gray = Raster::from_raw(2, 1, 1, vec![11, 22]);
        assert_eq!(to_grayscale(&gray), gray);
    }

    #[test]
    fn resize_caps_the_longest_side() {
        let src = Raster::new(1000, 500, 1);
        let out = resize_max_dimension(&src, 100);
        assert_eq!((out.w, out.h), (100, 50));

        let small = Raster::new(80, 40, 1);
        assert_eq!(resize_max_dimension(&small, 100), small);
    }

    #[test]
    fn resize_preserves_constant_images() {
        let mut src = Raster::new(64, 64, 1);
        src.data.fill(137);
        let out = resize_max_dimension(&src, 32);
        assert!(out.data.iter().all(|&v| v == 137));
    }

    #[test]
    fn blur_preserves_constant_images() {
        let mut src = Raster::new(16, 16, 1);
        src.data.fill(99);
        let out = gaussian_blur(&src);
        assert!(out.data.iter().all(|&v| v == 99));
    }

    #[test]
    fn blur_spreads_an_impulse_symmetrically() {
        let mut src = Raster::new(9, 9, 1);
        src.set(4, 4, 0, 255);
        let out = gaussian_blur(&src);
        assert!(out.get(4, 4, 0) > out.get(3, 4, 0));
        assert_eq!(out.get(3, 4, 0), out.get(5, 4, 0));
        assert_eq!(out.get(4, 3, 0), out.get(4, 5, 0));
        assert_eq!(out.get(2, 4, 0), out.get(4, 2, 0));
    }
}
