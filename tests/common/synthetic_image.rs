use doc_rectify::image::Raster;

/// Generates a black image with a white convex quadrilateral. Corners are
/// given in clockwise order for a y-down frame.
pub fn filled_quad_u8(width: usize, height: usize, corners: [[f64; 2]; 4]) -> Raster {
    assert!(width > 0 && height > 0, "image dimensions must be positive");

    let mut img = Raster::new(width, height, 1);
    for y in 0..height {
        for x in 0..width {
            if inside_convex(&corners, x as f64, y as f64) {
                img.set(x, y, 0, 255);
            }
        }
    }
    img
}

/// Point-in-convex-polygon via consistent cross-product signs.
fn inside_convex(corners: &[[f64; 2]; 4], px: f64, py: f64) -> bool {
    let mut sign = 0.0f64;
    for i in 0..4 {
        let a = corners[i];
        let b = corners[(i + 1) % 4];
        let cross = (b[0] - a[0]) * (py - a[1]) - (b[1] - a[1]) * (px - a[0]);
        if cross.abs() < 1e-12 {
            continue;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
    }
    true
}
