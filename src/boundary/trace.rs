//! Closed-contour extraction via Moore-neighbour border following.
//!
//! The mask is scanned row-major; every unvisited foreground pixel whose left
//! neighbour is background starts a trace. From the current pixel the eight
//! neighbours are probed clockwise, beginning just past the backtrack (the
//! last background pixel seen); the first foreground hit becomes the next
//! contour pixel. A trace terminates when it re-enters its start pixel about
//! to repeat its first move. Outer and hole boundaries both emerge as
//! separate polygons, in arbitrary order.

use crate::geometry::Polygon;
use crate::image::Raster;

/// Clockwise Moore neighbourhood in a y-down frame:
/// W, NW, N, NE, E, SE, S, SW.
const OFFSETS: [(i32, i32); 8] = [
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
];

/// Trace all closed boundaries of a binary mask. Polygons shorter than 3
/// pixels are discarded.
pub fn trace_boundaries(mask: &Raster) -> Vec<Polygon> {
    assert!(mask.is_grayscale(), "tracing expects a single-channel mask");
    let (w, h) = (mask.w, mask.h);
    let mut visited = vec![false; w * h];
    let mut polygons = Vec::new();

    for y in 0..h {
        for x in 0..w {
            if mask.get(x, y, 0) == 0 || visited[y * w + x] {
                continue;
            }
            let left_is_background = x == 0 || mask.get(x - 1, y, 0) == 0;
            if !left_is_background {
                continue;
            }
            let contour = trace_from(mask, &mut visited, x, y);
            if contour.len() >= 3 {
                let points = contour
                    .iter()
                    .map(|&(px, py)| [px as f64, py as f64])
                    .collect();
                polygons.push(Polygon::new(points));
            }
        }
    }
    polygons
}

#[inline]
fn is_foreground(mask: &Raster, p: (i32, i32)) -> bool {
    p.0 >= 0
        && p.1 >= 0
        && (p.0 as usize) < mask.w
        && (p.1 as usize) < mask.h
        && mask.get(p.0 as usize, p.1 as usize, 0) != 0
}

#[inline]
fn direction_index(from: (i32, i32), to: (i32, i32)) -> usize {
    let delta = (to.0 - from.0, to.1 - from.1);
    OFFSETS.iter().position(|&o| o == delta).unwrap_or(0)
}

fn trace_from(
    mask: &Raster,
    visited: &mut [bool],
    sx: usize,
    sy: usize,
) -> Vec<(usize, usize)> {
    let start = (sx as i32, sy as i32);
    let mut contour = vec![(sx, sy)];
    visited[sy * mask.w + sx] = true;

    // The scan reached the start from the west, so that is the first
    // backtrack pixel.
    let mut backtrack = (start.0 - 1, start.1);
    let mut cur = start;
    let mut first_move: Option<(i32, i32)> = None;
    let step_limit = 4 * (mask.w * mask.h + 1);

    for _ in 0..step_limit {
        let start_dir = direction_index(cur, backtrack);
        let mut next = None;
        let mut last_background = backtrack;
        for k in 1..=8 {
            let idx = (start_dir + k) % 8;
            let probe = (cur.0 + OFFSETS[idx].0, cur.1 + OFFSETS[idx].1);
            if is_foreground(mask, probe) {
                next = Some(probe);
                break;
            }
            last_background = probe;
        }

        let Some(next) = next else {
            break; // isolated pixel
        };
        match first_move {
            None => first_move = Some(next),
            Some(first) => {
                if cur == start && next == first {
                    break;
                }
            }
        }

        backtrack = last_background;
        cur = next;
        let (cx, cy) = (cur.0 as usize, cur.1 as usize);
        visited[cy * mask.w + cx] = true;
        contour.push((cx, cy));
    }

    // Arriving back at the start pushes it a second time.
    if contour.len() > 1 && contour.last() == Some(&(sx, sy)) {
        contour.pop();
    }
    contour
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::FOREGROUND;

    fn mask_with_rect(w: usize, h: usize, x0: usize, y0: usize, x1: usize, y1: usize) -> Raster {
        let mut mask = Raster::new(w, h, 1);
        for y in y0..=y1 {
            for x in x0..=x1 {
                mask.set(x, y, 0, FOREGROUND);
            }
        }
        mask
    }

    #[test]
    fn filled_rectangle_yields_one_boundary() {
        let mask = mask_with_rect(10, 10, 3, 3, 6, 6);
        let polygons = trace_boundaries(&mask);
        assert_eq!(polygons.len(), 1);

        let poly = &polygons[0];
        // 4x4 block: 12 boundary pixels.
        assert_eq!(poly.len(), 12);
        let xs: Vec<f64> = poly.points.iter().map(|p| p[0]).collect();
        let ys: Vec<f64> = poly.points.iter().map(|p| p[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f64::MAX, f64::min), 3.0);
        assert_eq!(xs.iter().cloned().fold(f64::MIN, f64::max), 6.0);
        assert_eq!(ys.iter().cloned().fold(f64::MAX, f64::min), 3.0);
        assert_eq!(ys.iter().cloned().fold(f64::MIN, f64::max), 6.0);
    }

    #[test]
    fn separate_blobs_yield_separate_boundaries() {
        let mut mask = mask_with_rect(20, 10, 1, 1, 4, 4);
        for y in 2..8 {
            for x in 10..18 {
                mask.set(x, y, 0, FOREGROUND);
            }
        }
        let polygons = trace_boundaries(&mask);
        assert_eq!(polygons.len(), 2);
    }

    #[test]
    fn hollow_rectangle_yields_outer_and_inner_boundaries() {
        let mut mask = mask_with_rect(12, 12, 2, 2, 9, 9);
        for y in 4..=7 {
            for x in 4..=7 {
                mask.set(x, y, 0, 0);
            }
        }
        let mut polygons = trace_boundaries(&mask);
        assert_eq!(polygons.len(), 2);
        polygons.sort_by(|a, b| b.area().partial_cmp(&a.area()).unwrap());
        assert!(polygons[0].area() > polygons[1].area());
    }

    #[test]
    fn isolated_pixels_are_discarded() {
        let mut mask = Raster::new(5, 5, 1);
        mask.set(2, 2, 0, FOREGROUND);
        assert!(trace_boundaries(&mask).is_empty());
    }

    #[test]
    fn blob_touching_the_border_is_traced() {
        let mask = mask_with_rect(6, 6, 0, 0, 3, 3);
        let polygons = trace_boundaries(&mask);
        assert_eq!(polygons.len(), 1);
        assert_eq!(polygons[0].len(), 12);
    }
}
