//! Douglas–Peucker simplification for closed boundaries.
//!
//! The open-chain variant keeps a chain's endpoints and recursively retains
//! the vertex farthest from the chord whenever that distance exceeds the
//! tolerance. For a closed boundary there are no natural endpoints, so the
//! curve is split at the two mutually most distant vertices (approximated by
//! two farthest-point sweeps), each half is simplified independently, and a
//! final pass drops an anchor that ended up within tolerance of its
//! neighbours.

use crate::geometry::{distance, Point};

/// Simplify a closed boundary, keeping vertices farther than `epsilon` from
/// the simplified outline. Boundaries with fewer than 4 vertices are
/// returned unchanged.
pub fn simplify_closed(points: &[Point], epsilon: f64) -> Vec<Point> {
    if points.len() < 4 || epsilon <= 0.0 {
        return points.to_vec();
    }

    let (a, b) = split_anchors(points);
    let (a, b) = (a.min(b), a.max(b));

    // First half: a..=b. Second half: b..end plus the wrap back to a.
    let first: Vec<Point> = points[a..=b].to_vec();
    let mut second: Vec<Point> = points[b..].to_vec();
    second.extend_from_slice(&points[..=a]);

    let mut out = simplify_chain(&first, epsilon);
    let tail = simplify_chain(&second, epsilon);
    // Interior vertices only; both anchors are already present.
    out.extend_from_slice(&tail[1..tail.len().saturating_sub(1)]);

    prune_collinear(&mut out, epsilon);
    out
}

/// Two approximately maximally distant vertices of the boundary.
fn split_anchors(points: &[Point]) -> (usize, usize) {
    let n = points.len() as f64;
    let centroid = points.iter().fold([0.0, 0.0], |acc, p| {
        [acc[0] + p[0] / n, acc[1] + p[1] / n]
    });
    let a = farthest_from(points, centroid);
    let b = farthest_from(points, points[a]);
    (a, b)
}

fn farthest_from(points: &[Point], origin: Point) -> usize {
    let mut best = 0;
    let mut best_dist = -1.0;
    for (i, &p) in points.iter().enumerate() {
        let d = distance(origin, p);
        if d > best_dist {
            best_dist = d;
            best = i;
        }
    }
    best
}

/// Open-chain Douglas–Peucker with an explicit segment stack.
fn simplify_chain(points: &[Point], epsilon: f64) -> Vec<Point> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;

    let mut stack = vec![(0usize, n - 1)];
    while let Some((lo, hi)) = stack.pop() {
        if hi <= lo + 1 {
            continue;
        }
        let mut max_dist = 0.0;
        let mut max_idx = lo;
        for i in (lo + 1)..hi {
            let d = perpendicular_distance(points[i], points[lo], points[hi]);
            if d > max_dist {
                max_dist = d;
                max_idx = i;
            }
        }
        if max_dist > epsilon {
            keep[max_idx] = true;
            stack.push((lo, max_idx));
            stack.push((max_idx, hi));
        }
    }

    points
        .iter()
        .zip(keep.iter())
        .filter_map(|(&p, &k)| k.then_some(p))
        .collect()
}

/// Distance from `p` to the segment `a`–`b` (to the endpoint distance when
/// the segment collapses).
fn perpendicular_distance(p: Point, a: Point, b: Point) -> f64 {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    let len_sq = dx * dx + dy * dy;
    if len_sq <= f64::EPSILON {
        return distance(p, a);
    }
    (dy * p[0] - dx * p[1] + b[0] * a[1] - b[1] * a[0]).abs() / len_sq.sqrt()
}

/// Drop vertices lying within `epsilon` of the line through their closed-ring
/// neighbours. The split anchors are kept unconditionally by the chain pass,
/// so one of them can be a spurious mid-edge vertex.
fn prune_collinear(points: &mut Vec<Point>, epsilon: f64) {
    let mut changed = true;
    while changed && points.len() > 3 {
        changed = false;
        for i in 0..points.len() {
            let prev = points[(i + points.len() - 1) % points.len()];
            let next = points[(i + 1) % points.len()];
            if perpendicular_distance(points[i], prev, next) <= epsilon {
                points.remove(i);
                changed = true;
                break;
            }
        }
    }
}
