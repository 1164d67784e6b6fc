//! 2D ring geometry: area, orientation, offsetting, simplification.
//!
//! Polygon post-processing happens in the plane frame, where each boundary
//! loop is a closed ring of 2D points. Offsets are miter line-offsets; rings
//! that invert during a negative offset are reported as collapsed.

use nalgebra::{Point2, Vector2};

/// A closed loop of 2D points (no repeated endpoint).
pub type Ring = Vec<Point2<f64>>;

/// Signed shoelace area: positive for counter-clockwise rings.
pub fn signed_area(ring: &[Point2<f64>]) -> f64 {
    let mut area = 0.0;
    for i in 0..ring.len() {
        let p = ring[i];
        let q = ring[(i + 1) % ring.len()];
        area += p.x * q.y - q.x * p.y;
    }
    0.5 * area
}

/// Reverse the ring in place if it is not counter-clockwise.
pub fn ensure_ccw(ring: &mut Ring) {
    if signed_area(ring) < 0.0 {
        ring.reverse();
    }
}

/// Offset a counter-clockwise ring by `d` (positive = outward).
///
/// Each edge is shifted along its outward normal and consecutive offset
/// lines are intersected (miter join); near-parallel joins fall back to the
/// shared vertex plus the edge normal. Returns `None` when the ring collapses
/// (fewer than three points, or the orientation inverts).
pub fn offset(ring: &[Point2<f64>], d: f64) -> Option<Ring> {
    let n = ring.len();
    if n < 3 {
        return None;
    }
    if d == 0.0 {
        return Some(ring.to_vec());
    }

    // Edge directions and outward normals (right of the direction for CCW)
    let mut dirs = Vec::with_capacity(n);
    for i in 0..n {
        let e = ring[(i + 1) % n] - ring[i];
        let len = e.norm();
        if len < 1e-12 {
            // Degenerate edge; reuse the previous direction if any
            dirs.push(dirs.last().copied().unwrap_or_else(Vector2::x));
        } else {
            dirs.push(e / len);
        }
    }

    let normal = |e: Vector2<f64>| Vector2::new(e.y, -e.x);

    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let prev = (i + n - 1) % n;
        let e0 = dirs[prev];
        let e1 = dirs[i];
        let a = ring[i] + d * normal(e0); // point on offset line of edge prev
        let b = ring[i] + d * normal(e1); // point on offset line of edge i

        let cross = e0.x * e1.y - e0.y * e1.x;
        if cross.abs() < 1e-9 {
            // Parallel edges: both offset lines coincide through the shifted vertex
            out.push(b);
        } else {
            // Intersect a + t*e0 with b + s*e1
            let delta = b - a;
            let t = (delta.x * e1.y - delta.y * e1.x) / cross;
            out.push(a + t * e0);
        }
    }

    // A shrink past the medial axis inverts the ring
    if signed_area(&out) <= 0.0 {
        return None;
    }
    Some(out)
}

/// Douglas-Peucker simplification of a closed ring.
///
/// The ring is split at its first point and the point farthest from it, and
/// each open chain is simplified with tolerance `tol`. Rings at or below four
/// points pass through unchanged.
pub fn simplify(ring: &[Point2<f64>], tol: f64) -> Ring {
    let n = ring.len();
    if n <= 4 || tol <= 0.0 {
        return ring.to_vec();
    }

    // Split at the point farthest from ring[0]
    let far = (1..n)
        .max_by(|&a, &b| {
            let da = (ring[a] - ring[0]).norm_squared();
            let db = (ring[b] - ring[0]).norm_squared();
            da.total_cmp(&db)
        })
        .unwrap_or(n / 2);

    let mut first: Vec<Point2<f64>> = ring[0..=far].to_vec();
    let mut second: Vec<Point2<f64>> = ring[far..n].to_vec();
    second.push(ring[0]);

    first = rdp(&first, tol);
    second = rdp(&second, tol);

    // Recombine, dropping the duplicated join points
    let mut out = first;
    out.extend_from_slice(&second[1..second.len() - 1]);
    out
}

/// Douglas-Peucker on an open polyline.
fn rdp(chain: &[Point2<f64>], tol: f64) -> Vec<Point2<f64>> {
    if chain.len() <= 2 {
        return chain.to_vec();
    }

    let (first, last) = (chain[0], chain[chain.len() - 1]);
    let mut max_dist = 0.0;
    let mut max_idx = 0;
    for (i, p) in chain.iter().enumerate().skip(1).take(chain.len() - 2) {
        let dist = point_segment_distance(*p, first, last);
        if dist > max_dist {
            max_dist = dist;
            max_idx = i;
        }
    }

    if max_dist <= tol {
        return vec![first, last];
    }

    let mut left = rdp(&chain[..=max_idx], tol);
    let right = rdp(&chain[max_idx..], tol);
    left.pop();
    left.extend(right);
    left
}

fn point_segment_distance(p: Point2<f64>, a: Point2<f64>, b: Point2<f64>) -> f64 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq < 1e-24 {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + t * ab)).norm()
}
