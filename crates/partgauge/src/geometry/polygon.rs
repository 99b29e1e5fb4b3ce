use imageproc::geometry::approximate_polygon_dp;
use imageproc::point::Point;

use super::{dist, to_f64};

/// Zero- and first-order moments of a closed polygon (Green's theorem).
///
/// `m00` is the signed area; its sign follows the traversal direction.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PolygonMoments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
}

pub fn polygon_moments(points: &[[f64; 2]]) -> PolygonMoments {
    let n = points.len();
    if n < 3 {
        return PolygonMoments::default();
    }
    let mut m = PolygonMoments::default();
    for i in 0..n {
        let [x0, y0] = points[i];
        let [x1, y1] = points[(i + 1) % n];
        let a = x0 * y1 - x1 * y0;
        m.m00 += a;
        m.m10 += (x0 + x1) * a;
        m.m01 += (y0 + y1) * a;
    }
    m.m00 *= 0.5;
    m.m10 /= 6.0;
    m.m01 /= 6.0;
    m
}

/// Unsigned polygon area (shoelace).
pub fn polygon_area(points: &[[f64; 2]]) -> f64 {
    polygon_moments(points).m00.abs()
}

/// Area centroid, or the first vertex when the polygon has no area.
pub fn centroid_or_first(points: &[[f64; 2]]) -> Option<[f64; 2]> {
    let m = polygon_moments(points);
    if m.m00 != 0.0 {
        Some([m.m10 / m.m00, m.m01 / m.m00])
    } else {
        points.first().copied()
    }
}

/// Douglas-Peucker approximation of a closed curve.
///
/// The curve is split at the first vertex and the vertex farthest from it;
/// both halves go through `imageproc::geometry::approximate_polygon_dp` as
/// open chains. Output keeps input order and never repeats a vertex.
pub fn approx_polygon_closed(points: &[Point<i32>], epsilon: f64) -> Vec<Point<i32>> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let origin = to_f64(points[0]);
    let (far, far_d) = (1..n)
        .map(|i| (i, dist(origin, to_f64(points[i]))))
        .fold((0, 0.0), |best, cur| if cur.1 > best.1 { cur } else { best });
    if far_d <= 0.0 {
        return vec![points[0]];
    }
    if epsilon <= 0.0 {
        return points.to_vec();
    }

    let second: Vec<Point<i32>> = points[far..].iter().copied().chain([points[0]]).collect();
    let mut out = approximate_polygon_dp(&points[..=far], epsilon, false);
    out.pop();
    out.extend(approximate_polygon_dp(&second, epsilon, false));
    out.pop();
    out
}

/// Order points by angle around their mean.
///
/// The result starts at the smallest `atan2(y - cy, x - cx)` and follows
/// increasing angle, so it does not depend on input order (barring ties).
pub fn sort_by_angle(points: &[[f64; 2]]) -> Vec<[f64; 2]> {
    if points.is_empty() {
        return Vec::new();
    }
    let n = points.len() as f64;
    let cx = points.iter().map(|p| p[0]).sum::<f64>() / n;
    let cy = points.iter().map(|p| p[1]).sum::<f64>() / n;

    let mut out = points.to_vec();
    out.sort_by(|a, b| {
        let ta = (a[1] - cy).atan2(a[0] - cx);
        let tb = (b[1] - cy).atan2(b[0] - cx);
        ta.total_cmp(&tb)
    });
    out
}
