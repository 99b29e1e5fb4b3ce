use imageproc::point::Point;
use serde::{Deserialize, Serialize};

use super::{dist, hull_points, to_f64};

/// Rotated rectangle: center, side lengths and orientation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotatedRect {
    /// Center (pixels).
    pub center: [f64; 2],
    /// `[width, height]`; width runs along `angle_deg`.
    pub size: [f64; 2],
    /// Direction of the width side in degrees.
    pub angle_deg: f64,
}

impl RotatedRect {
    pub fn area(&self) -> f64 {
        self.size[0] * self.size[1]
    }

    /// `max(w, h) / min(w, h)`, or 0 when the short side is 0.
    pub fn aspect_ratio(&self) -> f64 {
        let lo = self.size[0].min(self.size[1]);
        let hi = self.size[0].max(self.size[1]);
        if lo > 0.0 {
            hi / lo
        } else {
            0.0
        }
    }

    /// The four corners, walking around the rectangle.
    pub fn corners(&self) -> [[f64; 2]; 4] {
        let (s, c) = self.angle_deg.to_radians().sin_cos();
        let hw = 0.5 * self.size[0];
        let hh = 0.5 * self.size[1];
        let u = [c * hw, s * hw];
        let v = [-s * hh, c * hh];
        let [cx, cy] = self.center;
        [
            [cx - u[0] - v[0], cy - u[1] - v[1]],
            [cx + u[0] - v[0], cy + u[1] - v[1]],
            [cx + u[0] + v[0], cy + u[1] + v[1]],
            [cx - u[0] + v[0], cy - u[1] + v[1]],
        ]
    }

    /// Tightest box around `points` with its width side along `angle_deg`.
    fn fit(points: &[[f64; 2]], angle_deg: f64) -> Self {
        if points.is_empty() {
            return Self {
                center: [0.0, 0.0],
                size: [0.0, 0.0],
                angle_deg: 0.0,
            };
        }
        let (s, c) = angle_deg.to_radians().sin_cos();
        let (mut min_u, mut max_u) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut min_v, mut max_v) = (f64::INFINITY, f64::NEG_INFINITY);
        for p in points {
            let pu = p[0] * c + p[1] * s;
            let pv = -p[0] * s + p[1] * c;
            min_u = min_u.min(pu);
            max_u = max_u.max(pu);
            min_v = min_v.min(pv);
            max_v = max_v.max(pv);
        }
        let mu = 0.5 * (min_u + max_u);
        let mv = 0.5 * (min_v + max_v);
        Self {
            center: [mu * c - mv * s, mu * s + mv * c],
            size: [max_u - min_u, max_v - min_v],
            angle_deg,
        }
    }
}

/// Direction of the first non-degenerate side of a polygon, in degrees.
fn side_angle_deg(corners: &[[f64; 2]]) -> f64 {
    let n = corners.len();
    (0..n)
        .map(|i| (corners[i], corners[(i + 1) % n]))
        .find(|(a, b)| dist(*a, *b) > 0.0)
        .map_or(0.0, |(a, b)| (b[1] - a[1]).atan2(b[0] - a[0]).to_degrees())
}

/// Hull edges within this many degrees (mod 90) of the rounded box side are
/// tried as the exact side direction.
const SNAP_WINDOW_DEG: f64 = 2.0;

/// Smallest box flush with a hull edge near `approx_deg`.
fn snap_to_hull_edge(hull: &[[f64; 2]], approx_deg: f64) -> RotatedRect {
    let n = hull.len();
    (0..n)
        .filter(|&i| dist(hull[i], hull[(i + 1) % n]) > 0.0)
        .map(|i| side_angle_deg(&[hull[i], hull[(i + 1) % n]]))
        .filter(|deg| {
            let off = (deg - approx_deg).rem_euclid(90.0);
            off.min(90.0 - off) <= SNAP_WINDOW_DEG
        })
        .map(|deg| RotatedRect::fit(hull, deg))
        .min_by(|a, b| a.area().total_cmp(&b.area()))
        .unwrap_or_else(|| RotatedRect::fit(hull, approx_deg))
}

/// Minimum-area enclosing rectangle of integer contour points.
///
/// `imageproc::geometry::min_area_rect` picks the orientation. Its corners are
/// integer pixels, so the box is re-fitted in f64 along the nearby hull edge
/// instead of taken from the rounded corners.
pub fn min_area_rect(points: &[Point<i32>]) -> RotatedRect {
    let hull = hull_points(points);
    let pts: Vec<[f64; 2]> = hull.iter().map(|&p| to_f64(p)).collect();
    if hull.len() < 3 {
        return RotatedRect::fit(&pts, side_angle_deg(&pts));
    }
    let corners = imageproc::geometry::min_area_rect(hull.as_slice()).map(to_f64);
    snap_to_hull_edge(&pts, side_angle_deg(&corners))
}
