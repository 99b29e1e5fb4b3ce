use imageproc::point::Point;
use serde::{Deserialize, Serialize};

use super::{dist, hull_points, to_f64};

/// Circle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: [f64; 2],
    pub radius: f64,
}

impl Circle {
    pub fn area(&self) -> f64 {
        std::f64::consts::PI * self.radius * self.radius
    }

    fn contains(&self, p: [f64; 2]) -> bool {
        dist(self.center, p) <= self.radius * (1.0 + 1e-9) + 1e-9
    }

    fn from_pair(a: [f64; 2], b: [f64; 2]) -> Self {
        Self {
            center: [0.5 * (a[0] + b[0]), 0.5 * (a[1] + b[1])],
            radius: 0.5 * dist(a, b),
        }
    }

    fn from_triple(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> Self {
        let bx = b[0] - a[0];
        let by = b[1] - a[1];
        let cx = c[0] - a[0];
        let cy = c[1] - a[1];
        let d = 2.0 * (bx * cy - by * cx);
        if d.abs() < 1e-12 {
            // Collinear: the widest pair spans the other point.
            return [Self::from_pair(a, b), Self::from_pair(a, c), Self::from_pair(b, c)]
                .into_iter()
                .max_by(|l, r| l.radius.total_cmp(&r.radius))
                .unwrap_or_else(|| Self::from_pair(a, b));
        }
        let b2 = bx * bx + by * by;
        let c2 = cx * cx + cy * cy;
        let ux = (cy * b2 - by * c2) / d;
        let uy = (bx * c2 - cx * b2) / d;
        Self {
            center: [a[0] + ux, a[1] + uy],
            radius: ux.hypot(uy),
        }
    }
}

/// Smallest circle enclosing all points (incremental Welzl on the hull).
///
/// Empty input yields a zero circle at the origin.
pub fn min_enclosing_circle(points: &[Point<i32>]) -> Circle {
    let pts: Vec<[f64; 2]> = hull_points(points).into_iter().map(to_f64).collect();
    let Some(&first) = pts.first() else {
        return Circle {
            center: [0.0, 0.0],
            radius: 0.0,
        };
    };

    let mut c = Circle {
        center: first,
        radius: 0.0,
    };
    for i in 1..pts.len() {
        if c.contains(pts[i]) {
            continue;
        }
        c = Circle {
            center: pts[i],
            radius: 0.0,
        };
        for j in 0..i {
            if c.contains(pts[j]) {
                continue;
            }
            c = Circle::from_pair(pts[i], pts[j]);
            for k in 0..j {
                if !c.contains(pts[k]) {
                    c = Circle::from_triple(pts[i], pts[j], pts[k]);
                }
            }
        }
    }
    c
}
