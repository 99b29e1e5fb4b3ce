//! Planar geometry over contour point sets.
//!
//! Contour-facing routines take integer `Point<i32>` pixels and lean on
//! `imageproc::geometry` for the hull, box and polygon searches; results are
//! `[f64; 2]` in image coordinates (x right, y down).

mod circle;
mod polygon;
mod rect;

use imageproc::point::Point;

pub use circle::{min_enclosing_circle, Circle};
pub use polygon::{
    approx_polygon_closed, centroid_or_first, polygon_area, polygon_moments, sort_by_angle,
    PolygonMoments,
};
pub use rect::{min_area_rect, RotatedRect};

#[inline]
pub(crate) fn dist(a: [f64; 2], b: [f64; 2]) -> f64 {
    (a[0] - b[0]).hypot(a[1] - b[1])
}

#[inline]
pub(crate) fn to_f64(p: Point<i32>) -> [f64; 2] {
    [p.x as f64, p.y as f64]
}

/// Convex hull via imageproc; inputs too small for a hull come back
/// sorted and deduplicated.
pub(crate) fn hull_points(points: &[Point<i32>]) -> Vec<Point<i32>> {
    let mut distinct = points.to_vec();
    distinct.sort_by_key(|p| (p.x, p.y));
    distinct.dedup();
    if distinct.len() < 3 {
        return distinct;
    }
    imageproc::geometry::convex_hull(distinct.as_slice())
}
