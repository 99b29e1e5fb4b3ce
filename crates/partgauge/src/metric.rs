//! Pinhole back-projection of corrected shape geometry into millimeters.
//!
//! Parts lie in a fronto-parallel plane at the working distance `Z`, so a
//! normalized ray `(x, y)` hits the plane at `(x * Z, y * Z)`.

use crate::geometry::sort_by_angle;
use crate::pixelmap::CorrectedCircle;

/// Width and height of a rectangle from its normalized corners.
///
/// Corners are ordered by angle around their centroid before scaling, so
/// `width = |p0 - p1|` and `height = |p1 - p2|` always measure adjacent sides.
/// The quadrilateral is taken to be a rectangle; right angles are not checked.
pub fn rectangle_dimensions(normalized_corners: &[[f64; 2]; 4], working_distance_mm: f64) -> [f64; 2] {
    let p: Vec<[f64; 2]> = sort_by_angle(normalized_corners)
        .into_iter()
        .map(|[x, y]| [x * working_distance_mm, y * working_distance_mm])
        .collect();
    let width = (p[0][0] - p[1][0]).hypot(p[0][1] - p[1][1]);
    let height = (p[1][0] - p[2][0]).hypot(p[1][1] - p[2][1]);
    [width, height]
}

/// Mean corrected pixel radius, scaled by `Z / fx`.
///
/// Only `fx` is used; with anisotropic pixels the vertical extent is not
/// compensated. Returns `None` when there are no edge samples.
pub fn circle_radius_mm(circle: &CorrectedCircle, working_distance_mm: f64, fx: f64) -> Option<f64> {
    if circle.edge_px.is_empty() {
        return None;
    }
    let [cx, cy] = circle.center_px;
    let sum: f64 = circle
        .edge_px
        .iter()
        .map(|p| (p[0] - cx).hypot(p[1] - cy))
        .sum();
    let mean_px = sum / circle.edge_px.len() as f64;
    Some(mean_px * working_distance_mm / fx)
}
