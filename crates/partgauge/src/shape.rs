//! Per-contour shape descriptors and the rectangle / circle decision.

use imageproc::geometry::arc_length;
use serde::{Deserialize, Serialize};

use crate::contour::Contour;
use crate::geometry::{
    approx_polygon_closed, centroid_or_first, min_area_rect, min_enclosing_circle, polygon_area,
    Circle, RotatedRect,
};

/// Named thresholds of the shape decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Contours with `|area|` below this (px²) are never classified.
    pub min_area: f64,
    /// Rectangle requires `rectangularity >` this.
    pub min_rectangularity: f64,
    /// Rectangle requires `aspect_ratio <` this.
    pub max_aspect_ratio: f64,
    /// Inclusive vertex-count window for rectangles.
    pub min_vertices: usize,
    pub max_vertices: usize,
    /// Circle requires `circularity >` this.
    pub min_circularity: f64,
    /// Polygon approximation tolerance as a fraction of the closed perimeter.
    pub approx_epsilon_frac: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            min_area: 100.0,
            min_rectangularity: 0.85,
            max_aspect_ratio: 3.0,
            min_vertices: 4,
            max_vertices: 6,
            min_circularity: 0.85,
            approx_epsilon_frac: 0.03,
        }
    }
}

/// Outcome of the shape decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeClass {
    Rectangle,
    Circle,
    Rejected,
}

/// Geometric descriptors of one contour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeDescriptors {
    /// Unsigned polygon area (px²).
    pub area: f64,
    pub min_rect: RotatedRect,
    pub min_circle: Circle,
    /// `area / min_rect.area()`, 0 for a degenerate box.
    pub rectangularity: f64,
    /// `area / min_circle.area()`, 0 for a zero radius.
    pub circularity: f64,
    pub aspect_ratio: f64,
    /// Vertex count of the Douglas-Peucker approximation.
    pub vertices: usize,
}

/// A contour that passed the area gate, with its decision.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeCandidate {
    /// Index into the frame's contour arena.
    pub contour_index: usize,
    pub descriptors: ShapeDescriptors,
    pub class: ShapeClass,
    /// Label position: area centroid, or the first contour vertex.
    pub anchor: [f64; 2],
}

/// Compute descriptors, or `None` when the contour is below `min_area`.
pub fn describe(contour: &Contour, config: &ClassifierConfig) -> Option<ShapeDescriptors> {
    let points = contour.points_f64();
    let area = polygon_area(&points);
    if area < config.min_area {
        return None;
    }

    let min_rect = min_area_rect(&contour.points);
    let box_area = min_rect.area();
    let rectangularity = if box_area > 0.0 { area / box_area } else { 0.0 };

    let min_circle = min_enclosing_circle(&contour.points);
    let circle_area = min_circle.area();
    let circularity = if circle_area > 0.0 {
        area / circle_area
    } else {
        0.0
    };

    let perimeter = arc_length(&contour.points, true);
    let vertices =
        approx_polygon_closed(&contour.points, config.approx_epsilon_frac * perimeter).len();

    Some(ShapeDescriptors {
        area,
        min_rect,
        min_circle,
        rectangularity,
        circularity,
        aspect_ratio: min_rect.aspect_ratio(),
        vertices,
    })
}

/// Rectangle rules first, then circle, else reject.
pub fn classify(d: &ShapeDescriptors, config: &ClassifierConfig) -> ShapeClass {
    let is_rectangle = d.rectangularity > config.min_rectangularity
        && d.aspect_ratio < config.max_aspect_ratio
        && (config.min_vertices..=config.max_vertices).contains(&d.vertices);
    if is_rectangle {
        ShapeClass::Rectangle
    } else if d.circularity > config.min_circularity {
        ShapeClass::Circle
    } else {
        ShapeClass::Rejected
    }
}

/// Describe and classify one arena contour.
pub fn evaluate(
    contour_index: usize,
    contour: &Contour,
    config: &ClassifierConfig,
) -> Option<ShapeCandidate> {
    let descriptors = describe(contour, config)?;
    let anchor = centroid_or_first(&contour.points_f64())?;
    Some(ShapeCandidate {
        contour_index,
        descriptors,
        class: classify(&descriptors, config),
        anchor,
    })
}
