//! Hierarchical contour extraction from a binary mask.
//!
//! Border following runs over non-zero pixels with the image frame treated as
//! background, so a bright backdrop yields one parentless outer contour and
//! each dark part inside it yields a hole contour whose parent is the backdrop.
//! Only parented contours are measured.

use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use imageproc::point::Point;

/// Whether a contour bounds a foreground region from outside or a hole inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderKind {
    Outer,
    Hole,
}

/// One closed contour in the detection arena.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    /// Vertices in traversal order (straight runs compressed).
    pub points: Vec<Point<i32>>,
    /// Index of the enclosing contour in the same arena.
    pub parent: Option<usize>,
    pub border: BorderKind,
}

impl Contour {
    pub fn points_f64(&self) -> Vec<[f64; 2]> {
        self.points.iter().map(|p| [p.x as f64, p.y as f64]).collect()
    }

    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }
}

/// All contours of one mask, in raster detection order.
#[derive(Debug, Clone, Default)]
pub struct ContourSet {
    contours: Vec<Contour>,
}

impl ContourSet {
    pub fn len(&self) -> usize {
        self.contours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Contour> {
        self.contours.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Contour> {
        self.contours.iter()
    }

    /// Contours with a parent, with their arena index.
    pub fn inner(&self) -> impl Iterator<Item = (usize, &Contour)> {
        self.contours
            .iter()
            .enumerate()
            .filter(|(_, c)| c.has_parent())
    }
}

/// Trace every contour of `mask` and compress straight runs.
///
/// The mask is traced inside a one-pixel zero border, so foreground touching
/// the image edge still gets an outer contour. Points are reported in the
/// coordinates of `mask`.
pub fn extract_contours(mask: &GrayImage) -> ContourSet {
    let (w, h) = mask.dimensions();
    let mut padded = GrayImage::new(w + 2, h + 2);
    image::imageops::replace(&mut padded, mask, 1, 1);

    let contours = find_contours::<i32>(&padded)
        .into_iter()
        .map(|c| Contour {
            points: compress_runs(&unpad(&c.points)),
            parent: c.parent,
            border: match c.border_type {
                BorderType::Outer => BorderKind::Outer,
                BorderType::Hole => BorderKind::Hole,
            },
        })
        .collect();
    ContourSet { contours }
}

fn unpad(points: &[Point<i32>]) -> Vec<Point<i32>> {
    points.iter().map(|p| Point::new(p.x - 1, p.y - 1)).collect()
}

/// Drop vertices that continue the previous step direction.
///
/// Only the end points of horizontal, vertical and diagonal runs remain.
fn compress_runs(points: &[Point<i32>]) -> Vec<Point<i32>> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }
    let step = |a: Point<i32>, b: Point<i32>| ((b.x - a.x).signum(), (b.y - a.y).signum());

    let kept: Vec<Point<i32>> = (0..n)
        .filter(|&i| {
            let prev = points[(i + n - 1) % n];
            let cur = points[i];
            let next = points[(i + 1) % n];
            step(prev, cur) != step(cur, next)
        })
        .map(|i| points[i])
        .collect();

    if kept.is_empty() {
        // Every step identical cannot close a loop; keep the raw trace.
        points.to_vec()
    } else {
        kept
    }
}
