//! Measurement records, batch numbering and annotation descriptors.

use serde::{Deserialize, Serialize};

/// Accepted part shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Rectangle,
    Circle,
}

impl ShapeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rectangle => "rectangle",
            Self::Circle => "circle",
        }
    }
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical dimensions in millimeters, by shape kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Dimensions {
    Rectangle { width_mm: f64, height_mm: f64 },
    Circle { radius_mm: f64 },
}

impl Dimensions {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Rectangle { .. } => ShapeKind::Rectangle,
            Self::Circle { .. } => ShapeKind::Circle,
        }
    }
}

/// One measured part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    /// 1-based, gap-free across the batch.
    pub global_id: usize,
    /// 1-based, restarts per image.
    pub local_id: usize,
    /// 1-based position of the source image in the batch.
    pub image_id: usize,
    pub dimensions: Dimensions,
}

impl MeasurementRecord {
    pub fn shape_kind(&self) -> ShapeKind {
        self.dimensions.kind()
    }
}

/// Numbering state for one batch.
///
/// Ids are only handed out by [`BatchContext::issue`], so rejected or
/// unmeasurable shapes never consume a number.
#[derive(Debug, Clone, Default)]
pub struct BatchContext {
    image_id: usize,
    next_global: usize,
    next_local: usize,
}

impl BatchContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to the next image and restart local numbering. Returns its id.
    pub fn begin_image(&mut self) -> usize {
        self.image_id += 1;
        self.next_local = 0;
        self.image_id
    }

    /// Current image id (0 before the first `begin_image`).
    pub fn image_id(&self) -> usize {
        self.image_id
    }

    /// Next `(global_id, local_id)` pair.
    pub fn issue(&mut self) -> (usize, usize) {
        self.next_global += 1;
        self.next_local += 1;
        (self.next_global, self.next_local)
    }

    /// Number of global ids handed out so far.
    pub fn issued(&self) -> usize {
        self.next_global
    }
}

/// Shape outline to draw for a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outline {
    /// Minimum-area box corners (pixels), walking around the box.
    Box { corners: [[f64; 2]; 4] },
    /// Raw contour polygon (pixels).
    Contour { points: Vec<[f64; 2]> },
}

/// Everything a renderer needs to label one record on its image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub global_id: usize,
    pub local_id: usize,
    pub kind: ShapeKind,
    /// Label position (pixels).
    pub anchor: [f64; 2],
    pub outline: Outline,
}

impl Annotation {
    pub fn global_label(&self) -> String {
        format!("G{}", self.global_id)
    }

    pub fn local_label(&self) -> String {
        format!("L{}", self.local_id)
    }
}
