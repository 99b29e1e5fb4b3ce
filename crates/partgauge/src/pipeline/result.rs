use image::GrayImage;

use crate::record::{Annotation, MeasurementRecord};

/// Contour bookkeeping for one image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameStats {
    /// All traced contours.
    pub contours: usize,
    /// Contours with a parent (the only ones classified).
    pub inner_contours: usize,
    /// Inner contours that passed the area gate.
    pub candidates: usize,
    /// Candidates classified as neither rectangle nor circle.
    pub rejected: usize,
    /// Accepted candidates dropped because undistortion failed.
    pub unmeasurable: usize,
}

/// Measurement output for a single image.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ImageMeasurement {
    /// 1-based position in the batch.
    pub image_id: usize,
    /// Image dimensions [width, height].
    pub image_size: [u32; 2],
    pub stats: FrameStats,
    /// Records in acceptance order.
    pub records: Vec<MeasurementRecord>,
    /// One annotation per record, same order.
    pub annotations: Vec<Annotation>,
    /// Denoised grayscale, the background for annotated output.
    #[serde(skip)]
    pub background: GrayImage,
}

/// Measurement output for a whole batch.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BatchResult {
    /// All records, ordered by global id.
    pub records: Vec<MeasurementRecord>,
    pub images: Vec<ImageMeasurement>,
}

impl BatchResult {
    pub(crate) fn from_images(images: Vec<ImageMeasurement>) -> Self {
        let records = images
            .iter()
            .flat_map(|m| m.records.iter().cloned())
            .collect();
        Self { records, images }
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}
