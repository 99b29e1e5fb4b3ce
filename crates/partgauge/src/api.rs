//! High-level measurement API.
//!
//! [`Measurer`] is the primary entry point. It owns a validated
//! [`MeasureConfig`] and measures batches of images against it.

use std::path::Path;

use image::DynamicImage;

use crate::config::{CalibrationProfile, MeasureConfig};
use crate::pipeline::{self, BatchResult, ImageMeasurement};
use crate::record::BatchContext;
use crate::MeasureError;

/// Primary measurement interface.
///
/// Create once, measure many batches. All methods take `&self`; numbering
/// state lives in the [`BatchContext`] of each batch.
///
/// # Examples
///
/// ```no_run
/// use partgauge::{CalibrationModel, MeasureConfig, Measurer};
///
/// let camera = CalibrationModel::pinhole(1200.0, 1200.0, 640.0, 480.0);
/// let measurer = Measurer::new(MeasureConfig::new(camera, 500.0)).unwrap();
/// let image = image::open("part.png").unwrap();
/// let result = measurer.measure_batch(&[image]).unwrap();
/// println!("Measured {} parts", result.records.len());
/// ```
#[derive(Debug, Clone)]
pub struct Measurer {
    config: MeasureConfig,
}

impl Measurer {
    /// Validate the calibration and working distance and build a measurer.
    pub fn new(config: MeasureConfig) -> Result<Self, MeasureError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Load a calibration profile and build a measurer with default stage settings.
    pub fn from_calibration_file(path: &Path) -> Result<Self, MeasureError> {
        Self::new(CalibrationProfile::from_json_file(path)?.to_config()?)
    }

    /// Access the configuration.
    pub fn config(&self) -> &MeasureConfig {
        &self.config
    }

    /// Measure a batch. Global ids start at 1 and image ids follow slice order.
    pub fn measure_batch(&self, images: &[DynamicImage]) -> Result<BatchResult, MeasureError> {
        pipeline::measure_batch(images, &self.config)
    }

    /// Measure one image as part of a caller-driven batch.
    pub fn measure_image(
        &self,
        ctx: &mut BatchContext,
        image: &DynamicImage,
    ) -> Result<ImageMeasurement, MeasureError> {
        pipeline::measure_frame(ctx, image, &self.config)
    }
}
