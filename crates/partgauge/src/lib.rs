//! partgauge: dimensional measurement of flat parts from calibrated images.
//!
//! Parts are imaged from a known working distance against a bright backdrop.
//! The pipeline stages are:
//!
//! 1. **Preprocess** – grayscale, median + Gaussian denoising, fixed threshold.
//! 2. **Contours** – hierarchical border following; only contours nested in
//!    another contour are considered.
//! 3. **Shape** – minimum-area box, enclosing circle and polygon descriptors,
//!    rule-based rectangle / circle decision.
//! 4. **Correction** – lens undistortion of box corners and circle edge samples.
//! 5. **Metric** – pinhole back-projection at the working distance to
//!    millimeters.
//! 6. **Records** – batch-global and per-image numbering plus annotations.
//!
//! # Public API
//! - [`Measurer`] as the primary entry point
//! - [`MeasureConfig`] and [`CalibrationProfile`] for setup
//! - result, record and report types

mod api;
mod config;
mod contour;
mod error;
pub mod geometry;
mod metric;
mod pipeline;
mod pixelmap;
mod preprocess;
pub mod report;
mod record;
mod shape;

#[cfg(test)]
pub(crate) mod test_utils;

pub use api::Measurer;
pub use config::{CalibrationProfile, MeasureConfig};
pub use contour::{extract_contours, BorderKind, Contour, ContourSet};
pub use error::MeasureError;
pub use metric::{circle_radius_mm, rectangle_dimensions};
pub use pipeline::{BatchResult, FrameStats, ImageMeasurement};
pub use pixelmap::{
    CalibrationModel, CameraIntrinsics, CorrectedCircle, CorrectionConfig, DistortionCorrector,
    RadialTangentialDistortion, UndistortConfig,
};
pub use preprocess::{preprocess, PreprocessConfig, Preprocessed};
pub use record::{Annotation, BatchContext, Dimensions, MeasurementRecord, Outline, ShapeKind};
pub use shape::{classify, describe, ClassifierConfig, ShapeCandidate, ShapeClass, ShapeDescriptors};
