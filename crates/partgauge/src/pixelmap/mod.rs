//! Camera model and pixel undistortion.
//!
//! Raw image pixels are distorted by the lens. [`DistortionCorrector`] maps the
//! pixel geometry of accepted shapes into the ideal pinhole frame before the
//! metric stage consumes it.

mod cameramodel;
mod correct;
mod distortion;

pub use cameramodel::{CalibrationModel, CameraIntrinsics};
pub use correct::{CorrectedCircle, CorrectionConfig, DistortionCorrector};
pub use distortion::{RadialTangentialDistortion, UndistortConfig};
