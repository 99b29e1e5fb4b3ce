//! Run configuration and the on-disk calibration profile.
//!
//! Calibration JSON follows the `partgauge.calibration.v1` schema:
//!
//! ```json
//! {
//!   "schema": "partgauge.calibration.v1",
//!   "camera_matrix": [[fx, 0, cx], [0, fy, cy], [0, 0, 1]],
//!   "dist_coeffs": [k1, k2, p1, p2, k3],
//!   "working_distance_mm": 1000.0
//! }
//! ```

use std::path::Path;

use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

use crate::pixelmap::{CalibrationModel, CorrectionConfig};
use crate::preprocess::PreprocessConfig;
use crate::shape::ClassifierConfig;
use crate::MeasureError;

const CALIBRATION_SCHEMA_V1: &str = "partgauge.calibration.v1";

/// Everything a [`crate::Measurer`] needs, fixed for its lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureConfig {
    pub calibration: CalibrationModel,
    /// Object-to-camera distance `Z` (millimeters).
    pub working_distance_mm: f64,
    #[serde(default)]
    pub preprocess: PreprocessConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub correction: CorrectionConfig,
}

impl MeasureConfig {
    /// Camera and depth with default stage settings.
    pub fn new(calibration: CalibrationModel, working_distance_mm: f64) -> Self {
        Self {
            calibration,
            working_distance_mm,
            preprocess: PreprocessConfig::default(),
            classifier: ClassifierConfig::default(),
            correction: CorrectionConfig::default(),
        }
    }

    /// Check the camera and working distance.
    pub fn validate(&self) -> Result<(), MeasureError> {
        self.calibration.validate()?;
        let z = self.working_distance_mm;
        if !z.is_finite() || z <= 0.0 {
            return Err(MeasureError::InvalidWorkingDistance(z));
        }
        Ok(())
    }
}

/// Calibration profile as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalibrationProfile {
    pub schema: String,
    /// Row-major 3x3 intrinsic matrix.
    pub camera_matrix: [[f64; 3]; 3],
    /// `[k1, k2, p1, p2, k3]`.
    pub dist_coeffs: [f64; 5],
    pub working_distance_mm: f64,
}

impl CalibrationProfile {
    /// Profile for an existing model.
    pub fn from_model(model: &CalibrationModel, working_distance_mm: f64) -> Self {
        let k = model.intrinsics.matrix();
        let mut camera_matrix = [[0.0; 3]; 3];
        for (r, row) in camera_matrix.iter_mut().enumerate() {
            for (c, v) in row.iter_mut().enumerate() {
                *v = k[(r, c)];
            }
        }
        Self {
            schema: CALIBRATION_SCHEMA_V1.to_string(),
            camera_matrix,
            dist_coeffs: model.distortion.coeffs(),
            working_distance_mm,
        }
    }

    /// Load and validate a profile from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, MeasureError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    pub fn from_json_str(data: &str) -> Result<Self, MeasureError> {
        let profile: Self = serde_json::from_str(data)?;
        profile.check_schema()?;
        profile.to_model()?;
        Ok(profile)
    }

    fn check_schema(&self) -> Result<(), MeasureError> {
        if self.schema != CALIBRATION_SCHEMA_V1 {
            return Err(MeasureError::Config(format!(
                "unsupported calibration schema '{}' (expected '{}')",
                self.schema, CALIBRATION_SCHEMA_V1
            )));
        }
        Ok(())
    }

    pub fn intrinsic_matrix(&self) -> Matrix3<f64> {
        let m = &self.camera_matrix;
        Matrix3::new(
            m[0][0], m[0][1], m[0][2], m[1][0], m[1][1], m[1][2], m[2][0], m[2][1], m[2][2],
        )
    }

    /// Validated camera model.
    pub fn to_model(&self) -> Result<CalibrationModel, MeasureError> {
        let model = CalibrationModel::from_matrix(&self.intrinsic_matrix(), self.dist_coeffs)?;
        model.validate()?;
        Ok(model)
    }

    /// Full run configuration with default stage settings.
    pub fn to_config(&self) -> Result<MeasureConfig, MeasureError> {
        let config = MeasureConfig::new(self.to_model()?, self.working_distance_mm);
        config.validate()?;
        Ok(config)
    }
}
