use serde::{Deserialize, Serialize};

use super::{CalibrationModel, UndistortConfig};

/// Settings for shape-level distortion correction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CorrectionConfig {
    /// Take every n-th contour point as a circle edge sample.
    pub edge_sample_stride: usize,
    /// Iterative inversion settings.
    pub undistort: UndistortConfig,
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self {
            edge_sample_stride: 10,
            undistort: UndistortConfig::default(),
        }
    }
}

/// Undistorted circle geometry in pixel units.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectedCircle {
    /// Corrected circle center (pixels).
    pub center_px: [f64; 2],
    /// Corrected boundary samples (pixels).
    pub edge_px: Vec<[f64; 2]>,
}

/// Maps raw shape geometry into the distortion-free pinhole frame.
#[derive(Debug, Clone, Copy)]
pub struct DistortionCorrector<'a> {
    camera: &'a CalibrationModel,
    config: CorrectionConfig,
}

impl<'a> DistortionCorrector<'a> {
    pub fn new(camera: &'a CalibrationModel, config: CorrectionConfig) -> Self {
        Self { camera, config }
    }

    fn undistort(&self, p: [f64; 2]) -> Option<[f64; 2]> {
        self.camera.undistort_pixel(p, self.config.undistort)
    }

    /// Undistort rectangle corners and return them as normalized pinhole rays.
    ///
    /// Corners keep their input order. Returns `None` if any corner cannot
    /// be inverted.
    pub fn rectangle_corners(&self, corners: &[[f64; 2]; 4]) -> Option<[[f64; 2]; 4]> {
        let mut out = [[0.0; 2]; 4];
        for (dst, &src) in out.iter_mut().zip(corners.iter()) {
            let px = self.undistort(src)?;
            *dst = self.camera.intrinsics.pixel_to_normalized(px);
        }
        Some(out)
    }

    /// Undistort a circle center and a strided subsample of its contour.
    ///
    /// Stays in pixel units; the metric stage divides by `fx`.
    pub fn circle(&self, center: [f64; 2], contour: &[[f64; 2]]) -> Option<CorrectedCircle> {
        let center_px = self.undistort(center)?;
        let edge_px = contour
            .iter()
            .step_by(self.config.edge_sample_stride.max(1))
            .map(|&p| self.undistort(p))
            .collect::<Option<Vec<_>>>()?;
        Some(CorrectedCircle { center_px, edge_px })
    }
}
