use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

use super::distortion::{RadialTangentialDistortion, UndistortConfig};
use crate::MeasureError;

/// Pinhole camera intrinsics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CameraIntrinsics {
    /// Focal length in x (pixels).
    pub fx: f64,
    /// Focal length in y (pixels).
    pub fy: f64,
    /// Principal point x (pixels).
    pub cx: f64,
    /// Principal point y (pixels).
    pub cy: f64,
}

impl CameraIntrinsics {
    /// Returns `true` when all entries are finite and both focal lengths are positive.
    pub fn is_valid(self) -> bool {
        self.fx.is_finite()
            && self.fy.is_finite()
            && self.cx.is_finite()
            && self.cy.is_finite()
            && self.fx > 0.0
            && self.fy > 0.0
    }

    /// Convert pixel coordinates to normalized pinhole coordinates.
    pub fn pixel_to_normalized(self, pixel_xy: [f64; 2]) -> [f64; 2] {
        [
            (pixel_xy[0] - self.cx) / self.fx,
            (pixel_xy[1] - self.cy) / self.fy,
        ]
    }

    /// Convert normalized pinhole coordinates to pixel coordinates.
    pub fn normalized_to_pixel(self, normalized_xy: [f64; 2]) -> [f64; 2] {
        [
            self.fx * normalized_xy[0] + self.cx,
            self.fy * normalized_xy[1] + self.cy,
        ]
    }

    /// Intrinsic matrix `K` (zero skew).
    pub fn matrix(self) -> Matrix3<f64> {
        Matrix3::new(
            self.fx, 0.0, self.cx, //
            0.0, self.fy, self.cy, //
            0.0, 0.0, 1.0,
        )
    }

    /// Read intrinsics from a 3x3 matrix `K`.
    ///
    /// The last row must be `[0, 0, 1]` and skew must be zero.
    pub fn from_matrix(k: &Matrix3<f64>) -> Result<Self, MeasureError> {
        let last_row_ok = k[(2, 0)] == 0.0 && k[(2, 1)] == 0.0 && k[(2, 2)] == 1.0;
        if !last_row_ok {
            return Err(MeasureError::InvalidCalibration {
                reason: "intrinsic matrix last row must be [0, 0, 1]".to_string(),
            });
        }
        if k[(0, 1)] != 0.0 || k[(1, 0)] != 0.0 {
            return Err(MeasureError::InvalidCalibration {
                reason: "intrinsic matrix must have zero skew".to_string(),
            });
        }
        Ok(Self {
            fx: k[(0, 0)],
            fy: k[(1, 1)],
            cx: k[(0, 2)],
            cy: k[(1, 2)],
        })
    }
}

/// Calibrated camera: intrinsics plus radial-tangential distortion.
///
/// Supplied once per run and never mutated afterwards.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CalibrationModel {
    /// Camera intrinsics.
    pub intrinsics: CameraIntrinsics,
    /// Distortion coefficients.
    pub distortion: RadialTangentialDistortion,
}

impl CalibrationModel {
    /// Build a model from a 3x3 intrinsic matrix and a `(k1, k2, p1, p2, k3)` vector.
    pub fn from_matrix(k: &Matrix3<f64>, dist_coeffs: [f64; 5]) -> Result<Self, MeasureError> {
        Ok(Self {
            intrinsics: CameraIntrinsics::from_matrix(k)?,
            distortion: RadialTangentialDistortion::from_coeffs(dist_coeffs),
        })
    }

    /// Distortion-free pinhole camera.
    pub fn pinhole(fx: f64, fy: f64, cx: f64, cy: f64) -> Self {
        Self {
            intrinsics: CameraIntrinsics { fx, fy, cx, cy },
            distortion: RadialTangentialDistortion::default(),
        }
    }

    /// Reject models that would make metric reconstruction meaningless.
    pub fn validate(&self) -> Result<(), MeasureError> {
        let k = self.intrinsics;
        if !k.is_valid() {
            return Err(MeasureError::InvalidCalibration {
                reason: format!(
                    "focal lengths must be finite and > 0 (fx={}, fy={}, cx={}, cy={})",
                    k.fx, k.fy, k.cx, k.cy
                ),
            });
        }
        if self.distortion.coeffs().iter().any(|c| !c.is_finite()) {
            return Err(MeasureError::InvalidCalibration {
                reason: "distortion coefficients must be finite".to_string(),
            });
        }
        Ok(())
    }

    /// Distort an undistorted pixel point into image pixel coordinates.
    #[cfg(test)]
    pub(crate) fn distort_pixel(&self, undistorted_pixel_xy: [f64; 2]) -> Option<[f64; 2]> {
        let xn = self.intrinsics.pixel_to_normalized(undistorted_pixel_xy);
        let xd = self.distortion.distort_normalized(xn);
        let pix = self.intrinsics.normalized_to_pixel(xd);
        finite(pix)
    }

    /// Undistort a raw image pixel and re-project it with the same intrinsics.
    pub fn undistort_pixel(&self, distorted_pixel_xy: [f64; 2], cfg: UndistortConfig) -> Option<[f64; 2]> {
        let xd = self.intrinsics.pixel_to_normalized(distorted_pixel_xy);
        let xu = self.distortion.undistort_normalized(xd, cfg)?;
        finite(self.intrinsics.normalized_to_pixel(xu))
    }
}

fn finite(p: [f64; 2]) -> Option<[f64; 2]> {
    (p[0].is_finite() && p[1].is_finite()).then_some(p)
}
