use serde::{Deserialize, Serialize};

/// Brown-Conrady radial-tangential distortion coefficients.
///
/// Coefficient order in array form follows the common `(k1, k2, p1, p2, k3)`
/// convention.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct RadialTangentialDistortion {
    /// Radial coefficient k1.
    pub k1: f64,
    /// Radial coefficient k2.
    pub k2: f64,
    /// Tangential coefficient p1.
    pub p1: f64,
    /// Tangential coefficient p2.
    pub p2: f64,
    /// Radial coefficient k3.
    pub k3: f64,
}

impl RadialTangentialDistortion {
    /// Build from a `(k1, k2, p1, p2, k3)` coefficient vector.
    pub fn from_coeffs(c: [f64; 5]) -> Self {
        Self {
            k1: c[0],
            k2: c[1],
            p1: c[2],
            p2: c[3],
            k3: c[4],
        }
    }

    /// Coefficients as a `(k1, k2, p1, p2, k3)` vector.
    pub fn coeffs(self) -> [f64; 5] {
        [self.k1, self.k2, self.p1, self.p2, self.k3]
    }

    /// Returns `true` when every coefficient is zero.
    pub fn is_identity(self) -> bool {
        self.coeffs().iter().all(|&c| c == 0.0)
    }

    /// Apply distortion to normalized coordinates.
    pub fn distort_normalized(self, normalized_xy: [f64; 2]) -> [f64; 2] {
        let x = normalized_xy[0];
        let y = normalized_xy[1];
        let r2 = x * x + y * y;
        let r4 = r2 * r2;
        let r6 = r4 * r2;
        let radial = 1.0 + self.k1 * r2 + self.k2 * r4 + self.k3 * r6;
        let x_tan = 2.0 * self.p1 * x * y + self.p2 * (r2 + 2.0 * x * x);
        let y_tan = self.p1 * (r2 + 2.0 * y * y) + 2.0 * self.p2 * x * y;
        [x * radial + x_tan, y * radial + y_tan]
    }

    /// Invert the distortion for a normalized point by fixed-point iteration.
    ///
    /// Returns `None` when the iteration leaves the finite domain.
    pub fn undistort_normalized(self, distorted_xy: [f64; 2], cfg: UndistortConfig) -> Option<[f64; 2]> {
        let [xd, yd] = distorted_xy;
        let mut x = xd;
        let mut y = yd;

        for _ in 0..cfg.max_iters.max(1) {
            let r2 = x * x + y * y;
            let r4 = r2 * r2;
            let r6 = r4 * r2;
            let radial = 1.0 + self.k1 * r2 + self.k2 * r4 + self.k3 * r6;
            if !radial.is_finite() || radial.abs() < 1e-12 {
                return None;
            }

            let dx_tan = 2.0 * self.p1 * x * y + self.p2 * (r2 + 2.0 * x * x);
            let dy_tan = self.p1 * (r2 + 2.0 * y * y) + 2.0 * self.p2 * x * y;
            let x_next = (xd - dx_tan) / radial;
            let y_next = (yd - dy_tan) / radial;

            if !x_next.is_finite() || !y_next.is_finite() {
                return None;
            }

            let dx = x_next - x;
            let dy = y_next - y;
            x = x_next;
            y = y_next;

            if (dx * dx + dy * dy).sqrt() <= cfg.eps.max(0.0) {
                break;
            }
        }

        Some([x, y])
    }
}

/// Distortion inversion settings used by iterative undistortion.
///
/// The default runs up to 15 fixed-point iterations with an early stop at
/// `eps`. OpenCV's `undistortPoints` stops after 5; set `max_iters: 5` to
/// reproduce its output for strong coefficients.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UndistortConfig {
    /// Maximum fixed-point iterations.
    pub max_iters: usize,
    /// Stop when coordinate update norm is below this threshold.
    pub eps: f64,
}

impl Default for UndistortConfig {
    fn default() -> Self {
        Self {
            max_iters: 15,
            eps: 1e-12,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coeff_vector_order_is_k1_k2_p1_p2_k3() {
        let d = RadialTangentialDistortion::from_coeffs([0.1, 0.2, 0.3, 0.4, 0.5]);
        assert_eq!(d.k1, 0.1);
        assert_eq!(d.p1, 0.3);
        assert_eq!(d.k3, 0.5);
        assert_eq!(d.coeffs(), [0.1, 0.2, 0.3, 0.4, 0.5]);
    }

    #[test]
    fn identity_model_leaves_points_untouched() {
        let d = RadialTangentialDistortion::default();
        assert!(d.is_identity());
        let p = [0.31, -0.27];
        assert_eq!(d.distort_normalized(p), p);
        assert_eq!(d.undistort_normalized(p, UndistortConfig::default()), Some(p));
    }

    #[test]
    fn undistort_inverts_mild_barrel() {
        let d = RadialTangentialDistortion {
            k1: -0.2,
            k2: 0.05,
            p1: 0.001,
            p2: -0.002,
            k3: 0.0,
        };
        let p = [0.25, -0.15];
        let u = d
            .undistort_normalized(d.distort_normalized(p), UndistortConfig::default())
            .unwrap();
        assert!((u[0] - p[0]).abs() < 1e-9);
        assert!((u[1] - p[1]).abs() < 1e-9);
    }

    #[test]
    fn iteration_budget_is_configurable() {
        let cfg = UndistortConfig::default();
        assert_eq!(cfg.max_iters, 15);
        let short: UndistortConfig = serde_json::from_str(r#"{"max_iters": 5}"#).unwrap();
        assert_eq!(short.max_iters, 5);
        assert_eq!(short.eps, cfg.eps);

        let d = RadialTangentialDistortion {
            k1: -0.3,
            k2: 0.1,
            p1: 0.002,
            p2: -0.001,
            k3: 0.0,
        };
        let p = [0.5, -0.4];
        let distorted = d.distort_normalized(p);
        let err = |c: UndistortConfig| {
            let u = d.undistort_normalized(distorted, c).unwrap();
            (u[0] - p[0]).hypot(u[1] - p[1])
        };
        assert!(err(cfg) < 1e-8, "{}", err(cfg));
        assert!(err(short) > err(cfg));
    }
}
