use thiserror::Error;

/// Errors reported by the measurement pipeline.
///
/// Degenerate geometry (zero-area boxes, zero-radius circles, zero-mass
/// contours) is not an error: such candidates are rejected locally.
#[derive(Debug, Error)]
pub enum MeasureError {
    /// The batch contained no images.
    #[error("no images to process")]
    EmptyInput,
    /// The calibration model cannot produce meaningful metric output.
    #[error("invalid calibration: {reason}")]
    InvalidCalibration { reason: String },
    /// Working distance must be finite and positive (millimeters).
    #[error("invalid working distance: {0} mm (must be finite and > 0)")]
    InvalidWorkingDistance(f64),
    /// An image in the batch has zero width or height.
    #[error("image {image_id} is empty")]
    EmptyImage { image_id: usize },
    /// Calibration profile could not be parsed or has the wrong schema.
    #[error("config error: {0}")]
    Config(String),
    /// Calibration profile could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for MeasureError {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e.to_string())
    }
}
