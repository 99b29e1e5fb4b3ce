//! Measurement pipeline.
//!
//! This module wires the stages together for each image of a batch:
//! preprocess → contour extraction → shape classification → distortion
//! correction → metric reconstruction → record numbering.
//!
//! The stage algorithms live in `crate::preprocess`, `crate::contour`,
//! `crate::shape`, `crate::pixelmap` and `crate::metric`. This layer owns call
//! order, per-image bookkeeping and logging.

mod result;
mod run;

#[cfg(test)]
mod tests;

pub use result::{BatchResult, FrameStats, ImageMeasurement};

pub(crate) use run::{measure_batch, measure_frame};
