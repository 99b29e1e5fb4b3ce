//! Per-image orchestration: preprocess → contours → classify → correct → measure.

use image::DynamicImage;

use super::{FrameStats, ImageMeasurement};
use crate::config::MeasureConfig;
use crate::contour::{extract_contours, Contour};
use crate::metric::{circle_radius_mm, rectangle_dimensions};
use crate::pixelmap::DistortionCorrector;
use crate::preprocess::preprocess;
use crate::record::{Annotation, BatchContext, Dimensions, MeasurementRecord, Outline};
use crate::shape::{evaluate, ShapeCandidate, ShapeClass};
use crate::MeasureError;

/// Metric result for an accepted candidate, before numbering.
struct Measured {
    dimensions: Dimensions,
    outline: Outline,
}

fn measure_candidate(
    candidate: &ShapeCandidate,
    contour: &Contour,
    corrector: &DistortionCorrector<'_>,
    config: &MeasureConfig,
) -> Option<Measured> {
    let z = config.working_distance_mm;
    let d = &candidate.descriptors;
    match candidate.class {
        ShapeClass::Rectangle => {
            let corners = d.min_rect.corners();
            let normalized = corrector.rectangle_corners(&corners)?;
            let [width_mm, height_mm] = rectangle_dimensions(&normalized, z);
            Some(Measured {
                dimensions: Dimensions::Rectangle {
                    width_mm,
                    height_mm,
                },
                outline: Outline::Box { corners },
            })
        }
        ShapeClass::Circle => {
            let points = contour.points_f64();
            let corrected = corrector.circle(d.min_circle.center, &points)?;
            let radius_mm = circle_radius_mm(&corrected, z, config.calibration.intrinsics.fx)?;
            Some(Measured {
                dimensions: Dimensions::Circle { radius_mm },
                outline: Outline::Contour { points },
            })
        }
        ShapeClass::Rejected => None,
    }
}

/// Measure one image inside a batch.
///
/// Advances `ctx` to the next image before anything else, so an empty image
/// still occupies its image id.
pub(crate) fn measure_frame(
    ctx: &mut BatchContext,
    image: &DynamicImage,
    config: &MeasureConfig,
) -> Result<ImageMeasurement, MeasureError> {
    let image_id = ctx.begin_image();
    let (w, h) = (image.width(), image.height());
    if w == 0 || h == 0 {
        return Err(MeasureError::EmptyImage { image_id });
    }

    let pre = preprocess(image, &config.preprocess);
    let contours = extract_contours(&pre.mask);
    let corrector = DistortionCorrector::new(&config.calibration, config.correction);

    let mut stats = FrameStats {
        contours: contours.len(),
        ..FrameStats::default()
    };
    let mut records = Vec::new();
    let mut annotations = Vec::new();

    for (index, contour) in contours.inner() {
        stats.inner_contours += 1;
        let Some(candidate) = evaluate(index, contour, &config.classifier) else {
            continue;
        };
        stats.candidates += 1;

        if candidate.class == ShapeClass::Rejected {
            stats.rejected += 1;
            let d = &candidate.descriptors;
            tracing::debug!(
                "image {} contour {} rejected: area={:.1} rect={:.3} circ={:.3} aspect={:.2} vertices={}",
                image_id,
                index,
                d.area,
                d.rectangularity,
                d.circularity,
                d.aspect_ratio,
                d.vertices
            );
            continue;
        }

        let Some(measured) = measure_candidate(&candidate, contour, &corrector, config) else {
            stats.unmeasurable += 1;
            tracing::warn!(
                "image {} contour {}: undistortion failed, {:?} skipped",
                image_id,
                index,
                candidate.class
            );
            continue;
        };

        let (global_id, local_id) = ctx.issue();
        let kind = measured.dimensions.kind();
        records.push(MeasurementRecord {
            global_id,
            local_id,
            image_id,
            dimensions: measured.dimensions,
        });
        annotations.push(Annotation {
            global_id,
            local_id,
            kind,
            anchor: candidate.anchor,
            outline: measured.outline,
        });
    }

    tracing::info!(
        "image {}: {} contours, {} candidates, {} measured",
        image_id,
        stats.contours,
        stats.candidates,
        records.len()
    );

    Ok(ImageMeasurement {
        image_id,
        image_size: [w, h],
        stats,
        records,
        annotations,
        background: pre.denoised,
    })
}

/// Measure every image of a batch with fresh numbering.
pub(crate) fn measure_batch(
    images: &[DynamicImage],
    config: &MeasureConfig,
) -> Result<super::BatchResult, MeasureError> {
    if images.is_empty() {
        return Err(MeasureError::EmptyInput);
    }
    let mut ctx = BatchContext::new();
    let frames = images
        .iter()
        .map(|img| measure_frame(&mut ctx, img, config))
        .collect::<Result<Vec<_>, _>>()?;
    tracing::info!("batch: {} images, {} records", frames.len(), ctx.issued());
    Ok(super::BatchResult::from_images(frames))
}
