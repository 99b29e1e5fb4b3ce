use approx::assert_abs_diff_eq;
use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::test_utils::{
    draw_disk, draw_filled_rect, draw_plus, draw_rotated_rect, luma, unit_scale_config,
    white_canvas, PART,
};
use crate::{
    extract_contours, CalibrationModel, Dimensions, MeasureConfig, MeasureError, Measurer,
    Outline, RadialTangentialDistortion, ShapeKind,
};

fn measurer() -> Measurer {
    Measurer::new(unit_scale_config()).unwrap()
}

fn square_image(side: u32) -> GrayImage {
    let mut img = white_canvas(480, 480);
    draw_filled_rect(&mut img, 140, 140, side, side, PART);
    img
}

fn disk_image(radius: f32) -> GrayImage {
    let mut img = white_canvas(480, 480);
    draw_disk(&mut img, [240.0, 240.0], radius, PART);
    img
}

fn assert_within_pct(actual: f64, expected: f64, pct: f64) {
    let tol = expected * pct / 100.0;
    assert!(
        (actual - expected).abs() <= tol,
        "{actual} not within {pct}% of {expected}"
    );
}

#[test]
fn square_side_is_measured_within_one_percent() {
    let result = measurer().measure_batch(&[luma(square_image(200))]).unwrap();
    assert_eq!(result.records.len(), 1);
    let rec = &result.records[0];
    assert_eq!(rec.shape_kind(), ShapeKind::Rectangle);
    let Dimensions::Rectangle {
        width_mm,
        height_mm,
    } = rec.dimensions
    else {
        panic!("expected rectangle, got {:?}", rec.dimensions);
    };
    assert_within_pct(width_mm, 200.0, 1.0);
    assert_within_pct(height_mm, 200.0, 1.0);

    let ann = &result.images[0].annotations[0];
    assert_abs_diff_eq!(ann.anchor[0], 239.5, epsilon = 1.5);
    assert_abs_diff_eq!(ann.anchor[1], 239.5, epsilon = 1.5);
    assert!(matches!(ann.outline, Outline::Box { .. }));
}

#[test]
fn rotated_rectangle_is_measured_within_one_percent() {
    let mut img = white_canvas(480, 480);
    draw_rotated_rect(&mut img, [240.0, 240.0], [240.0, 150.0], 30.0, PART);
    let result = measurer().measure_batch(&[luma(img)]).unwrap();
    assert_eq!(result.records.len(), 1);
    let Dimensions::Rectangle {
        width_mm,
        height_mm,
    } = result.records[0].dimensions
    else {
        panic!("expected rectangle, got {:?}", result.records[0].dimensions);
    };
    assert_within_pct(width_mm.max(height_mm), 240.0, 1.0);
    assert_within_pct(width_mm.min(height_mm), 150.0, 1.0);

    let Outline::Box { corners } = result.images[0].annotations[0].outline else {
        panic!("rectangle outline must be its box");
    };
    let [a, b] = [corners[0], corners[1]];
    let side_deg = (b[1] - a[1]).atan2(b[0] - a[0]).to_degrees().rem_euclid(90.0);
    let d = (side_deg - 30.0).abs();
    let off = d.min(90.0 - d);
    assert!(off < 2.0, "box side at {side_deg} deg");
}

#[test]
fn disk_radius_is_measured_within_one_percent() {
    let result = measurer().measure_batch(&[luma(disk_image(120.0))]).unwrap();
    assert_eq!(result.records.len(), 1);
    let rec = &result.records[0];
    let Dimensions::Circle { radius_mm } = rec.dimensions else {
        panic!("expected circle, got {:?}", rec.dimensions);
    };
    assert_within_pct(radius_mm, 120.0, 1.0);

    let ann = &result.images[0].annotations[0];
    assert_eq!(ann.kind, ShapeKind::Circle);
    let Outline::Contour { points } = &ann.outline else {
        panic!("circle outline must be its contour");
    };
    assert!(points.len() > 8);
}

#[test]
fn rectangle_and_irregular_blob_yield_one_rectangle() {
    let mut img = white_canvas(480, 360);
    draw_filled_rect(&mut img, 40, 40, 150, 100, PART);
    draw_plus(&mut img, [330, 200], 120, 20);

    let result = measurer().measure_batch(&[luma(img)]).unwrap();
    let frame = &result.images[0];
    assert_eq!(frame.stats.candidates, 2);
    assert_eq!(frame.stats.rejected, 1);
    assert_eq!(result.records.len(), 1);

    let Dimensions::Rectangle {
        width_mm,
        height_mm,
    } = result.records[0].dimensions
    else {
        panic!("expected rectangle");
    };
    let long = width_mm.max(height_mm);
    let short = width_mm.min(height_mm);
    assert_within_pct(long, 150.0, 1.5);
    assert_within_pct(short, 100.0, 1.5);
}

#[test]
fn ids_run_across_images_and_restart_locally() {
    let mut second = white_canvas(400, 300);
    draw_disk(&mut second, [150.0, 140.0], 60.0, PART);
    let images = [luma(disk_image(80.0)), luma(second)];

    let result = measurer().measure_batch(&images).unwrap();
    let ids: Vec<_> = result
        .records
        .iter()
        .map(|r| (r.global_id, r.local_id, r.image_id))
        .collect();
    assert_eq!(ids, vec![(1, 1, 1), (2, 1, 2)]);
    assert_eq!(result.images[1].image_size, [400, 300]);
    assert!(result
        .records
        .iter()
        .all(|r| r.shape_kind() == ShapeKind::Circle));
}

#[test]
fn several_parts_in_one_image_number_in_sequence() {
    let mut img = white_canvas(640, 480);
    draw_filled_rect(&mut img, 40, 40, 120, 80, PART);
    draw_disk(&mut img, [400.0, 120.0], 60.0, PART);
    draw_filled_rect(&mut img, 200, 300, 90, 90, PART);
    let images = [luma(img.clone()), luma(img)];

    let result = measurer().measure_batch(&images).unwrap();
    assert_eq!(result.records.len(), 6);
    for (i, r) in result.records.iter().enumerate() {
        assert_eq!(r.global_id, i + 1);
        assert_eq!(r.local_id, i % 3 + 1);
        assert_eq!(r.image_id, i / 3 + 1);
    }
}

#[test]
fn same_image_in_separate_batches_gives_identical_records() {
    let mut img = white_canvas(480, 360);
    draw_filled_rect(&mut img, 40, 40, 150, 100, PART);
    draw_disk(&mut img, [340.0, 200.0], 70.0, PART);
    let m = measurer();
    let a = m.measure_batch(&[luma(img.clone())]).unwrap();
    let b = m.measure_batch(&[luma(img)]).unwrap();
    assert_eq!(a.records, b.records);
    assert_eq!(a.images[0].annotations, b.images[0].annotations);
}

#[test]
fn parts_without_enclosing_contour_are_ignored() {
    // Bright part on a dark backdrop: its contour has no parent.
    let mut img = GrayImage::new(300, 300);
    draw_filled_rect(&mut img, 50, 50, 150, 150, 255);
    let result = measurer().measure_batch(&[luma(img)]).unwrap();
    let frame = &result.images[0];
    assert_eq!(frame.stats.contours, 1);
    assert_eq!(frame.stats.inner_contours, 0);
    assert!(result.records.is_empty());
}

#[test]
fn record_count_is_bounded_by_large_inner_contours() {
    let mut rng = StdRng::seed_from_u64(42);
    let m = measurer();
    for _ in 0..5 {
        let mut img = white_canvas(400, 400);
        for _ in 0..6 {
            let x = rng.gen_range(10..330);
            let y = rng.gen_range(10..330);
            let w = rng.gen_range(4..60);
            let h = rng.gen_range(4..60);
            draw_filled_rect(&mut img, x, y, w, h, PART);
        }
        for _ in 0..3 {
            let c = [rng.gen_range(40.0..360.0), rng.gen_range(40.0..360.0)];
            draw_disk(&mut img, c, rng.gen_range(3.0..35.0), PART);
        }

        let result = m.measure_batch(&[luma(img)]).unwrap();
        let frame = &result.images[0];
        assert!(frame.records.len() <= frame.stats.candidates);
        assert!(frame.stats.candidates <= frame.stats.inner_contours);
        assert_eq!(
            frame.records.len() + frame.stats.rejected + frame.stats.unmeasurable,
            frame.stats.candidates
        );
        assert_eq!(frame.records.len(), frame.annotations.len());
    }
}

#[test]
fn inner_contour_count_matches_extractor() {
    let mut img = white_canvas(300, 200);
    draw_filled_rect(&mut img, 20, 20, 60, 60, PART);
    draw_filled_rect(&mut img, 150, 40, 80, 50, PART);
    let result = measurer().measure_batch(&[luma(img.clone())]).unwrap();

    let mask = crate::preprocess(&luma(img), &unit_scale_config().preprocess).mask;
    let set = extract_contours(&mask);
    assert_eq!(result.images[0].stats.inner_contours, set.inner().count());
    assert_eq!(result.images[0].stats.contours, set.len());
}

#[test]
fn failed_undistortion_skips_shape_without_consuming_ids() {
    let camera = CalibrationModel {
        distortion: RadialTangentialDistortion {
            k2: 1e305,
            ..Default::default()
        },
        ..CalibrationModel::pinhole(1.0, 1.0, 0.0, 0.0)
    };
    let broken = Measurer::new(MeasureConfig::new(camera, 1000.0)).unwrap();

    let mut img = white_canvas(480, 480);
    draw_filled_rect(&mut img, 120, 120, 100, 80, PART);
    draw_disk(&mut img, [350.0, 350.0], 60.0, PART);
    let bad = broken.measure_batch(&[luma(img)]).unwrap();
    assert!(bad.records.is_empty());
    assert_eq!(bad.images[0].stats.unmeasurable, 2);

    let good = measurer()
        .measure_batch(&[luma(disk_image(50.0))])
        .unwrap();
    assert_eq!(good.records[0].global_id, 1);
}

#[test]
fn color_input_matches_grayscale_input() {
    let gray = square_image(150);
    let rgb = DynamicImage::ImageLuma8(gray.clone()).to_rgb8();
    let m = measurer();
    let a = m.measure_batch(&[luma(gray)]).unwrap();
    let b = m
        .measure_batch(&[DynamicImage::ImageRgb8(rgb)])
        .unwrap();
    assert_eq!(a.records, b.records);
}

#[test]
fn colored_part_is_found_with_rec601_gray() {
    // Dark green maps to gray 26, just under the default threshold of 30.
    let mut img = RgbImage::from_pixel(480, 480, Rgb([255, 255, 255]));
    for y in 190..290 {
        for x in 190..290 {
            img.put_pixel(x, y, Rgb([0, 45, 0]));
        }
    }
    let result = measurer()
        .measure_batch(&[DynamicImage::ImageRgb8(img)])
        .unwrap();
    assert_eq!(result.records.len(), 1);
    let Dimensions::Rectangle {
        width_mm,
        height_mm,
    } = result.records[0].dimensions
    else {
        panic!("expected rectangle, got {:?}", result.records[0].dimensions);
    };
    // Gray 26 sits close to the threshold, so the blur erodes about two pixels per side.
    assert_within_pct(width_mm, 100.0, 4.0);
    assert_within_pct(height_mm, 100.0, 4.0);
}

#[test]
fn empty_inputs_are_errors() {
    let m = measurer();
    assert!(matches!(m.measure_batch(&[]), Err(MeasureError::EmptyInput)));

    let empty = luma(GrayImage::from_pixel(0, 0, Luma([0])));
    let err = m
        .measure_batch(&[luma(disk_image(40.0)), empty])
        .unwrap_err();
    assert!(matches!(err, MeasureError::EmptyImage { image_id: 2 }));
}

#[test]
fn background_is_denoised_grayscale() {
    let result = measurer().measure_batch(&[luma(square_image(100))]).unwrap();
    let bg = &result.images[0].background;
    assert_eq!(bg.dimensions(), (480, 480));
    assert_eq!(bg.get_pixel(0, 0).0[0], 255);
    assert_eq!(bg.get_pixel(190, 190).0[0], 0);
}
