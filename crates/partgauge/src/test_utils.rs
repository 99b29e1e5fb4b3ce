//! Synthetic part images for unit tests.
//!
//! Parts are dark on a bright backdrop, matching the back-lit setup the
//! pipeline expects.

use image::{DynamicImage, GrayImage, Luma};

use crate::{CalibrationModel, MeasureConfig};

pub(crate) const BACKDROP: u8 = 255;
pub(crate) const PART: u8 = 0;

pub(crate) fn white_canvas(w: u32, h: u32) -> GrayImage {
    GrayImage::from_pixel(w, h, Luma([BACKDROP]))
}

/// Fill the axis-aligned block `[x, x + w) × [y, y + h)` with `value`.
pub(crate) fn draw_filled_rect(img: &mut GrayImage, x: u32, y: u32, w: u32, h: u32, value: u8) {
    for yy in y..(y + h).min(img.height()) {
        for xx in x..(x + w).min(img.width()) {
            img.put_pixel(xx, yy, Luma([value]));
        }
    }
}

/// Fill pixels whose center lies within `radius` of `center`.
pub(crate) fn draw_disk(img: &mut GrayImage, center: [f32; 2], radius: f32, value: u8) {
    let (w, h) = img.dimensions();
    for y in 0..h {
        for x in 0..w {
            let dx = x as f32 - center[0];
            let dy = y as f32 - center[1];
            if dx * dx + dy * dy <= radius * radius {
                img.put_pixel(x, y, Luma([value]));
            }
        }
    }
}

/// Fill pixels whose center lies inside a `size` rectangle centered at
/// `center` and rotated by `angle_deg`.
pub(crate) fn draw_rotated_rect(
    img: &mut GrayImage,
    center: [f64; 2],
    size: [f64; 2],
    angle_deg: f64,
    value: u8,
) {
    let (s, c) = angle_deg.to_radians().sin_cos();
    let (w, h) = img.dimensions();
    for y in 0..h {
        for x in 0..w {
            let dx = x as f64 - center[0];
            let dy = y as f64 - center[1];
            let u = dx * c + dy * s;
            let v = -dx * s + dy * c;
            if u.abs() <= 0.5 * size[0] && v.abs() <= 0.5 * size[1] {
                img.put_pixel(x, y, Luma([value]));
            }
        }
    }
}

/// Plus-shaped blob: two `arm_len × arm_width` bars crossing at `center`.
pub(crate) fn draw_plus(img: &mut GrayImage, center: [u32; 2], arm_len: u32, arm_width: u32) {
    let [cx, cy] = center;
    draw_filled_rect(img, cx - arm_len / 2, cy - arm_width / 2, arm_len, arm_width, PART);
    draw_filled_rect(img, cx - arm_width / 2, cy - arm_len / 2, arm_width, arm_len, PART);
}

pub(crate) fn luma(img: GrayImage) -> DynamicImage {
    DynamicImage::ImageLuma8(img)
}

/// Distortion-free camera with `fx = fy = Z`, so one pixel maps to one millimeter.
pub(crate) fn unit_scale_config() -> MeasureConfig {
    MeasureConfig::new(CalibrationModel::pinhole(1000.0, 1000.0, 320.0, 240.0), 1000.0)
}
