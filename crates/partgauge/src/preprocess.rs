//! Grayscale conversion, denoising and fixed-threshold binarization.

use image::{DynamicImage, GrayImage, Luma, RgbImage};

/// Preprocessing parameters. All are fixed per run.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Median filter window side (odd).
    pub median_kernel: u32,
    /// Gaussian kernel side (odd).
    pub gaussian_kernel: u32,
    /// Gaussian sigma; `<= 0` derives it from `gaussian_kernel`.
    pub gaussian_sigma: f64,
    /// Pixels strictly above this become foreground (255).
    pub threshold: u8,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            median_kernel: 5,
            gaussian_kernel: 5,
            gaussian_sigma: 0.0,
            threshold: 30,
        }
    }
}

/// Preprocessor output for one image.
#[derive(Debug, Clone)]
pub struct Preprocessed {
    pub gray: GrayImage,
    /// Median + Gaussian filtered grayscale; background for annotation.
    pub denoised: GrayImage,
    pub mask: GrayImage,
}

/// Run the full preprocessing chain on one raw image.
pub fn preprocess(image: &DynamicImage, config: &PreprocessConfig) -> Preprocessed {
    let gray = to_gray(image);
    let median = imageproc::filter::median_filter(&gray, config.median_kernel / 2, config.median_kernel / 2);
    let denoised = gaussian_blur(&median, config.gaussian_kernel, config.gaussian_sigma);
    let mask = binarize(&denoised, config.threshold);
    Preprocessed {
        gray,
        denoised,
        mask,
    }
}

/// Single-channel 8-bit view of the input; copies grayscale input as-is.
///
/// Color input uses Rec. 601 weights (`0.299 R + 0.587 G + 0.114 B`) in
/// 14-bit fixed point with round-half-up. Alpha is ignored.
pub fn to_gray(image: &DynamicImage) -> GrayImage {
    match image {
        DynamicImage::ImageLuma8(g) => g.clone(),
        DynamicImage::ImageRgb8(rgb) => rgb_to_gray(rgb),
        other => rgb_to_gray(&other.to_rgb8()),
    }
}

const LUMA_SHIFT: u32 = 14;
const LUMA_R: u32 = 4899;
const LUMA_G: u32 = 9617;
const LUMA_B: u32 = 1868;

fn rgb_to_gray(rgb: &RgbImage) -> GrayImage {
    let round = 1u32 << (LUMA_SHIFT - 1);
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let v = (LUMA_R * r as u32 + LUMA_G * g as u32 + LUMA_B * b as u32 + round) >> LUMA_SHIFT;
        Luma([v as u8])
    })
}

/// `255` where `pixel > threshold`, else `0`.
pub fn binarize(gray: &GrayImage, threshold: u8) -> GrayImage {
    let mut out = gray.clone();
    for p in out.pixels_mut() {
        p.0[0] = if p.0[0] > threshold { 255 } else { 0 };
    }
    out
}

/// 1D Gaussian taps for an odd kernel `size`.
///
/// With `sigma <= 0` the small sizes use the fixed binomial tables
/// (`5 -> [1, 4, 6, 4, 1] / 16`) and larger ones use
/// `sigma = 0.3 * ((size - 1) * 0.5 - 1) + 0.8`.
pub fn gaussian_kernel(size: u32, sigma: f64) -> Vec<f64> {
    let size = size.max(1) | 1;
    if sigma <= 0.0 {
        match size {
            1 => return vec![1.0],
            3 => return vec![0.25, 0.5, 0.25],
            5 => return vec![0.0625, 0.25, 0.375, 0.25, 0.0625],
            7 => return vec![0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125],
            _ => {}
        }
    }
    let sigma = if sigma > 0.0 {
        sigma
    } else {
        0.3 * ((size as f64 - 1.0) * 0.5 - 1.0) + 0.8
    };
    let radius = (size / 2) as i64;
    let mut taps: Vec<f64> = (-radius..=radius)
        .map(|x| (-((x * x) as f64) / (2.0 * sigma * sigma)).exp())
        .collect();
    let sum: f64 = taps.iter().sum();
    for t in &mut taps {
        *t /= sum;
    }
    taps
}

/// Reflect-101 index mapping (`dcb|abcd|cba`).
fn reflect101(i: i64, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let period = 2 * len as i64 - 2;
    let r = i.rem_euclid(period) as usize;
    if r < len {
        r
    } else {
        2 * len - 2 - r
    }
}

/// Separable Gaussian smoothing with reflect-101 borders, rounded back to `u8`.
pub fn gaussian_blur(gray: &GrayImage, size: u32, sigma: f64) -> GrayImage {
    let (w, h) = gray.dimensions();
    if w == 0 || h == 0 {
        return gray.clone();
    }
    let taps = gaussian_kernel(size, sigma);
    let radius = (taps.len() / 2) as i64;
    let (wu, hu) = (w as usize, h as usize);
    let src = gray.as_raw();

    let mut horiz = vec![0.0f64; wu * hu];
    for y in 0..hu {
        let row = &src[y * wu..(y + 1) * wu];
        for x in 0..wu {
            horiz[y * wu + x] = taps
                .iter()
                .enumerate()
                .map(|(k, t)| t * row[reflect101(x as i64 + k as i64 - radius, wu)] as f64)
                .sum();
        }
    }

    let mut out = GrayImage::new(w, h);
    for y in 0..hu {
        for x in 0..wu {
            let v: f64 = taps
                .iter()
                .enumerate()
                .map(|(k, t)| t * horiz[reflect101(y as i64 + k as i64 - radius, hu) * wu + x])
                .sum();
            out.put_pixel(x as u32, y as u32, Luma([v.round().clamp(0.0, 255.0) as u8]));
        }
    }
    out
}
