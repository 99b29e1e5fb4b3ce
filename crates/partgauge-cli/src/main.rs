//! partgauge CLI: measure flat parts in calibrated camera images.

use clap::{Args, Parser, Subcommand};
use image::{GrayImage, Rgb, RgbImage};
use imageproc::drawing::{draw_cross_mut, draw_line_segment_mut};
use std::path::{Path, PathBuf};

use partgauge::report::render_text_report;
use partgauge::{
    Annotation, CalibrationModel, CalibrationProfile, CameraIntrinsics, ImageMeasurement,
    MeasureConfig, Measurer, Outline, RadialTangentialDistortion,
};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const CONTOUR_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const ANCHOR_COLOR: Rgb<u8> = Rgb([0, 0, 255]);

#[derive(Parser)]
#[command(name = "partgauge")]
#[command(about = "Measure rectangular and circular parts from calibrated camera images")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Measure parts in one or more images (one batch).
    Measure(CliMeasureArgs),

    /// Print a calibration profile.
    CalibInfo {
        /// Path to the calibration profile (JSON).
        #[arg(long)]
        calibration: PathBuf,
    },
}

#[derive(Debug, Clone, Args)]
struct CliMeasureArgs {
    /// Input images, measured in the given order.
    #[arg(long, required = true, num_args = 1..)]
    image: Vec<PathBuf>,

    /// Calibration profile (JSON). Camera flags are used when omitted.
    #[arg(long)]
    calibration: Option<PathBuf>,

    /// Object-to-camera distance in mm. Overrides the profile value.
    #[arg(long)]
    working_distance_mm: Option<f64>,

    /// Binarization threshold; pixels above it are backdrop.
    #[arg(long)]
    threshold: Option<u8>,

    /// Path to write measurement results (JSON).
    #[arg(long)]
    out: PathBuf,

    /// Path to write the plain-text report.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Directory for annotated PNG images.
    #[arg(long)]
    annotate_dir: Option<PathBuf>,

    #[command(flatten)]
    camera: CliCameraArgs,
}

#[derive(Debug, Clone, Args, Default)]
struct CliCameraArgs {
    /// Camera intrinsic fx (pixels). If set, fy/cx/cy are required too.
    #[arg(long)]
    cam_fx: Option<f64>,
    /// Camera intrinsic fy (pixels). If set, fx/cx/cy are required too.
    #[arg(long)]
    cam_fy: Option<f64>,
    /// Camera principal point cx (pixels). If set, fx/fy/cy are required too.
    #[arg(long)]
    cam_cx: Option<f64>,
    /// Camera principal point cy (pixels). If set, fx/fy/cx are required too.
    #[arg(long)]
    cam_cy: Option<f64>,
    /// Radial distortion coefficient k1.
    #[arg(long, default_value_t = 0.0)]
    cam_k1: f64,
    /// Radial distortion coefficient k2.
    #[arg(long, default_value_t = 0.0)]
    cam_k2: f64,
    /// Tangential distortion coefficient p1.
    #[arg(long, default_value_t = 0.0)]
    cam_p1: f64,
    /// Tangential distortion coefficient p2.
    #[arg(long, default_value_t = 0.0)]
    cam_p2: f64,
    /// Radial distortion coefficient k3.
    #[arg(long, default_value_t = 0.0)]
    cam_k3: f64,
}

impl CliCameraArgs {
    fn to_model(&self) -> CliResult<Option<CalibrationModel>> {
        let (fx, fy, cx, cy) = match (self.cam_fx, self.cam_fy, self.cam_cx, self.cam_cy) {
            (None, None, None, None) => return Ok(None),
            (Some(fx), Some(fy), Some(cx), Some(cy)) => (fx, fy, cx, cy),
            _ => {
                return Err(
                    "camera intrinsics are partial; provide all of --cam-fx --cam-fy --cam-cx --cam-cy"
                        .into(),
                )
            }
        };
        let model = CalibrationModel {
            intrinsics: CameraIntrinsics { fx, fy, cx, cy },
            distortion: RadialTangentialDistortion {
                k1: self.cam_k1,
                k2: self.cam_k2,
                p1: self.cam_p1,
                p2: self.cam_p2,
                k3: self.cam_k3,
            },
        };
        model.validate()?;
        Ok(Some(model))
    }
}

impl CliMeasureArgs {
    fn to_config(&self) -> CliResult<MeasureConfig> {
        let from_flags = self.camera.to_model()?;
        let mut config = match (&self.calibration, from_flags) {
            (Some(_), Some(_)) => {
                return Err("use either --calibration or --cam-* flags, not both".into())
            }
            (Some(path), None) => CalibrationProfile::from_json_file(path)?.to_config()?,
            (None, Some(model)) => {
                let z = self
                    .working_distance_mm
                    .ok_or("--working-distance-mm is required with --cam-* flags")?;
                MeasureConfig::new(model, z)
            }
            (None, None) => {
                return Err("no camera given; pass --calibration or --cam-fx/--cam-fy/--cam-cx/--cam-cy".into())
            }
        };
        if let Some(z) = self.working_distance_mm {
            config.working_distance_mm = z;
        }
        if let Some(t) = self.threshold {
            config.preprocess.threshold = t;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Measure(args) => run_measure(&args),
        Commands::CalibInfo { calibration } => run_calib_info(&calibration),
    }
}

// ── calib-info ─────────────────────────────────────────────────────────

fn run_calib_info(path: &Path) -> CliResult<()> {
    let profile = CalibrationProfile::from_json_file(path)?;
    let model = profile.to_model()?;
    let k = model.intrinsics;
    let d = model.distortion;

    println!("partgauge calibration profile");
    println!("  schema:            {}", profile.schema);
    println!("  fx, fy:            {:.3}, {:.3} px", k.fx, k.fy);
    println!("  cx, cy:            {:.3}, {:.3} px", k.cx, k.cy);
    println!("  k1, k2, k3:        {:e}, {:e}, {:e}", d.k1, d.k2, d.k3);
    println!("  p1, p2:            {:e}, {:e}", d.p1, d.p2);
    println!("  working distance:  {} mm", profile.working_distance_mm);
    println!(
        "  mm per px at Z:    {:.5} (x), {:.5} (y)",
        profile.working_distance_mm / k.fx,
        profile.working_distance_mm / k.fy
    );

    Ok(())
}

// ── measure ────────────────────────────────────────────────────────────

fn run_measure(args: &CliMeasureArgs) -> CliResult<()> {
    let config = args.to_config()?;
    let measurer = Measurer::new(config)?;

    let images = args
        .image
        .iter()
        .map(|path| {
            tracing::info!("Loading image: {}", path.display());
            image::open(path).map_err(|e| -> CliError {
                format!("Failed to open image {}: {}", path.display(), e).into()
            })
        })
        .collect::<CliResult<Vec<_>>>()?;

    let result = measurer.measure_batch(&images)?;
    tracing::info!(
        "Measured {} parts in {} images",
        result.records.len(),
        result.images.len()
    );

    let json = serde_json::to_string_pretty(&result)?;
    std::fs::write(&args.out, &json)?;
    tracing::info!("Results written to {}", args.out.display());

    let report = render_text_report(&result.records);
    print!("{report}");
    if let Some(path) = &args.report {
        std::fs::write(path, &report)?;
        tracing::info!("Report written to {}", path.display());
    }

    if let Some(dir) = &args.annotate_dir {
        std::fs::create_dir_all(dir)?;
        for (frame, path) in result.images.iter().zip(&args.image) {
            let out = dir.join(annotated_name(path, frame.image_id));
            render_annotations(frame).save(&out)?;
            tracing::info!("Annotated image written to {}", out.display());
        }
    }

    Ok(())
}

fn annotated_name(path: &Path, image_id: usize) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("image{image_id}"));
    format!("{stem}_annotated.png")
}

fn gray_to_rgb(gray: &GrayImage) -> RgbImage {
    RgbImage::from_fn(gray.width(), gray.height(), |x, y| {
        let v = gray.get_pixel(x, y).0[0];
        Rgb([v, v, v])
    })
}

fn draw_closed_polyline(img: &mut RgbImage, points: &[[f64; 2]], color: Rgb<u8>) {
    let n = points.len();
    if n < 2 {
        return;
    }
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        draw_line_segment_mut(img, (a[0] as f32, a[1] as f32), (b[0] as f32, b[1] as f32), color);
    }
}

fn draw_annotation(img: &mut RgbImage, ann: &Annotation) {
    match &ann.outline {
        Outline::Box { corners } => draw_closed_polyline(img, corners, BOX_COLOR),
        Outline::Contour { points } => draw_closed_polyline(img, points, CONTOUR_COLOR),
    }
    let [x, y] = ann.anchor;
    draw_cross_mut(img, ANCHOR_COLOR, x.round() as i32, y.round() as i32);
}

/// Outlines and anchors over the denoised background. Labels go to the report.
fn render_annotations(frame: &ImageMeasurement) -> RgbImage {
    let mut img = gray_to_rgb(&frame.background);
    for ann in &frame.annotations {
        draw_annotation(&mut img, ann);
    }
    img
}
