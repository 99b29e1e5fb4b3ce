use image::ImageReader;
use partgauge::{
    BatchContext, CalibrationModel, CameraIntrinsics, Dimensions, MeasureConfig, Measurer,
    RadialTangentialDistortion,
};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <working_distance_mm> <image.png>...", args[0]);
        std::process::exit(2);
    }

    let working_distance_mm: f64 = args[1].parse()?;
    let first = ImageReader::open(&args[2])?.decode()?;
    let (w, h) = (first.width(), first.height());

    // Example camera parameters; replace with calibrated values.
    let camera = CalibrationModel {
        intrinsics: CameraIntrinsics {
            fx: 2400.0,
            fy: 2400.0,
            cx: w as f64 * 0.5,
            cy: h as f64 * 0.5,
        },
        distortion: RadialTangentialDistortion {
            k1: -0.08,
            k2: 0.02,
            p1: 0.0005,
            p2: -0.0005,
            k3: 0.0,
        },
    };

    let mut config = MeasureConfig::new(camera, working_distance_mm);
    config.preprocess.threshold = 40;
    config.correction.edge_sample_stride = 5;
    let measurer = Measurer::new(config)?;

    // Drive the batch by hand so images are decoded one at a time.
    let mut ctx = BatchContext::new();
    let mut frame = measurer.measure_image(&mut ctx, &first)?;
    for path in &args[3..] {
        print_frame(&frame);
        let image = ImageReader::open(path)?.decode()?;
        frame = measurer.measure_image(&mut ctx, &image)?;
    }
    print_frame(&frame);
    println!("{} parts measured in total.", ctx.issued());
    Ok(())
}

fn print_frame(frame: &partgauge::ImageMeasurement) {
    println!(
        "image {}: {} parts ({} rejected)",
        frame.image_id,
        frame.records.len(),
        frame.stats.rejected
    );
    for r in &frame.records {
        match r.dimensions {
            Dimensions::Rectangle {
                width_mm,
                height_mm,
            } => println!("  G{} L{}: {width_mm:.2} x {height_mm:.2} mm", r.global_id, r.local_id),
            Dimensions::Circle { radius_mm } => {
                println!("  G{} L{}: r = {radius_mm:.2} mm", r.global_id, r.local_id)
            }
        }
    }
}
