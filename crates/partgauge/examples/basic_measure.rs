use image::ImageReader;
use partgauge::report::render_text_report;
use partgauge::Measurer;
use std::error::Error;
use std::path::Path;

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!(
            "Usage: {} <calibration.json> <image.png>... [--json out.json]",
            args[0]
        );
        std::process::exit(2);
    }

    let measurer = Measurer::from_calibration_file(Path::new(&args[1]))?;

    let mut paths: Vec<&str> = args[2..].iter().map(String::as_str).collect();
    let mut json_out = None;
    if let Some(pos) = paths.iter().position(|a| *a == "--json") {
        json_out = paths.get(pos + 1).copied();
        paths.truncate(pos);
    }

    let images = paths
        .iter()
        .map(|p| Ok(ImageReader::open(p)?.decode()?))
        .collect::<Result<Vec<_>, Box<dyn Error>>>()?;

    let result = measurer.measure_batch(&images)?;
    print!("{}", render_text_report(&result.records));

    if let Some(out_path) = json_out {
        let json = serde_json::to_string_pretty(&result)?;
        std::fs::write(out_path, json)?;
        println!("Wrote {out_path}");
    }
    Ok(())
}
