//! Plain-text measurement table.

use std::fmt::Write as _;

use crate::record::{Dimensions, MeasurementRecord};

const RULE_WIDTH: usize = 56;

/// Dimension column for one record, millimeters at 2 decimals.
pub fn format_dimensions(dimensions: &Dimensions) -> String {
    match *dimensions {
        Dimensions::Rectangle {
            width_mm,
            height_mm,
        } => format!("W={width_mm:.2}mm, H={height_mm:.2}mm"),
        Dimensions::Circle { radius_mm } => format!("R={radius_mm:.2}mm"),
    }
}

/// One table row: `global id | image id | local label | kind | dimensions`.
pub fn format_row(record: &MeasurementRecord) -> String {
    format!(
        "{:3} | {:5} | {:>5} | {:9} | {}",
        record.global_id,
        record.image_id,
        format!("L{}", record.local_id),
        record.shape_kind().as_str(),
        format_dimensions(&record.dimensions)
    )
}

/// Render the full report for a batch, one row per record in id order.
pub fn render_text_report(records: &[MeasurementRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Part measurement results ===");
    let _ = writeln!(out, " ID | Image | Local | Kind      | Dimensions");
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
    for record in records {
        let _ = writeln!(out, "{}", format_row(record));
    }
    out
}
