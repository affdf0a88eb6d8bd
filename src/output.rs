//! CLI output formatting.
//!
//! # Output Format
//!
//! ```text
//! Source: fisheye.jpg (1024x768)
//!     Pole: (512, 384)
//!     Radius: 512
//!     Rounding: nearest
//! Output: strip.jpg (3216x512)
//!     Sampled: 1200000 px
//!     Black: 446592 px
//! Rectified image saved to strip.jpg
//! ```
//!
//! A dry run prints the same source and output lines without pixel counts,
//! followed by `Dry run: nothing written`.
//!
//! `format_*` functions return `Vec<String>` for testability; `print_*`
//! wrappers write to stdout. Format functions are pure: no I/O, no side
//! effects.

use crate::imaging::{Geometry, RectifyReport};
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn source_lines(source: &Path, g: &Geometry) -> Vec<String> {
    vec![
        format!("Source: {} ({}x{})", source.display(), g.width, g.height),
        format!("{}Pole: ({}, {})", indent(1), g.mid_x, g.mid_y),
        format!("{}Radius: {}", indent(1), g.max_radius),
    ]
}

fn output_line(output: &Path, g: &Geometry) -> String {
    let (out_w, out_h) = g.output_dimensions();
    format!("Output: {} ({}x{})", output.display(), out_w, out_h)
}

/// Format a run report as display lines.
pub fn format_report(report: &RectifyReport) -> Vec<String> {
    let g = &report.geometry;
    let mut lines = source_lines(&report.source, g);
    lines.extend([
        format!("{}Rounding: {}", indent(1), report.rounding),
        output_line(&report.output, g),
        format!("{}Sampled: {} px", indent(1), report.sampled_pixels),
        format!("{}Black: {} px", indent(1), report.black_pixels),
        format!("Rectified image saved to {}", report.output.display()),
    ]);
    lines
}

/// Format the planned geometry of a run that decodes nothing.
pub fn format_plan(source: &Path, output: &Path, geometry: &Geometry) -> Vec<String> {
    let mut lines = source_lines(source, geometry);
    lines.push(output_line(output, geometry));
    lines.push("Dry run: nothing written".to_string());
    lines
}

pub fn print_plan(source: &Path, output: &Path, geometry: &Geometry) {
    for line in format_plan(source, output, geometry) {
        println!("{}", line);
    }
}

pub fn print_report(report: &RectifyReport) {
    for line in format_report(report) {
        println!("{}", line);
    }
}

/// Render a run report as pretty JSON.
pub fn format_report_json(report: &RectifyReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}
