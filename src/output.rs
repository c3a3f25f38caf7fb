//! CLI output formatting.
//!
//! # Output Format
//!
//! ```text
//! IMG_0001.jpg → IMG_0001.2400px.85q.jpg
//!     Size: 2400×1600 at quality 85
//!     Bytes: 14.2 MB → 7.9 MB (-44%)
//! IMG_0002.jpg
//!     Failed: no size/quality combination fits under 8388608 bytes (45 encodes tried)
//!
//! Optimized 1 file, 1 failed
//! ```
//!
//! # Architecture
//!
//! Each `format_*` function returns `Vec<String>` (or a `String`) for
//! testability and has a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.

use crate::imaging::SizeTier;
use crate::optimize::FileReport;
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Human-readable byte count using 1024-based units.
///
/// ```text
/// 512      → 512 B
/// 2048     → 2.0 KB
/// 8388608  → 8.0 MB
/// ```
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 3] = ["KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = None;
    for name in UNITS {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = Some(name);
    }
    match unit {
        Some(name) => format!("{value:.1} {name}"),
        None => format!("{bytes} B"),
    }
}

fn format_tier(tier: SizeTier) -> String {
    match tier {
        SizeTier::Unbounded => "original size".to_string(),
        SizeTier::Bounded(px) => format!("max {px}px"),
    }
}

/// Lines describing one optimized file.
pub fn format_report(report: &FileReport) -> Vec<String> {
    let reduction = (report.size_reduction() * 100.0).round() as i64;
    vec![
        format!(
            "{} → {}",
            file_name(&report.source),
            file_name(&report.destination)
        ),
        format!(
            "{}Size: {} ({}) at quality {}",
            indent(1),
            report.dimensions,
            format_tier(report.tier),
            report.quality
        ),
        format!(
            "{}Bytes: {} → {} ({:+}%)",
            indent(1),
            format_file_size(report.original_size),
            format_file_size(report.optimized_size),
            -reduction
        ),
    ]
}

/// Lines describing a file that could not be optimized.
pub fn format_failure(source: &Path, error: &dyn std::error::Error) -> Vec<String> {
    vec![
        file_name(source),
        format!("{}Failed: {}", indent(1), error),
    ]
}

/// Closing summary line.
pub fn format_summary(optimized: usize, failed: usize) -> String {
    let files = if optimized == 1 { "file" } else { "files" };
    if failed == 0 {
        format!("Optimized {optimized} {files}")
    } else {
        format!("Optimized {optimized} {files}, {failed} failed")
    }
}

/// One compact JSON object per report, for scripting.
pub fn format_report_json(report: &FileReport) -> serde_json::Result<String> {
    serde_json::to_string(report)
}

pub fn print_report(report: &FileReport) {
    for line in format_report(report) {
        println!("{line}");
    }
}

pub fn print_failure(source: &Path, error: &dyn std::error::Error) {
    for line in format_failure(source, error) {
        println!("{line}");
    }
}
