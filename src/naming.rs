//! Output filename convention.
//!
//! The chosen tier and quality are encoded in the name so a directory of
//! results shows at a glance what each photo gave up:
//!
//! - `beach.jpg` at (unbounded, 100) → `beach.optimized.jpg`
//! - `beach.jpg` at (unbounded, 90) → `beach.90q.jpg`
//! - `beach.png` at (2000, 100) → `beach.2000px.jpg`
//! - `beach.heic.tif` at (1600, 85) → `beach.heic.1600px.85q.jpg`
//!
//! Only the last extension is stripped.

use crate::imaging::{Quality, SizeTier};
use std::path::{Path, PathBuf};

/// Build the output file name for `stem` optimized at `(tier, quality)`.
pub fn output_file_name(stem: &str, tier: SizeTier, quality: Quality) -> String {
    let mut name = stem.to_string();
    if let Some(px) = tier.bound() {
        name.push_str(&format!(".{px}px"));
    }
    if quality < Quality::MAX {
        name.push_str(&format!(".{quality}q"));
    }
    if tier.is_unbounded() && quality == Quality::MAX {
        name.push_str(".optimized");
    }
    name.push_str(".jpg");
    name
}

/// Destination for an optimized `source`: next to it, or inside `out_dir`.
pub fn output_path(
    source: &Path,
    out_dir: Option<&Path>,
    tier: SizeTier,
    quality: Quality,
) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let dir = match out_dir {
        Some(dir) => dir.to_path_buf(),
        None => source.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    dir.join(output_file_name(&stem, tier, quality))
}
