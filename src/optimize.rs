//! Per-file optimization: read → decode → normalize → search → persist.
//!
//! Each file is an independent unit. The search runs entirely in memory, so
//! a file that cannot be brought under budget leaves nothing on disk.
//!
//! ## Output Structure
//!
//! ```text
//! photos/
//! ├── IMG_0001.jpg
//! ├── IMG_0001.2400px.85q.jpg    # shrunk and re-encoded
//! ├── IMG_0002.jpg
//! └── IMG_0002.optimized.jpg     # fit at full size, quality 100
//! ```

use crate::config::OptimizerConfig;
use crate::imaging::{
    Dimensions, ImageBackend, Quality, SearchError, SearchOptions, SizeTier, optimize_bytes,
};
use crate::naming::output_path;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OptimizeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error("Destination already exists: {0} (use --overwrite)")]
    DestinationExists(PathBuf),
}

/// Everything needed to process one file.
#[derive(Debug, Clone, Default)]
pub struct OptimizeOptions {
    pub search: SearchOptions,
    /// Write results here instead of next to each source.
    pub out_dir: Option<PathBuf>,
    pub overwrite: bool,
}

impl OptimizeOptions {
    pub fn from_config(config: &OptimizerConfig, out_dir: Option<PathBuf>) -> Self {
        Self {
            search: config.search.to_options(),
            out_dir,
            overwrite: config.output.overwrite,
        }
    }
}

/// Outcome of one successfully optimized file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub original_size: u64,
    pub optimized_size: u64,
    pub tier: SizeTier,
    pub quality: Quality,
    pub dimensions: Dimensions,
}

impl FileReport {
    /// Bytes saved; negative when the output is larger than the input.
    pub fn size_difference(&self) -> i64 {
        self.original_size as i64 - self.optimized_size as i64
    }

    /// Fraction of the original saved, e.g. `0.75` for a 4× smaller file.
    pub fn size_reduction(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        self.size_difference() as f64 / self.original_size as f64
    }
}

/// Optimize a single file and write the result.
pub fn optimize_file(
    backend: &impl ImageBackend,
    source: &Path,
    options: &OptimizeOptions,
) -> Result<FileReport, OptimizeError> {
    let bytes = fs::read(source)?;
    let _span = tracing::info_span!("optimize", file = %source.display()).entered();

    let result = optimize_bytes(backend, &bytes, &options.search)?;
    let destination = output_path(
        source,
        options.out_dir.as_deref(),
        result.tier,
        result.quality,
    );
    persist(result.artifact.as_bytes(), &destination, options.overwrite)?;
    tracing::info!(destination = %destination.display(), "file has been optimized");

    Ok(FileReport {
        source: source.to_path_buf(),
        destination,
        original_size: bytes.len() as u64,
        optimized_size: result.artifact.len(),
        tier: result.tier,
        quality: result.quality,
        dimensions: result.dimensions,
    })
}

/// Write `bytes` to `destination`, refusing to clobber unless `overwrite`.
fn persist(bytes: &[u8], destination: &Path, overwrite: bool) -> Result<(), OptimizeError> {
    persist_with(destination, overwrite, |file| file.write_all(bytes))
}

/// Stage the output in a temporary file beside `destination`, then move it
/// into place. A failed write leaves `destination` untouched.
fn persist_with(
    destination: &Path,
    overwrite: bool,
    write: impl FnOnce(&mut File) -> io::Result<()>,
) -> Result<(), OptimizeError> {
    let parent = match destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            fs::create_dir_all(parent)?;
            parent
        }
        None => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(parent)?;
    write(staged.as_file_mut())?;
    staged.as_file().sync_all()?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(staged.path(), fs::Permissions::from_mode(0o644))?;
    }

    let placed = if overwrite {
        staged.persist(destination)
    } else {
        staged.persist_noclobber(destination)
    };
    match placed {
        Ok(_) => Ok(()),
        Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
            Err(OptimizeError::DestinationExists(destination.to_path_buf()))
        }
        Err(e) => Err(e.error.into()),
    }
}

/// Result of running a batch of files.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub optimized: Vec<FileReport>,
    pub failed: Vec<(PathBuf, OptimizeError)>,
}

/// Optimize files one after another; a failure does not stop the batch.
///
/// `on_result` sees each outcome as soon as it is known, for progress output.
pub fn optimize_files(
    backend: &impl ImageBackend,
    sources: &[PathBuf],
    options: &OptimizeOptions,
    mut on_result: impl FnMut(&Path, &Result<FileReport, OptimizeError>),
) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();
    for source in sources {
        let result = optimize_file(backend, source, options);
        on_result(source, &result);
        match result {
            Ok(report) => outcome.optimized.push(report),
            Err(e) => {
                tracing::warn!(file = %source.display(), error = %e, "optimization failed");
                outcome.failed.push((source.clone(), e));
            }
        }
    }
    outcome
}
