//! Size/quality search.
//!
//! Finds the first `(tier, quality)` pair whose JPEG encoding is strictly
//! smaller than the byte budget. Tiers are the outer loop and qualities the
//! inner one, both walked from largest to smallest, so resolution is given up
//! only after every quality on the current tier has failed:
//!
//! ```text
//! unbounded: q100 q95 q90 q85 q80
//! 3200:      q100 q95 q90 q85 q80
//! 2800:      q100 …
//! ```
//!
//! The first fit wins. This is a greedy walk in a fixed order, not an
//! optimizer: it never compares two fitting candidates.

use super::backend::{BackendError, ImageBackend};
use super::calculations::{ResizePlan, resize_plan};
use super::orientation::normalize;
use super::params::{
    Dimensions, EncodedArtifact, ParamError, Quality, SizeTier, default_tiers, quality_ladder,
};
use image::{DynamicImage, GenericImageView};
use std::borrow::Cow;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error(transparent)]
    InvalidQuality(#[from] ParamError),
    #[error("no size/quality combination fits under {target_size} bytes ({attempts} encodes tried)")]
    NoSolutionFound { target_size: u64, attempts: usize },
    #[error("Image processing failed: {0}")]
    Backend(#[from] BackendError),
}

/// Search parameters, usually built from
/// [`OptimizerConfig`](crate::config::OptimizerConfig).
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    /// Tried in order; expected to start with [`SizeTier::Unbounded`] and descend.
    pub tiers: Vec<SizeTier>,
    /// Lowest quality tried on each tier.
    pub min_quality: i32,
    pub quality_step: u32,
    /// Encodings must be strictly smaller than this many bytes.
    pub target_size: u64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            tiers: default_tiers(),
            min_quality: 80,
            quality_step: 5,
            target_size: 8 * 1024 * 1024,
        }
    }
}

/// The winning combination and its encoded bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub tier: SizeTier,
    pub quality: Quality,
    /// Dimensions of the buffer that was encoded.
    pub dimensions: Dimensions,
    pub artifact: EncodedArtifact,
}

fn dimensions_of(image: &DynamicImage) -> Dimensions {
    let (width, height) = image.dimensions();
    Dimensions { width, height }
}

/// JPEG stores 8-bit samples without alpha; convert anything else once, up front.
fn jpeg_compatible(image: &DynamicImage) -> Cow<'_, DynamicImage> {
    match image {
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageLuma8(_) => Cow::Borrowed(image),
        other => Cow::Owned(DynamicImage::ImageRgb8(other.to_rgb8())),
    }
}

/// Run the size/quality search over an upright buffer.
///
/// `original_size` is only used for the diagnostic summary. Fails with
/// [`SearchError::InvalidQuality`] before touching the backend if
/// `min_quality` is outside `0..=100`.
pub fn search(
    backend: &impl ImageBackend,
    image: &DynamicImage,
    original_size: u64,
    options: &SearchOptions,
) -> Result<SearchResult, SearchError> {
    let min_quality = Quality::new(options.min_quality)?;
    let source = jpeg_compatible(image);
    let source_dims = dimensions_of(&source);
    let mut attempts = 0;

    for &tier in &options.tiers {
        // Borrowed on the reuse path; an owned resample is dropped when the tier ends.
        let current: Cow<'_, DynamicImage> = match resize_plan(source_dims, tier) {
            ResizePlan::Keep => Cow::Borrowed(&*source),
            ResizePlan::Resize(target) => {
                Cow::Owned(backend.resize(&source, target.width, target.height)?)
            }
        };
        let dimensions = dimensions_of(&current);
        tracing::debug!(%tier, %dimensions, "trying size");

        for quality in quality_ladder(min_quality, options.quality_step) {
            attempts += 1;
            let artifact = backend.encode(&current, quality)?;
            tracing::debug!(%quality, bytes = artifact.len(), "encoded");

            if artifact.len() < options.target_size {
                log_success(original_size, artifact.len(), tier, quality, dimensions);
                return Ok(SearchResult {
                    tier,
                    quality,
                    dimensions,
                    artifact,
                });
            }
        }
    }

    Err(SearchError::NoSolutionFound {
        target_size: options.target_size,
        attempts,
    })
}

fn log_success(
    original_size: u64,
    optimized_size: u64,
    tier: SizeTier,
    quality: Quality,
    dimensions: Dimensions,
) {
    let difference = original_size as i64 - optimized_size as i64;
    let reduction = if original_size == 0 {
        0.0
    } else {
        difference as f64 / original_size as f64
    };
    tracing::info!(
        original_size,
        optimized_size,
        size_difference = difference,
        size_reduction = format_args!("{:.0}%", reduction * 100.0),
        final_quality = quality.value(),
        final_size = %tier,
        %dimensions,
        "target size reached"
    );
}

/// Decode, normalize orientation, then search.
pub fn optimize_bytes(
    backend: &impl ImageBackend,
    bytes: &[u8],
    options: &SearchOptions,
) -> Result<SearchResult, SearchError> {
    // Reject a bad floor before paying for the decode.
    Quality::new(options.min_quality)?;

    let decoded = backend.decode(bytes)?;
    tracing::debug!(orientation = ?decoded.orientation, "decoded");
    let upright = normalize(decoded.image, decoded.orientation);
    search(backend, &upright, bytes.len() as u64, options)
}
