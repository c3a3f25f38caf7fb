//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the boundary to the codec: decode, resize
//! and encode. The search in [`operations`](super::operations) only talks to
//! this trait, which is what lets its tests script encoded sizes with a mock.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend).

use super::orientation::Orientation;
use super::params::{EncodedArtifact, Quality};
use image::DynamicImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// A decoded pixel buffer plus the orientation its container declared.
#[derive(Debug)]
pub struct DecodedImage {
    pub image: DynamicImage,
    pub orientation: Orientation,
}

/// Trait for image processing backends.
pub trait ImageBackend {
    /// Decode an encoded image held in memory.
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, BackendError>;

    /// Resample to exactly `width × height` with a high-quality filter.
    fn resize(
        &self,
        image: &DynamicImage,
        width: u32,
        height: u32,
    ) -> Result<DynamicImage, BackendError>;

    /// Encode to JPEG in memory.
    fn encode(&self, image: &DynamicImage, quality: Quality)
    -> Result<EncodedArtifact, BackendError>;
}
