//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::ImageReader`, format sniffed from content |
//! | Orientation | `kamadak-exif`, tag 0x0112 |
//! | Resize | `image::imageops::resize` with `Lanczos3` filter |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder`, in memory |

use super::backend::{BackendError, DecodedImage, ImageBackend};
use super::orientation::read_exif_orientation;
use super::params::{EncodedArtifact, Quality};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::io::Cursor;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBackend for RustBackend {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, BackendError> {
        let image = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()?
            .decode()
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok(DecodedImage {
            image,
            orientation: read_exif_orientation(bytes),
        })
    }

    fn resize(
        &self,
        image: &DynamicImage,
        width: u32,
        height: u32,
    ) -> Result<DynamicImage, BackendError> {
        Ok(image.resize_exact(width, height, FilterType::Lanczos3))
    }

    fn encode(
        &self,
        image: &DynamicImage,
        quality: Quality,
    ) -> Result<EncodedArtifact, BackendError> {
        // The search hands over RGB8/L8 already; direct callers may not.
        let rgb;
        let image = match image {
            DynamicImage::ImageRgb8(_) | DynamicImage::ImageLuma8(_) => image,
            other => {
                rgb = DynamicImage::ImageRgb8(other.to_rgb8());
                &rgb
            }
        };

        let mut bytes = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut bytes, quality.value());
        image
            .write_with_encoder(encoder)
            .map_err(|e| BackendError::Encode(e.to_string()))?;
        Ok(EncodedArtifact::new(bytes))
    }
}
