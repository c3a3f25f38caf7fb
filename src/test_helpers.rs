//! Shared test utilities: synthetic images and hand-built EXIF segments.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let jpeg = encode_test_jpeg(64, 48);
//! let rotated = with_exif_orientation(&jpeg, 6);
//! ```

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageEncoder, RgbImage};

// =========================================================================
// Pixel buffers
// =========================================================================

/// Gradient with a pseudo-random speckle so JPEG sizes react to quality.
pub fn textured_image(width: u32, height: u32) -> DynamicImage {
    let img = RgbImage::from_fn(width, height, |x, y| {
        let noise = (x.wrapping_mul(2_654_435_761) ^ y.wrapping_mul(40_503)) >> 24;
        image::Rgb([(x % 256) as u8, (y % 256) as u8, noise as u8])
    });
    DynamicImage::ImageRgb8(img)
}

// =========================================================================
// Encoded files
// =========================================================================

/// Encode a textured image as a baseline JPEG without any metadata.
pub fn encode_test_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = textured_image(width, height).to_rgb8();
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, 90)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    bytes
}

/// Insert an APP1 Exif segment carrying only the orientation tag right after SOI.
pub fn with_exif_orientation(jpeg: &[u8], orientation: u16) -> Vec<u8> {
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8], "not a JPEG");

    // Big-endian TIFF header, IFD0 at offset 8 with a single SHORT entry.
    let mut tiff = vec![b'M', b'M', 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08];
    tiff.extend_from_slice(&1u16.to_be_bytes());
    tiff.extend_from_slice(&0x0112u16.to_be_bytes());
    tiff.extend_from_slice(&3u16.to_be_bytes());
    tiff.extend_from_slice(&1u32.to_be_bytes());
    tiff.extend_from_slice(&orientation.to_be_bytes());
    tiff.extend_from_slice(&[0x00, 0x00]);
    tiff.extend_from_slice(&0u32.to_be_bytes());

    let mut payload = b"Exif\0\0".to_vec();
    payload.extend_from_slice(&tiff);
    let segment_len = (payload.len() + 2) as u16;

    let mut out = Vec::with_capacity(jpeg.len() + payload.len() + 4);
    out.extend_from_slice(&jpeg[..2]);
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&segment_len.to_be_bytes());
    out.extend_from_slice(&payload);
    out.extend_from_slice(&jpeg[2..]);
    out
}
