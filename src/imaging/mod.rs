//! Image processing — pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` |
//! | **Orientation** | `kamadak-exif` + `image` rotations |
//! | **Resize** | Lanczos3 via `image::DynamicImage::resize_exact` |
//! | **Encode** | `image::codecs::jpeg::JpegEncoder` |
//!
//! The module is split into:
//! - **Parameters**: value types ([`Quality`], [`SizeTier`], [`EncodedArtifact`])
//! - **Calculations**: pure dimension math (unit testable)
//! - **Orientation**: EXIF tag → upright buffer
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: the size/quality search on top of the backend

pub mod backend;
mod calculations;
pub mod operations;
pub mod orientation;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, DecodedImage, ImageBackend};
pub use calculations::{ResizePlan, resize_plan, target_dimensions};
pub use operations::{SearchError, SearchOptions, SearchResult, optimize_bytes, search};
pub use orientation::{Orientation, normalize, read_exif_orientation};
pub use params::{
    Dimensions, EncodedArtifact, ParamError, Quality, SizeTier, default_tiers, quality_ladder,
};
pub use rust_backend::RustBackend;
