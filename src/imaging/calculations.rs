//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::{Dimensions, SizeTier};

/// Scale `(width, height)` so the longer edge equals `bound`.
///
/// The shorter edge is scaled by the same ratio and rounded **up**. Square
/// images take the height branch, which yields `(bound, bound)` either way.
///
/// # Examples
/// ```
/// # use photo_optimizer::imaging::target_dimensions;
/// assert_eq!(target_dimensions(4000, 3000, 2000), (2000, 1500));
/// assert_eq!(target_dimensions(3000, 4001, 2000), (1500, 2000));
/// ```
pub fn target_dimensions(width: u32, height: u32, bound: u32) -> (u32, u32) {
    if width > height {
        (bound, scale_ceil(height, bound, width))
    } else {
        (scale_ceil(width, bound, height), bound)
    }
}

/// `ceil(short * bound / long)`; multiplying first keeps evenly divisible
/// cases exact in `f64`.
fn scale_ceil(short: u32, bound: u32, long: u32) -> u32 {
    (short as f64 * bound as f64 / long as f64).ceil() as u32
}

/// What the search does with the normalized buffer for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizePlan {
    /// Encode the buffer as-is.
    Keep,
    /// Resample to exactly these dimensions first.
    Resize(Dimensions),
}

/// Decide whether a tier needs a resample.
///
/// Unbounded tiers and images whose sides are both strictly below the bound
/// are kept (never upscaled).
pub fn resize_plan(current: Dimensions, tier: SizeTier) -> ResizePlan {
    let Some(bound) = tier.bound() else {
        return ResizePlan::Keep;
    };
    if current.width < bound && current.height < bound {
        return ResizePlan::Keep;
    }
    let (width, height) = target_dimensions(current.width, current.height, bound);
    ResizePlan::Resize(Dimensions { width, height })
}
