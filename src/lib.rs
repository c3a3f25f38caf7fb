//! # Photo Optimizer
//!
//! Re-encodes a photo as the largest, highest-quality JPEG whose size stays
//! under a byte budget, after turning it upright according to its EXIF
//! orientation.
//!
//! # Pipeline
//!
//! ```text
//! bytes → decode → normalize orientation → size/quality search → persist
//! ```
//!
//! The search tries every quality on the current size before giving up any
//! resolution, and stops at the first encoding that fits. See
//! [`imaging::operations`] for the exact traversal order.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Orientation, dimension math, backend trait, the search itself |
//! | [`optimize`] | Per-file pipeline and sequential batches |
//! | [`config`] | Layered TOML configuration and validation |
//! | [`naming`] | `name.2400px.85q.jpg` output naming |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Orientation Before Anything Else
//!
//! A sideways buffer would be resized against the wrong edge and every
//! encoded size measured afterwards would describe a different image. The
//! rotation is applied once, right after decode, and the output carries no
//! orientation metadata.
//!
//! ## Resolution Over Quality
//!
//! Tiers form the outer loop and qualities the inner one. A photo keeps its
//! full resolution whenever *some* quality above the floor fits, even if a
//! smaller tier would fit at quality 100.
//!
//! ## Nothing Written on Failure
//!
//! Every candidate is encoded in memory. Only the winning artifact reaches
//! the filesystem, so an image that cannot meet the budget leaves no trace.

pub mod config;
pub mod imaging;
pub mod naming;
pub mod optimize;
pub mod output;

#[cfg(test)]
pub(crate) mod test_helpers;
