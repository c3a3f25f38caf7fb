//! Value types shared by the search and the backend.
//!
//! - [`Quality`] — JPEG quality in `0..=100`. Out-of-range values are rejected,
//!   never clamped: a typo in a config file must not silently change output.
//! - [`SizeTier`] — a bound on the longer edge, or [`SizeTier::Unbounded`].
//! - [`Dimensions`] — width × height of a pixel buffer.
//! - [`EncodedArtifact`] — the bytes produced by one encode call.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamError {
    #[error("quality {0} is outside 0-100")]
    InvalidQuality(i32),
    #[error("invalid size tier '{0}': expected \"unbounded\" or a positive pixel count")]
    InvalidTier(String),
}

/// JPEG encoding quality (0-100, higher = larger and better).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Quality(u8);

impl Quality {
    pub const MAX: Quality = Quality(100);

    pub fn new(value: i32) -> Result<Self, ParamError> {
        match u8::try_from(value) {
            Ok(v) if v <= 100 => Ok(Self(v)),
            _ => Err(ParamError::InvalidQuality(value)),
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Qualities visited within one tier: `100, 100 - step, …` while `>= min`.
///
/// A zero step yields only the top rung so the ladder is always finite.
pub fn quality_ladder(min: Quality, step: u32) -> impl Iterator<Item = Quality> {
    let step = step.min(u32::from(u8::MAX)) as u8;
    let mut next = Some(Quality::MAX.value());
    std::iter::from_fn(move || {
        let current = next.filter(|&q| q >= min.value())?;
        next = if step == 0 {
            None
        } else {
            current.checked_sub(step)
        };
        Some(Quality(current))
    })
}

/// Upper bound on the longer image edge for one search attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTier", into = "RawTier")]
pub enum SizeTier {
    /// Keep the normalized image at its own resolution.
    Unbounded,
    Bounded(u32),
}

impl SizeTier {
    pub fn bound(self) -> Option<u32> {
        match self {
            SizeTier::Unbounded => None,
            SizeTier::Bounded(px) => Some(px),
        }
    }

    pub fn is_unbounded(self) -> bool {
        matches!(self, SizeTier::Unbounded)
    }
}

/// Ladder used when no configuration overrides it.
pub fn default_tiers() -> Vec<SizeTier> {
    let mut tiers = vec![SizeTier::Unbounded];
    tiers.extend(
        [3200, 2800, 2400, 2000, 1600, 1200, 900, 600]
            .into_iter()
            .map(SizeTier::Bounded),
    );
    tiers
}

impl fmt::Display for SizeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeTier::Unbounded => f.write_str("unbounded"),
            SizeTier::Bounded(px) => write!(f, "{px}"),
        }
    }
}

impl FromStr for SizeTier {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("unbounded") {
            return Ok(SizeTier::Unbounded);
        }
        match trimmed.parse::<u32>() {
            Ok(px) if px > 0 => Ok(SizeTier::Bounded(px)),
            _ => Err(ParamError::InvalidTier(s.to_string())),
        }
    }
}

/// TOML shape of a tier: the string `"unbounded"` or an integer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawTier {
    Bound(u32),
    Keyword(String),
}

impl TryFrom<RawTier> for SizeTier {
    type Error = ParamError;

    fn try_from(raw: RawTier) -> Result<Self, Self::Error> {
        match raw {
            RawTier::Bound(0) => Err(ParamError::InvalidTier("0".into())),
            RawTier::Bound(px) => Ok(SizeTier::Bounded(px)),
            RawTier::Keyword(word) => word.parse(),
        }
    }
}

impl From<SizeTier> for RawTier {
    fn from(tier: SizeTier) -> Self {
        match tier {
            SizeTier::Unbounded => RawTier::Keyword("unbounded".into()),
            SizeTier::Bounded(px) => RawTier::Bound(px),
        }
    }
}

/// Width × height of a pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}×{}", self.width, self.height)
    }
}

/// Bytes produced by a single encode call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedArtifact(Vec<u8>);

impl EncodedArtifact {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn len(&self) -> u64 {
        self.0.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_accepts_bounds() {
        assert_eq!(Quality::new(0).unwrap().value(), 0);
        assert_eq!(Quality::new(100).unwrap().value(), 100);
    }

    #[test]
    fn quality_rejects_out_of_range() {
        assert_eq!(Quality::new(-1), Err(ParamError::InvalidQuality(-1)));
        assert_eq!(Quality::new(101), Err(ParamError::InvalidQuality(101)));
        assert!(Quality::new(i32::MAX).is_err());
    }

    fn ladder(min: i32, step: u32) -> Vec<u8> {
        quality_ladder(Quality::new(min).unwrap(), step)
            .map(Quality::value)
            .collect()
    }

    #[test]
    fn ladder_default_range() {
        assert_eq!(ladder(80, 5), vec![100, 95, 90, 85, 80]);
    }

    #[test]
    fn ladder_stops_before_overshooting_min() {
        // 100, 93, 86; 79 would be below the floor
        assert_eq!(ladder(80, 7), vec![100, 93, 86]);
    }

    #[test]
    fn ladder_reaches_zero() {
        assert_eq!(ladder(0, 50), vec![100, 50, 0]);
    }

    #[test]
    fn ladder_min_100_is_single_rung() {
        assert_eq!(ladder(100, 5), vec![100]);
    }

    #[test]
    fn ladder_zero_step_is_finite() {
        assert_eq!(ladder(80, 0), vec![100]);
    }

    #[test]
    fn ladder_huge_step() {
        assert_eq!(ladder(0, 1000), vec![100]);
    }

    #[test]
    fn tier_parses_keyword_and_number() {
        assert_eq!("unbounded".parse::<SizeTier>(), Ok(SizeTier::Unbounded));
        assert_eq!("Unbounded".parse::<SizeTier>(), Ok(SizeTier::Unbounded));
        assert_eq!(" 2000 ".parse::<SizeTier>(), Ok(SizeTier::Bounded(2000)));
    }

    #[test]
    fn tier_rejects_zero_and_garbage() {
        assert!("0".parse::<SizeTier>().is_err());
        assert!("-5".parse::<SizeTier>().is_err());
        assert!("big".parse::<SizeTier>().is_err());
    }

    #[test]
    fn tier_display() {
        assert_eq!(SizeTier::Unbounded.to_string(), "unbounded");
        assert_eq!(SizeTier::Bounded(1600).to_string(), "1600");
    }

    #[test]
    fn default_tiers_start_unbounded_and_descend() {
        let tiers = default_tiers();
        assert_eq!(tiers[0], SizeTier::Unbounded);
        let bounds: Vec<u32> = tiers.iter().filter_map(|t| t.bound()).collect();
        assert_eq!(bounds, vec![3200, 2800, 2400, 2000, 1600, 1200, 900, 600]);
    }

    #[test]
    fn artifact_len_matches_bytes() {
        let artifact = EncodedArtifact::new(vec![1, 2, 3]);
        assert_eq!(artifact.len(), 3);
        assert!(!artifact.is_empty());
        assert_eq!(artifact.into_bytes(), vec![1, 2, 3]);
    }
}
