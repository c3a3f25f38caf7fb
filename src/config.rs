//! Optimizer configuration.
//!
//! Handles loading, validating, and merging configuration. Values are
//! resolved in layers, each overriding the one before:
//!
//! ```text
//! stock defaults
//!   → photo-optimizer.toml (or the file given with --config)
//!     → command-line flags
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [search]
//! min_quality = 80          # Lowest JPEG quality tried per size (0-100)
//! quality_step = 5          # Quality decrement between attempts
//! target_size = 8388608     # Output must be strictly smaller (bytes)
//! sizes = ["unbounded", 3200, 2800, 2400, 2000, 1600, 1200, 900, 600]
//!
//! [output]
//! overwrite = false         # Replace existing output files
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{Quality, SearchOptions, SizeTier, default_tiers};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "photo-optimizer.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Optimizer configuration.
///
/// All fields have defaults; config files only need the keys they change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptimizerConfig {
    /// Size/quality search parameters.
    pub search: SearchConfig,
    /// Where and how results are written.
    pub output: OutputConfig,
}

/// Search ladder and byte budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    pub min_quality: i32,
    pub quality_step: u32,
    /// Bytes; encodings must come in strictly below this.
    pub target_size: u64,
    /// Longer-edge bounds, largest first, starting with `"unbounded"`.
    pub sizes: Vec<SizeTier>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_quality: 80,
            quality_step: 5,
            target_size: 8 * 1024 * 1024,
            sizes: default_tiers(),
        }
    }
}

impl SearchConfig {
    pub fn to_options(&self) -> SearchOptions {
        SearchOptions {
            tiers: self.sizes.clone(),
            min_quality: self.min_quality,
            quality_step: self.quality_step,
            target_size: self.target_size,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Replace an existing file at the destination instead of failing.
    pub overwrite: bool,
}

impl OptimizerConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let search = &self.search;
        if Quality::new(search.min_quality).is_err() {
            return Err(ConfigError::Validation(
                "search.min_quality must be 0-100".into(),
            ));
        }
        if search.quality_step == 0 {
            return Err(ConfigError::Validation(
                "search.quality_step must be positive".into(),
            ));
        }
        if search.target_size == 0 {
            return Err(ConfigError::Validation(
                "search.target_size must be positive".into(),
            ));
        }
        match search.sizes.first() {
            None => {
                return Err(ConfigError::Validation(
                    "search.sizes must not be empty".into(),
                ));
            }
            Some(SizeTier::Bounded(_)) => {
                return Err(ConfigError::Validation(
                    "search.sizes must start with \"unbounded\"".into(),
                ));
            }
            Some(SizeTier::Unbounded) => {}
        }
        let mut previous: Option<u32> = None;
        for tier in &search.sizes[1..] {
            let SizeTier::Bounded(px) = *tier else {
                return Err(ConfigError::Validation(
                    "search.sizes may contain \"unbounded\" only once, first".into(),
                ));
            };
            if previous.is_some_and(|prev| px >= prev) {
                return Err(ConfigError::Validation(format!(
                    "search.sizes must be strictly descending (found {px} after {})",
                    previous.unwrap_or_default()
                )));
            }
            previous = Some(px);
        }
        Ok(())
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer that file and flag overrides are merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(OptimizerConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge overlays in order onto the stock defaults, then deserialize and validate.
pub fn resolve_config(
    overlays: impl IntoIterator<Item = toml::Value>,
) -> Result<OptimizerConfig, ConfigError> {
    let merged = overlays
        .into_iter()
        .fold(stock_defaults_value()?, merge_toml);
    let config: OptimizerConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path` (if it exists) with `flags` layered on top.
///
/// An explicitly requested file that is missing is an error; the implicit
/// [`DEFAULT_CONFIG_FILE`] is optional.
pub fn load_config(
    path: Option<&Path>,
    flags: &FlagOverrides,
) -> Result<OptimizerConfig, ConfigError> {
    let file = match path {
        Some(explicit) => Some(load_raw_config(explicit)?.ok_or_else(|| {
            ConfigError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("config file not found: {}", explicit.display()),
            ))
        })?),
        None => load_raw_config(Path::new(DEFAULT_CONFIG_FILE))?,
    };
    let overlays = file.into_iter().chain(Some(flags.to_overlay()?));
    resolve_config(overlays)
}

/// Values given on the command line. `None` leaves the lower layer alone.
#[derive(Debug, Clone, Default)]
pub struct FlagOverrides {
    pub min_quality: Option<i32>,
    pub quality_step: Option<u32>,
    pub target_size: Option<u64>,
    pub sizes: Option<Vec<SizeTier>>,
    pub overwrite: Option<bool>,
}

#[derive(Serialize)]
struct SearchOverlay<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    min_quality: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    quality_step: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sizes: Option<&'a [SizeTier]>,
}

#[derive(Serialize)]
struct OutputOverlay {
    #[serde(skip_serializing_if = "Option::is_none")]
    overwrite: Option<bool>,
}

#[derive(Serialize)]
struct Overlay<'a> {
    search: SearchOverlay<'a>,
    output: OutputOverlay,
}

impl FlagOverrides {
    /// Express the flags as a sparse TOML table so they merge like a file.
    pub fn to_overlay(&self) -> Result<toml::Value, ConfigError> {
        let overlay = Overlay {
            search: SearchOverlay {
                min_quality: self.min_quality,
                quality_step: self.quality_step,
                target_size: self.target_size,
                sizes: self.sizes.as_deref(),
            },
            output: OutputOverlay {
                overwrite: self.overwrite,
            },
        };
        Ok(toml::Value::try_from(overlay)?)
    }
}

/// Returns a fully-commented stock config file with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Photo Optimizer Configuration
# =============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Picked up from ./photo-optimizer.toml, or pass --config <FILE>.
# Command-line flags override anything set here.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Size/quality search
# ---------------------------------------------------------------------------
[search]
# Lowest JPEG quality tried at each size before shrinking (0-100).
min_quality = 80

# Quality decrement between attempts: 100, 95, 90, ...
quality_step = 5

# Byte budget. The output must be strictly smaller than this (8 MiB).
target_size = 8388608

# Longer-edge limits in pixels, tried largest first.
# "unbounded" keeps the original resolution and must come first.
sizes = ["unbounded", 3200, 2800, 2400, 2000, 1600, 1200, 900, 600]

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# Replace an existing file with the same name instead of failing.
overwrite = false
"##
}
