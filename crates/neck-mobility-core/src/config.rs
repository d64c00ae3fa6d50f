//! Tunable parameters for landmark stabilization and capture validation.
//!
//! [`MobilityConfig`] gathers the heuristics the pipeline applies before the
//! classifier sees an angle. The classification boundaries themselves are not
//! part of the configuration; they live in [`crate::classify`] as constants.
//!
//! # Example
//!
//! ```rust
//! use neck_mobility_core::config::MobilityConfig;
//!
//! let cfg = MobilityConfig::default();
//! cfg.validate().expect("default config is valid");
//!
//! assert_eq!(cfg.anchor_vertical_ratio, 0.7);
//! assert_eq!(cfg.shoulder_tilt_threshold_deg, 10.0);
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "serde")]
use std::path::Path;

use crate::error::ConfigError;
use crate::DEFAULT_VISIBILITY_THRESHOLD;

/// Configuration for one assessment flow.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MobilityConfig {
    // -----------------------------------------------------------------------
    // Detection
    // -----------------------------------------------------------------------
    /// Keypoints must have visibility strictly above this to be used.
    /// Default: **0.5**.
    pub visibility_threshold: f64,

    // -----------------------------------------------------------------------
    // Anchor estimation
    // -----------------------------------------------------------------------
    /// Fraction of the ear→shoulder vector at which the anchor is placed.
    /// Default: **0.7**.
    pub anchor_vertical_ratio: f64,

    /// Fraction of the horizontal shoulder→elbow distance pushed outward.
    /// Default: **0.15**.
    pub anchor_lateral_ratio: f64,

    // -----------------------------------------------------------------------
    // Stabilization
    // -----------------------------------------------------------------------
    /// How far each anchor's y moves toward the pair's mean y.
    /// Default: **0.3**.
    pub bilateral_blend_factor: f64,

    /// EMA weight of the current frame in temporal smoothing.
    /// Default: **0.6**.
    pub smoothing_alpha: f64,

    // -----------------------------------------------------------------------
    // Capture validation
    // -----------------------------------------------------------------------
    /// Largest accepted shoulder tilt during a side-bend capture, in degrees.
    /// Default: **10.0**.
    pub shoulder_tilt_threshold_deg: f64,

    /// Reject tilt captures whose shoulder tilt exceeds the threshold.
    /// Default: **true**.
    pub enforce_shoulder_level: bool,
}

impl Default for MobilityConfig {
    fn default() -> Self {
        MobilityConfig {
            visibility_threshold: DEFAULT_VISIBILITY_THRESHOLD,
            anchor_vertical_ratio: 0.7,
            anchor_lateral_ratio: 0.15,
            bilateral_blend_factor: 0.3,
            smoothing_alpha: 0.6,
            shoulder_tilt_threshold_deg: 10.0,
            enforce_shoulder_level: true,
        }
    }
}

impl MobilityConfig {
    /// Load a [`MobilityConfig`] from a JSON file at `path`.
    ///
    /// Missing fields take their default values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileRead`] if the file cannot be opened,
    /// [`ConfigError::ParseError`] if the JSON is malformed, and
    /// [`ConfigError::InvalidValue`] if a field fails validation.
    #[cfg(feature = "serde")]
    pub fn from_json(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: MobilityConfig =
            serde_json::from_str(&contents).map_err(|source| ConfigError::ParseError {
                path: path.to_path_buf(),
                source,
            })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Serialize this configuration to pretty-printed JSON and write it to
    /// `path`, creating parent directories if necessary.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileRead`] if the directory cannot be created or
    /// the file cannot be written.
    #[cfg(feature = "serde")]
    pub fn to_json(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::FileRead {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::invalid_value("(serialization)", e.to_string()))?;
        std::fs::write(path, json).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(())
    }

    /// Validate all fields and return an error describing the first problem
    /// found, or `Ok(())` if the configuration is coherent.
    ///
    /// # Validated invariants
    ///
    /// - `visibility_threshold` lies in `[0, 1)`.
    /// - `anchor_vertical_ratio` lies in `(0, 1)` so the anchor stays between
    ///   ear and shoulder.
    /// - `anchor_lateral_ratio` and `bilateral_blend_factor` lie in `[0, 1]`.
    /// - `smoothing_alpha` lies in `(0, 1]`.
    /// - `shoulder_tilt_threshold_deg` is finite and in `(0, 90)`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..1.0).contains(&self.visibility_threshold) {
            return Err(ConfigError::invalid_value(
                "visibility_threshold",
                "must be in [0, 1)",
            ));
        }
        if !(self.anchor_vertical_ratio > 0.0 && self.anchor_vertical_ratio < 1.0) {
            return Err(ConfigError::invalid_value(
                "anchor_vertical_ratio",
                "must be in (0, 1)",
            ));
        }
        if !(0.0..=1.0).contains(&self.anchor_lateral_ratio) {
            return Err(ConfigError::invalid_value(
                "anchor_lateral_ratio",
                "must be in [0, 1]",
            ));
        }
        if !(0.0..=1.0).contains(&self.bilateral_blend_factor) {
            return Err(ConfigError::invalid_value(
                "bilateral_blend_factor",
                "must be in [0, 1]",
            ));
        }
        if !(self.smoothing_alpha > 0.0 && self.smoothing_alpha <= 1.0) {
            return Err(ConfigError::invalid_value(
                "smoothing_alpha",
                "must be in (0, 1]",
            ));
        }
        if !(self.shoulder_tilt_threshold_deg > 0.0 && self.shoulder_tilt_threshold_deg < 90.0) {
            return Err(ConfigError::invalid_value(
                "shoulder_tilt_threshold_deg",
                format!("must be in (0, 90), got {}", self.shoulder_tilt_threshold_deg),
            ));
        }
        Ok(())
    }
}
