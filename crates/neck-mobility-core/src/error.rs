//! Error types for the neck mobility assessment core.
//!
//! This module provides error handling using [`thiserror`] for automatic
//! `Display` and `Error` trait implementations.
//!
//! # Error Hierarchy
//!
//! - [`MobilityError`]: Top-level error type returned by every fallible
//!   operation in the crate
//! - [`ConfigError`]: Errors raised while loading or validating a
//!   [`MobilityConfig`](crate::config::MobilityConfig)
//!
//! Recoverable failures (a landmark was not visible, the shoulders were not
//! level) are ordinary values the caller branches on to request a re-capture.
//! Contract violations such as [`MobilityError::IncompleteMeasurementSet`]
//! indicate a programming error in the calling flow.
//!
//! # Example
//!
//! ```rust
//! use neck_mobility_core::error::MobilityError;
//! use neck_mobility_core::LandmarkIndex;
//!
//! fn head_reference() -> Result<(), MobilityError> {
//!     Err(MobilityError::missing_landmark(LandmarkIndex::Nose))
//! }
//!
//! assert!(head_reference().unwrap_err().is_recoverable());
//! ```

use std::path::PathBuf;

use thiserror::Error;

use crate::types::{CaptureType, LandmarkIndex};

/// A specialized `Result` type for mobility operations.
pub type MobilityResult<T> = Result<T, MobilityError>;

/// Top-level error type for the neck mobility core.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum MobilityError {
    /// A required keypoint is absent or below the visibility threshold.
    #[error("Missing landmark: {landmark} ({reason})")]
    MissingLandmark {
        /// Name of the landmark or derived reference that could not be resolved
        landmark: &'static str,
        /// What made it unusable
        reason: &'static str,
    },

    /// The shoulders were not level enough during a tilt capture.
    #[error("Shoulder tilt {angle:.1}° exceeds the accepted {threshold:.1}° compensation limit")]
    ShoulderTiltExceeded {
        /// Measured shoulder-tilt angle in degrees
        angle: f64,
        /// Configured compensation threshold in degrees
        threshold: f64,
    },

    /// The geometry does not define an angle (coincident or vertically aligned points).
    #[error("Degenerate geometry: {reason}")]
    DegenerateGeometry {
        /// Description of the degenerate configuration
        reason: &'static str,
    },

    /// A diagnosis was requested before every capture type was recorded.
    #[error("Incomplete measurement set: missing {}", format_captures(.missing))]
    IncompleteMeasurementSet {
        /// Capture types that have not been recorded yet
        missing: Vec<CaptureType>,
    },

    /// The pose engine reported that no person was detected.
    #[error("No pose detected in the {capture} capture")]
    NoPoseDetected {
        /// Capture the detection was requested for
        capture: CaptureType,
    },

    /// Multi-sample aggregation was invoked with no samples.
    #[error("Cannot aggregate an empty landmark sample set")]
    EmptySampleSet,

    /// The pose engine returned a keypoint list of the wrong length.
    #[error("Invalid landmark count: expected {expected}, got {actual}")]
    InvalidLandmarkCount {
        /// Expected number of landmark slots
        expected: usize,
        /// Number of slots received
        actual: usize,
    },

    /// A measurement was recorded under a different capture type than it was taken for.
    #[error("Capture type mismatch: recording as {expected}, measurement was taken as {actual}")]
    CaptureTypeMismatch {
        /// Slot the caller tried to record into
        expected: CaptureType,
        /// Capture type carried by the measurement
        actual: CaptureType,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl MobilityError {
    /// Creates a missing-landmark error for a detector keypoint slot.
    #[must_use]
    pub fn missing_landmark(index: LandmarkIndex) -> Self {
        Self::MissingLandmark {
            landmark: index.name(),
            reason: "not detected or below visibility threshold",
        }
    }

    /// Creates a missing-landmark error for a derived reference point.
    #[must_use]
    pub fn missing_reference(landmark: &'static str, reason: &'static str) -> Self {
        Self::MissingLandmark { landmark, reason }
    }

    /// Creates a degenerate-geometry error.
    #[must_use]
    pub fn degenerate(reason: &'static str) -> Self {
        Self::DegenerateGeometry { reason }
    }

    /// Returns `true` if the caller should resolve this by re-capturing the pose.
    ///
    /// Contract violations (incomplete sessions, mismatched capture types,
    /// malformed input, bad configuration) are not recoverable by re-capture.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::MissingLandmark { .. }
            | Self::ShoulderTiltExceeded { .. }
            | Self::DegenerateGeometry { .. }
            | Self::NoPoseDetected { .. } => true,
            Self::IncompleteMeasurementSet { .. }
            | Self::EmptySampleSet
            | Self::InvalidLandmarkCount { .. }
            | Self::CaptureTypeMismatch { .. }
            | Self::Config(_) => false,
        }
    }
}

fn format_captures(captures: &[CaptureType]) -> String {
    captures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors produced when loading or validating a [`MobilityConfig`].
///
/// [`MobilityConfig`]: crate::config::MobilityConfig
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A field has an invalid value.
    #[error("Invalid value for `{field}`: {reason}")]
    InvalidValue {
        /// Name of the field.
        field: &'static str,
        /// Human-readable reason.
        reason: String,
    },

    /// A configuration file could not be read from or written to disk.
    #[error("Cannot access config file `{path}`: {source}")]
    FileRead {
        /// Path that was being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A configuration file contains malformed JSON.
    #[cfg(feature = "serde")]
    #[error("Cannot parse config file `{path}`: {source}")]
    ParseError {
        /// Path that was being parsed.
        path: PathBuf,
        /// Underlying JSON parse error.
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    /// Construct a [`ConfigError::InvalidValue`].
    pub fn invalid_value<S: Into<String>>(field: &'static str, reason: S) -> Self {
        ConfigError::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        assert!(MobilityError::missing_landmark(LandmarkIndex::LeftEar).is_recoverable());
        assert!(MobilityError::ShoulderTiltExceeded {
            angle: 12.0,
            threshold: 10.0
        }
        .is_recoverable());
        assert!(MobilityError::degenerate("anchors vertically aligned").is_recoverable());
        assert!(!MobilityError::IncompleteMeasurementSet {
            missing: vec![CaptureType::LeftTilt]
        }
        .is_recoverable());
        assert!(!MobilityError::EmptySampleSet.is_recoverable());
    }

    #[test]
    fn test_incomplete_message_lists_missing_captures() {
        let err = MobilityError::IncompleteMeasurementSet {
            missing: vec![CaptureType::RightTilt, CaptureType::LeftTilt],
        };
        let msg = err.to_string();
        assert!(msg.contains("right tilt"), "{msg}");
        assert!(msg.contains("left tilt"), "{msg}");
    }

    #[test]
    fn test_shoulder_tilt_message_carries_angle() {
        let err = MobilityError::ShoulderTiltExceeded {
            angle: 13.24,
            threshold: 10.0,
        };
        assert!(err.to_string().contains("13.2"));
    }

    #[test]
    fn test_config_error_converts() {
        let err: MobilityError = ConfigError::invalid_value("smoothing_alpha", "must be in (0, 1]").into();
        assert!(matches!(err, MobilityError::Config(_)));
        assert!(!err.is_recoverable());
    }
}
