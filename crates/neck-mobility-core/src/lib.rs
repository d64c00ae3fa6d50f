//! # Neck Mobility Core
//!
//! Measurement and classification core for a lateral neck-flexion assessment.
//!
//! The subject is captured three times (head neutral, bent right, bent left).
//! An external pose engine turns each capture into 33 landmarks; this crate
//! turns the landmarks into angles, classifies each side's flexibility and the
//! left/right asymmetry, and produces ordered advisory recommendations.
//!
//! - **Types**: [`Keypoint`], [`LandmarkSet`], [`LandmarkFrame`],
//!   [`Measurement`] and [`DiagnosisResult`] in the [`types`] module.
//! - **Pipeline**: [`anchor`] (shoulder anchors), [`stabilize`] (noise
//!   reduction), [`angle`] (geometry), [`analyzer`] (per-capture composition).
//! - **Assessment**: [`classify`], [`recommend`] and the [`session`] state
//!   machine.
//! - **Errors**: [`MobilityError`] and [`ConfigError`] in [`error`].
//!
//! ## Feature Flags
//!
//! - `serde` (default): serialization of all public data types and JSON
//!   configuration files
//!
//! ## Example
//!
//! ```rust
//! use neck_mobility_core::prelude::*;
//!
//! let mut session = DiagnosisSession::new();
//! for (capture, angle) in [
//!     (CaptureType::Neutral, 0.0),
//!     (CaptureType::RightTilt, 45.0),
//!     (CaptureType::LeftTilt, -28.0),
//! ] {
//!     let m = Measurement::new(capture, LandmarkSet::empty(), angle, 0.0);
//!     session.record_measurement(capture, m).unwrap();
//! }
//!
//! let result = session.compute_diagnosis().unwrap();
//! assert_eq!(result.left_flexibility_level, FlexibilityLevel::Stiff);
//! assert_eq!(result.asymmetry_level, AsymmetryLevel::Significant);
//! ```

#![forbid(unsafe_code)]

pub mod analyzer;
pub mod anchor;
pub mod angle;
pub mod classify;
pub mod config;
pub mod error;
pub mod recommend;
pub mod session;
pub mod stabilize;
pub mod traits;
pub mod types;

#[cfg(test)]
mod fixtures;

// Re-export commonly used types at the crate root
pub use analyzer::MeasurementAnalyzer;
pub use classify::{classify_asymmetry, classify_flexibility, AsymmetryLevel, FlexibilityLevel};
pub use config::MobilityConfig;
pub use error::{ConfigError, MobilityError, MobilityResult};
pub use recommend::Recommendation;
pub use session::{DiagnosisSession, SessionState};
pub use traits::PoseSource;
pub use types::{
    // Detector types
    FaceMesh, Keypoint, LandmarkFrame, LandmarkIndex, LandmarkSet, PoseDetection,
    // Derived geometry
    AnatomicalAnchor, AnchorQuality, Point2D,
    // Session types
    CaptureType, DiagnosisResult, Measurement, Side,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Number of slots in a pose landmark set (MediaPipe Pose topology)
pub const LANDMARK_COUNT: usize = 33;

/// Default visibility a keypoint must exceed to be used
pub const DEFAULT_VISIBILITY_THRESHOLD: f64 = 0.5;

/// Prelude module for convenient imports.
///
/// ```rust
/// use neck_mobility_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::analyzer::MeasurementAnalyzer;
    pub use crate::classify::{AsymmetryLevel, FlexibilityLevel};
    pub use crate::config::MobilityConfig;
    pub use crate::error::{MobilityError, MobilityResult};
    pub use crate::recommend::Recommendation;
    pub use crate::session::{DiagnosisSession, SessionState};
    pub use crate::traits::PoseSource;
    pub use crate::types::{
        CaptureType, DiagnosisResult, FaceMesh, Keypoint, LandmarkFrame, LandmarkIndex,
        LandmarkSet, Measurement, PoseDetection, Side,
    };
}
