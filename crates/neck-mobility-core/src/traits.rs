//! Boundary with the external pose-estimation engine.
//!
//! The core never runs pose estimation itself. Anything that can turn a
//! capture into landmark detections (a live engine binding, a replay file, a
//! test double) implements [`PoseSource`] and hands the results to
//! [`DiagnosisSession::capture_from`](crate::session::DiagnosisSession::capture_from).

use crate::error::MobilityResult;
use crate::types::{CaptureType, PoseDetection};

/// Supplier of resolved pose detections for a capture.
///
/// # Example
///
/// ```rust
/// use neck_mobility_core::prelude::*;
///
/// struct NobodyHome;
///
/// impl PoseSource for NobodyHome {
///     fn detect(&mut self, _capture: CaptureType) -> MobilityResult<Vec<PoseDetection>> {
///         Ok(vec![PoseDetection::NoPose])
///     }
/// }
///
/// let mut session = DiagnosisSession::new();
/// let err = session.capture_from(CaptureType::Neutral, &mut NobodyHome).unwrap_err();
/// assert!(err.is_recoverable());
/// ```
pub trait PoseSource {
    /// Returns one or more detection passes over the image for `capture_type`.
    ///
    /// Several passes over the same still image are median-aggregated by the
    /// caller. A pass that found nobody is reported as
    /// [`PoseDetection::NoPose`], not as an error.
    ///
    /// # Errors
    ///
    /// Implementation-defined; typically malformed engine output.
    fn detect(&mut self, capture_type: CaptureType) -> MobilityResult<Vec<PoseDetection>>;
}

impl<S: PoseSource + ?Sized> PoseSource for &mut S {
    fn detect(&mut self, capture_type: CaptureType) -> MobilityResult<Vec<PoseDetection>> {
        (**self).detect(capture_type)
    }
}

impl<S: PoseSource + ?Sized> PoseSource for Box<S> {
    fn detect(&mut self, capture_type: CaptureType) -> MobilityResult<Vec<PoseDetection>> {
        (**self).detect(capture_type)
    }
}
