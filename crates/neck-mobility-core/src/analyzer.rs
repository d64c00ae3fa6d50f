//! Per-capture analysis: landmarks in, [`Measurement`] out.
//!
//! [`MeasurementAnalyzer`] runs the per-capture steps in order:
//!
//! ```text
//! PoseDetection ─► anchors ─► bilateral blend ─► shoulder tilt ─► compensation check
//!                                   │                                  (tilt captures)
//!                                   └─► chest ref ─┐
//!               head reference ────────────────────┴─► neck tilt ─► Measurement
//! ```
//!
//! Multiple detections of the same still image are median-aggregated first.

use tracing::{debug, info, warn};

use crate::anchor::estimate_anchor_pair;
use crate::angle::{
    check_shoulder_compensation, chest_reference, head_reference, neck_tilt_angle,
    shoulder_tilt_angle,
};
use crate::config::MobilityConfig;
use crate::error::{MobilityError, MobilityResult};
use crate::stabilize::{bilateral_blend, median_aggregate, LandmarkSmoother};
use crate::types::{CaptureType, LandmarkFrame, LandmarkSet, Measurement, PoseDetection};

/// Turns pose-engine output into measurements.
#[derive(Debug, Clone, Default)]
pub struct MeasurementAnalyzer {
    config: MobilityConfig,
}

impl MeasurementAnalyzer {
    /// Creates an analyzer with a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MobilityError::Config`] if `config` fails validation.
    pub fn new(config: MobilityConfig) -> MobilityResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &MobilityConfig {
        &self.config
    }

    /// Temporal smoother for live previews, using the configured
    /// [`smoothing_alpha`](MobilityConfig::smoothing_alpha).
    #[must_use]
    pub fn smoother(&self) -> LandmarkSmoother {
        LandmarkSmoother::from_config(&self.config)
    }

    /// Analyzes a single detection.
    ///
    /// # Errors
    ///
    /// [`MobilityError::NoPoseDetected`] for a no-pose signal, otherwise any
    /// failure of [`analyze_frame`](Self::analyze_frame).
    pub fn analyze(&self, capture_type: CaptureType, detection: &PoseDetection) -> MobilityResult<Measurement> {
        match detection {
            PoseDetection::Detected(frame) => self.analyze_frame(capture_type, frame),
            PoseDetection::NoPose => Err(MobilityError::NoPoseDetected {
                capture: capture_type,
            }),
        }
    }

    /// Analyzes several detection passes over the same still image.
    ///
    /// No-pose passes are skipped and the remaining pose landmarks are
    /// median-aggregated. The first face mesh found, if any, is kept.
    ///
    /// # Errors
    ///
    /// [`MobilityError::EmptySampleSet`] when `detections` is empty,
    /// [`MobilityError::NoPoseDetected`] when no pass found a pose, otherwise
    /// any failure of [`analyze_frame`](Self::analyze_frame).
    pub fn analyze_samples(
        &self,
        capture_type: CaptureType,
        detections: &[PoseDetection],
    ) -> MobilityResult<Measurement> {
        if detections.is_empty() {
            return Err(MobilityError::EmptySampleSet);
        }
        let frames: Vec<&LandmarkFrame> = detections.iter().filter_map(PoseDetection::frame).collect();
        if frames.is_empty() {
            return Err(MobilityError::NoPoseDetected {
                capture: capture_type,
            });
        }
        if let [frame] = frames.as_slice() {
            return self.analyze_frame(capture_type, frame);
        }

        debug!(
            capture = %capture_type,
            passes = detections.len(),
            detected = frames.len(),
            "aggregating detection passes"
        );
        let poses: Vec<LandmarkSet> = frames.iter().map(|f| f.pose().clone()).collect();
        let pose = median_aggregate(&poses, self.config.visibility_threshold)?;
        let face_mesh = frames.iter().find_map(|f| f.face_mesh()).cloned();
        self.analyze_frame(capture_type, &LandmarkFrame::from_detection(pose, face_mesh))
    }

    /// Computes the neck-tilt and shoulder-tilt angles of one frame.
    ///
    /// # Errors
    ///
    /// - [`MobilityError::MissingLandmark`] if a shoulder is missing or not
    ///   visible, or every head landmark is missing.
    /// - [`MobilityError::DegenerateGeometry`] if an angle is undefined.
    /// - [`MobilityError::ShoulderTiltExceeded`] for tilt captures whose
    ///   shoulders were not level, unless
    ///   [`enforce_shoulder_level`](MobilityConfig::enforce_shoulder_level)
    ///   is off.
    pub fn analyze_frame(&self, capture_type: CaptureType, frame: &LandmarkFrame) -> MobilityResult<Measurement> {
        let pose = frame.pose();

        let anchors = estimate_anchor_pair(pose, &self.config);
        anchors.require_shoulders(self.config.visibility_threshold)?;
        if anchors.is_degraded() {
            warn!(capture = %capture_type, "using degraded shoulder anchors");
        }
        let anchors = bilateral_blend(&anchors, self.config.bilateral_blend_factor);

        let shoulder_tilt = shoulder_tilt_angle(&anchors.left, &anchors.right)?;
        if capture_type.is_tilt() && self.config.enforce_shoulder_level {
            check_shoulder_compensation(shoulder_tilt, self.config.shoulder_tilt_threshold_deg)?;
        }

        let head = head_reference(frame, self.config.visibility_threshold)?;
        let chest = chest_reference(&anchors.left, &anchors.right);
        let neck_tilt = neck_tilt_angle(head.point, chest)?;

        info!(
            capture = %capture_type,
            neck_tilt,
            shoulder_tilt,
            head_source = ?head.source,
            "capture analyzed"
        );
        Ok(Measurement::new(capture_type, pose.clone(), neck_tilt, shoulder_tilt))
    }
}
