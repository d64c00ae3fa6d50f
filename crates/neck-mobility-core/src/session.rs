//! Three-capture assessment session.
//!
//! A [`DiagnosisSession`] holds at most one [`Measurement`] per
//! [`CaptureType`]. Recording a capture type again replaces its measurement
//! wholesale. Once all three are present the session can produce a
//! [`DiagnosisResult`]. The result is computed once and kept until a
//! measurement changes or the session is reset.
//!
//! ```text
//!   Empty ──record──► Partial(1) ──record──► Partial(2) ──record──► Complete
//!     ▲                                                                │
//!     └───────────────────────────── reset ───────────────────────────┘
//! ```

use chrono::Utc;
use tracing::{debug, info};

use crate::analyzer::MeasurementAnalyzer;
use crate::angle::lateral_flexion;
use crate::classify::{classify_asymmetry, classify_flexibility};
use crate::config::MobilityConfig;
use crate::error::{MobilityError, MobilityResult};
use crate::recommend::{generate_recommendations, stiffer_side};
use crate::traits::PoseSource;
use crate::types::{CaptureType, DiagnosisResult, Measurement, PoseDetection};

/// How many of the three captures a session holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing recorded
    Empty,
    /// One or two capture types recorded
    Partial(usize),
    /// All three capture types recorded
    Complete,
}

impl SessionState {
    fn from_count(count: usize) -> Self {
        match count {
            0 => Self::Empty,
            n if n >= CaptureType::all().len() => Self::Complete,
            n => Self::Partial(n),
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty"),
            Self::Partial(n) => write!(f, "partial ({n}/3)"),
            Self::Complete => write!(f, "complete"),
        }
    }
}

/// Measurements of one assessment flow.
///
/// Owned by a single flow; all mutation goes through `&mut self`.
#[derive(Debug, Clone, Default)]
pub struct DiagnosisSession {
    analyzer: MeasurementAnalyzer,
    measurements: [Option<Measurement>; 3],
    diagnosis: Option<DiagnosisResult>,
}

impl DiagnosisSession {
    /// Creates an empty session with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty session with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MobilityError::Config`] if `config` fails validation.
    pub fn with_config(config: MobilityConfig) -> MobilityResult<Self> {
        Ok(Self {
            analyzer: MeasurementAnalyzer::new(config)?,
            measurements: Default::default(),
            diagnosis: None,
        })
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &MobilityConfig {
        self.analyzer.config()
    }

    /// Records a measurement, returning the one it replaced.
    ///
    /// # Errors
    ///
    /// Returns [`MobilityError::CaptureTypeMismatch`] if the measurement was
    /// taken for a different capture type.
    pub fn record_measurement(
        &mut self,
        capture_type: CaptureType,
        measurement: Measurement,
    ) -> MobilityResult<Option<Measurement>> {
        if measurement.capture_type != capture_type {
            return Err(MobilityError::CaptureTypeMismatch {
                expected: capture_type,
                actual: measurement.capture_type,
            });
        }
        let (_, previous) = self.store(measurement);
        Ok(previous)
    }

    /// Analyzes a detection and records the resulting measurement.
    ///
    /// A failed analysis leaves any earlier measurement of the same type in
    /// place.
    ///
    /// # Errors
    ///
    /// Any failure of [`MeasurementAnalyzer::analyze`].
    pub fn capture(&mut self, capture_type: CaptureType, detection: &PoseDetection) -> MobilityResult<&Measurement> {
        let measurement = self.analyzer.analyze(capture_type, detection)?;
        Ok(self.store(measurement).0)
    }

    /// Pulls detections for `capture_type` from a pose source and records
    /// the aggregated measurement.
    ///
    /// # Errors
    ///
    /// Failures of the source, or of
    /// [`MeasurementAnalyzer::analyze_samples`].
    pub fn capture_from<S: PoseSource + ?Sized>(
        &mut self,
        capture_type: CaptureType,
        source: &mut S,
    ) -> MobilityResult<&Measurement> {
        let detections = source.detect(capture_type)?;
        let measurement = self.analyzer.analyze_samples(capture_type, &detections)?;
        Ok(self.store(measurement).0)
    }

    /// Measurement recorded for `capture_type`, if any.
    #[must_use]
    pub fn measurement(&self, capture_type: CaptureType) -> Option<&Measurement> {
        self.measurements[capture_type.index()].as_ref()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        SessionState::from_count(self.measurements.iter().flatten().count())
    }

    /// Returns `true` once all three capture types are recorded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state() == SessionState::Complete
    }

    /// Capture types not yet recorded, in protocol order.
    #[must_use]
    pub fn missing_captures(&self) -> Vec<CaptureType> {
        CaptureType::all()
            .iter()
            .copied()
            .filter(|c| self.measurement(*c).is_none())
            .collect()
    }

    /// Computes the diagnosis from the three recorded measurements.
    ///
    /// Repeated calls return the same result, `computed_at` included, until
    /// a measurement is recorded or the session is reset.
    ///
    /// # Errors
    ///
    /// Returns [`MobilityError::IncompleteMeasurementSet`] listing the missing
    /// capture types if the session is not complete.
    pub fn compute_diagnosis(&mut self) -> MobilityResult<DiagnosisResult> {
        if let Some(diagnosis) = &self.diagnosis {
            return Ok(diagnosis.clone());
        }

        let (Some(neutral), Some(right), Some(left)) = (
            self.measurement(CaptureType::Neutral),
            self.measurement(CaptureType::RightTilt),
            self.measurement(CaptureType::LeftTilt),
        ) else {
            return Err(MobilityError::IncompleteMeasurementSet {
                missing: self.missing_captures(),
            });
        };

        let diagnosis = diagnose_angles(
            neutral.neck_tilt_angle,
            right.neck_tilt_angle,
            left.neck_tilt_angle,
        );
        Ok(self.diagnosis.insert(diagnosis).clone())
    }

    /// Last computed diagnosis, if still current.
    #[must_use]
    pub fn diagnosis(&self) -> Option<&DiagnosisResult> {
        self.diagnosis.as_ref()
    }

    /// Discards all measurements and any computed diagnosis.
    pub fn reset(&mut self) {
        debug!(from = %self.state(), "session reset");
        self.measurements = Default::default();
        self.diagnosis = None;
    }

    fn store(&mut self, measurement: Measurement) -> (&Measurement, Option<Measurement>) {
        let capture_type = measurement.capture_type;
        let before = self.state();
        let previous = self.measurements[capture_type.index()].take();
        self.diagnosis = None;
        let after = SessionState::from_count(self.measurements.iter().flatten().count() + 1);
        debug!(
            capture = %capture_type,
            replaced = previous.is_some(),
            from = %before,
            to = %after,
            "measurement recorded"
        );
        let stored: &Measurement = self.measurements[capture_type.index()].insert(measurement);
        (stored, previous)
    }
}

/// Builds a diagnosis from the three neck-tilt angles.
#[must_use]
pub fn diagnose_angles(neutral_angle: f64, right_tilt_angle: f64, left_tilt_angle: f64) -> DiagnosisResult {
    let right_flexion = lateral_flexion(neutral_angle, right_tilt_angle);
    let left_flexion = lateral_flexion(neutral_angle, left_tilt_angle);
    let right_level = classify_flexibility(right_flexion);
    let left_level = classify_flexibility(left_flexion);
    let asymmetry_diff = (right_flexion - left_flexion).abs();
    let asymmetry = classify_asymmetry(asymmetry_diff);

    let recommendations =
        generate_recommendations(right_level, left_level, asymmetry, right_flexion, left_flexion);

    info!(
        right_flexion,
        left_flexion,
        asymmetry_diff,
        %asymmetry,
        "diagnosis computed"
    );

    DiagnosisResult {
        neutral_angle,
        right_flexion_angle: right_flexion,
        left_flexion_angle: left_flexion,
        right_flexibility_level: right_level,
        left_flexibility_level: left_level,
        asymmetry_level: asymmetry,
        asymmetry_diff,
        stiffer_side: stiffer_side(right_flexion, left_flexion),
        recommendations: recommendations.iter().map(ToString::to_string).collect(),
        computed_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{AsymmetryLevel, FlexibilityLevel};
    use crate::fixtures::{tilted_pose, upright_pose};
    use crate::types::{LandmarkSet, Side};
    use approx::assert_abs_diff_eq;

    fn measurement(capture_type: CaptureType, angle: f64) -> Measurement {
        Measurement::new(capture_type, LandmarkSet::empty(), angle, 0.0)
    }

    fn complete_session(neutral: f64, right: f64, left: f64) -> DiagnosisSession {
        let mut session = DiagnosisSession::new();
        for (capture, angle) in [
            (CaptureType::Neutral, neutral),
            (CaptureType::RightTilt, right),
            (CaptureType::LeftTilt, left),
        ] {
            session.record_measurement(capture, measurement(capture, angle)).unwrap();
        }
        session
    }

    #[test]
    fn state_follows_recorded_count() {
        let mut session = DiagnosisSession::new();
        assert_eq!(session.state(), SessionState::Empty);

        session
            .record_measurement(CaptureType::LeftTilt, measurement(CaptureType::LeftTilt, -20.0))
            .unwrap();
        assert_eq!(session.state(), SessionState::Partial(1));
        assert_eq!(
            session.missing_captures(),
            vec![CaptureType::Neutral, CaptureType::RightTilt]
        );

        session
            .record_measurement(CaptureType::Neutral, measurement(CaptureType::Neutral, 1.0))
            .unwrap();
        session
            .record_measurement(CaptureType::RightTilt, measurement(CaptureType::RightTilt, 30.0))
            .unwrap();
        assert!(session.is_complete());

        session.reset();
        assert_eq!(session.state(), SessionState::Empty);
        assert!(session.measurement(CaptureType::Neutral).is_none());
    }

    #[test]
    fn incomplete_session_cannot_diagnose() {
        let mut session = DiagnosisSession::new();
        session
            .record_measurement(CaptureType::Neutral, measurement(CaptureType::Neutral, 0.0))
            .unwrap();
        session
            .record_measurement(CaptureType::RightTilt, measurement(CaptureType::RightTilt, 40.0))
            .unwrap();

        match session.compute_diagnosis() {
            Err(MobilityError::IncompleteMeasurementSet { missing }) => {
                assert_eq!(missing, vec![CaptureType::LeftTilt]);
            }
            other => panic!("expected IncompleteMeasurementSet, got {other:?}"),
        }
    }

    #[test]
    fn re_record_replaces_only_its_type() {
        let mut session = complete_session(0.0, 45.0, -28.0);
        let previous = session
            .record_measurement(CaptureType::LeftTilt, measurement(CaptureType::LeftTilt, -44.0))
            .unwrap();

        assert_abs_diff_eq!(previous.unwrap().neck_tilt_angle, -28.0);
        assert_eq!(session.state(), SessionState::Complete);
        assert_abs_diff_eq!(
            session.measurement(CaptureType::Neutral).unwrap().neck_tilt_angle,
            0.0
        );
        assert_abs_diff_eq!(
            session.measurement(CaptureType::RightTilt).unwrap().neck_tilt_angle,
            45.0
        );
        let result = session.compute_diagnosis().unwrap();
        assert_abs_diff_eq!(result.left_flexion_angle, 44.0);
        assert_eq!(result.asymmetry_level, AsymmetryLevel::Normal);
    }

    #[test]
    fn diagnosis_is_computed_once_per_measurement_set() {
        let mut session = complete_session(0.0, 45.0, -28.0);
        assert!(session.diagnosis().is_none());

        let first = session.compute_diagnosis().unwrap();
        let again = session.compute_diagnosis().unwrap();
        assert_eq!(first.computed_at, again.computed_at);
        assert_eq!(session.diagnosis(), Some(&first));

        session
            .record_measurement(CaptureType::LeftTilt, measurement(CaptureType::LeftTilt, -44.0))
            .unwrap();
        assert!(session.diagnosis().is_none());
        let updated = session.compute_diagnosis().unwrap();
        assert_abs_diff_eq!(updated.left_flexion_angle, 44.0);

        session.reset();
        assert!(session.diagnosis().is_none());
    }

    #[test]
    fn mismatched_capture_type_is_rejected() {
        let mut session = DiagnosisSession::new();
        let err = session
            .record_measurement(CaptureType::Neutral, measurement(CaptureType::RightTilt, 10.0))
            .unwrap_err();
        assert!(matches!(
            err,
            MobilityError::CaptureTypeMismatch {
                expected: CaptureType::Neutral,
                actual: CaptureType::RightTilt
            }
        ));
        assert_eq!(session.state(), SessionState::Empty);
    }

    #[test]
    fn flexion_is_relative_to_neutral() {
        let result = diagnose_angles(5.0, 50.0, -35.0);
        assert_abs_diff_eq!(result.right_flexion_angle, 45.0);
        assert_abs_diff_eq!(result.left_flexion_angle, 40.0);
        assert_abs_diff_eq!(result.asymmetry_diff, 5.0);
        assert_eq!(result.right_flexibility_level, FlexibilityLevel::Normal);
        assert_eq!(result.asymmetry_level, AsymmetryLevel::Mild);
        assert_eq!(result.stiffer_side, Some(Side::Left));
    }

    #[test]
    fn failed_capture_keeps_previous_measurement() {
        let mut session = DiagnosisSession::new();
        session
            .capture(CaptureType::Neutral, &PoseDetection::Detected(upright_pose().into()))
            .unwrap();
        let err = session
            .capture(CaptureType::Neutral, &PoseDetection::NoPose)
            .unwrap_err();
        assert!(err.is_recoverable());
        assert!(session.measurement(CaptureType::Neutral).is_some());
    }

    struct Replay;

    impl PoseSource for Replay {
        fn detect(&mut self, capture_type: CaptureType) -> MobilityResult<Vec<PoseDetection>> {
            let degrees = match capture_type {
                CaptureType::Neutral => 0.0,
                CaptureType::RightTilt => -30.0,
                CaptureType::LeftTilt => 30.0,
            };
            Ok(vec![PoseDetection::Detected(tilted_pose(degrees).into())])
        }
    }

    #[test]
    fn capture_from_source_completes_session() {
        let mut session = DiagnosisSession::new();
        let mut source = Replay;
        for capture in CaptureType::all() {
            session.capture_from(*capture, &mut source).unwrap();
        }
        let result = session.compute_diagnosis().unwrap();
        assert_abs_diff_eq!(result.right_flexion_angle, result.left_flexion_angle, epsilon = 1e-9);
        assert_eq!(result.asymmetry_level, AsymmetryLevel::Normal);
    }
}
