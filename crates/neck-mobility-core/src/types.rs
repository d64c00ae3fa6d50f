//! Core data types for neck mobility assessment.
//!
//! # Type Categories
//!
//! - **Detector Types**: [`Keypoint`], [`LandmarkIndex`], [`LandmarkSet`],
//!   [`FaceMesh`], [`LandmarkFrame`], [`PoseDetection`]
//! - **Derived Geometry**: [`AnatomicalAnchor`], [`AnchorQuality`], [`Point2D`]
//! - **Session Types**: [`Side`], [`CaptureType`], [`Measurement`],
//!   [`DiagnosisResult`]

use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::classify::{AsymmetryLevel, FlexibilityLevel};
use crate::error::{MobilityError, MobilityResult};
use crate::LANDMARK_COUNT;

// =============================================================================
// Detector Types
// =============================================================================

/// A single detected keypoint in normalized image coordinates.
///
/// `x` and `y` are in `[0, 1]` with `y` growing downward; `z` is the
/// detector's relative depth. Detectors that do not report a confidence leave
/// `visibility` unset, which is read as fully visible.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Keypoint {
    /// Normalized horizontal coordinate
    pub x: f64,
    /// Normalized vertical coordinate (grows downward)
    pub y: f64,
    /// Relative depth
    #[cfg_attr(feature = "serde", serde(default))]
    pub z: f64,
    /// Detection visibility in `[0, 1]`, if reported
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub visibility: Option<f64>,
}

impl Keypoint {
    /// Creates a keypoint without a visibility score.
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            visibility: None,
        }
    }

    /// Creates a keypoint with a visibility score.
    #[must_use]
    pub fn with_visibility(x: f64, y: f64, z: f64, visibility: f64) -> Self {
        Self {
            x,
            y,
            z,
            visibility: Some(visibility),
        }
    }

    /// Effective visibility (unreported visibility counts as `1.0`).
    #[must_use]
    pub fn visibility(&self) -> f64 {
        self.visibility.unwrap_or(1.0)
    }

    /// Returns `true` if the visibility is strictly above `threshold`.
    #[must_use]
    pub fn is_visible(&self, threshold: f64) -> bool {
        self.visibility() > threshold
    }

    /// Returns `true` if both coordinates lie inside the normalized image.
    #[must_use]
    pub fn in_frame(&self) -> bool {
        (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }

    /// Returns the 2D position.
    #[must_use]
    pub fn position_2d(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }

    /// Midpoint of two keypoints; visibility is the weaker of the two.
    #[must_use]
    pub fn midpoint(&self, other: &Self) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
            z: (self.z + other.z) / 2.0,
            visibility: Some(self.visibility().min(other.visibility())),
        }
    }
}

/// Landmark slots of the 33-point MediaPipe Pose topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum LandmarkIndex {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl LandmarkIndex {
    /// Returns all landmark slots in index order.
    #[must_use]
    pub fn all() -> &'static [Self; LANDMARK_COUNT] {
        use LandmarkIndex::*;
        &[
            Nose,
            LeftEyeInner,
            LeftEye,
            LeftEyeOuter,
            RightEyeInner,
            RightEye,
            RightEyeOuter,
            LeftEar,
            RightEar,
            MouthLeft,
            MouthRight,
            LeftShoulder,
            RightShoulder,
            LeftElbow,
            RightElbow,
            LeftWrist,
            RightWrist,
            LeftPinky,
            RightPinky,
            LeftIndex,
            RightIndex,
            LeftThumb,
            RightThumb,
            LeftHip,
            RightHip,
            LeftKnee,
            RightKnee,
            LeftAnkle,
            RightAnkle,
            LeftHeel,
            RightHeel,
            LeftFootIndex,
            RightFootIndex,
        ]
    }

    /// Slot position in the ordered landmark list.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the landmark name as a string.
    #[must_use]
    pub fn name(self) -> &'static str {
        use LandmarkIndex::*;
        match self {
            Nose => "nose",
            LeftEyeInner => "left_eye_inner",
            LeftEye => "left_eye",
            LeftEyeOuter => "left_eye_outer",
            RightEyeInner => "right_eye_inner",
            RightEye => "right_eye",
            RightEyeOuter => "right_eye_outer",
            LeftEar => "left_ear",
            RightEar => "right_ear",
            MouthLeft => "mouth_left",
            MouthRight => "mouth_right",
            LeftShoulder => "left_shoulder",
            RightShoulder => "right_shoulder",
            LeftElbow => "left_elbow",
            RightElbow => "right_elbow",
            LeftWrist => "left_wrist",
            RightWrist => "right_wrist",
            LeftPinky => "left_pinky",
            RightPinky => "right_pinky",
            LeftIndex => "left_index",
            RightIndex => "right_index",
            LeftThumb => "left_thumb",
            RightThumb => "right_thumb",
            LeftHip => "left_hip",
            RightHip => "right_hip",
            LeftKnee => "left_knee",
            RightKnee => "right_knee",
            LeftAnkle => "left_ankle",
            RightAnkle => "right_ankle",
            LeftHeel => "left_heel",
            RightHeel => "right_heel",
            LeftFootIndex => "left_foot_index",
            RightFootIndex => "right_foot_index",
        }
    }

    /// Returns `true` for the face slots (nose, eyes, ears, mouth).
    #[must_use]
    pub fn is_face(self) -> bool {
        self.index() <= Self::MouthRight.index()
    }
}

impl TryFrom<usize> for LandmarkIndex {
    type Error = MobilityError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::all()
            .get(value)
            .copied()
            .ok_or(MobilityError::InvalidLandmarkCount {
                expected: LANDMARK_COUNT,
                actual: value + 1,
            })
    }
}

impl std::fmt::Display for LandmarkIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Fixed-length ordered keypoint list for one detected pose.
///
/// Always holds exactly [`LANDMARK_COUNT`] slots. A landmark the detector did
/// not find is a `None` slot; slots are never removed or reordered.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "Vec<Option<Keypoint>>", into = "Vec<Option<Keypoint>>")
)]
pub struct LandmarkSet {
    slots: Vec<Option<Keypoint>>,
}

impl LandmarkSet {
    /// Creates a landmark set with every slot empty.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            slots: vec![None; LANDMARK_COUNT],
        }
    }

    /// Builds a landmark set from the detector's ordered slot list.
    ///
    /// # Errors
    ///
    /// Returns [`MobilityError::InvalidLandmarkCount`] unless exactly
    /// [`LANDMARK_COUNT`] slots are supplied.
    pub fn from_slots(slots: Vec<Option<Keypoint>>) -> MobilityResult<Self> {
        if slots.len() != LANDMARK_COUNT {
            return Err(MobilityError::InvalidLandmarkCount {
                expected: LANDMARK_COUNT,
                actual: slots.len(),
            });
        }
        Ok(Self { slots })
    }

    /// Wraps slots derived slot-by-slot from existing landmark sets.
    pub(crate) fn from_complete_slots(slots: Vec<Option<Keypoint>>) -> Self {
        debug_assert_eq!(slots.len(), LANDMARK_COUNT);
        Self { slots }
    }

    /// Builds a landmark set where every slot was detected.
    ///
    /// # Errors
    ///
    /// Returns [`MobilityError::InvalidLandmarkCount`] unless exactly
    /// [`LANDMARK_COUNT`] keypoints are supplied.
    pub fn from_keypoints(keypoints: Vec<Keypoint>) -> MobilityResult<Self> {
        Self::from_slots(keypoints.into_iter().map(Some).collect())
    }

    /// Gets a keypoint by slot.
    #[must_use]
    pub fn get(&self, index: LandmarkIndex) -> Option<&Keypoint> {
        self.slots[index.index()].as_ref()
    }

    /// Gets a keypoint only if its visibility is above `threshold`.
    #[must_use]
    pub fn get_visible(&self, index: LandmarkIndex, threshold: f64) -> Option<&Keypoint> {
        self.get(index).filter(|kp| kp.is_visible(threshold))
    }

    /// Sets a slot, returning the previous keypoint.
    pub fn set(&mut self, index: LandmarkIndex, keypoint: Option<Keypoint>) -> Option<Keypoint> {
        std::mem::replace(&mut self.slots[index.index()], keypoint)
    }

    /// All slots in index order.
    #[must_use]
    pub fn slots(&self) -> &[Option<Keypoint>] {
        &self.slots
    }

    /// Returns the number of keypoints visible above `threshold`.
    #[must_use]
    pub fn visible_count(&self, threshold: f64) -> usize {
        self.slots
            .iter()
            .filter(|kp| kp.as_ref().is_some_and(|kp| kp.is_visible(threshold)))
            .count()
    }
}

impl Default for LandmarkSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl TryFrom<Vec<Option<Keypoint>>> for LandmarkSet {
    type Error = MobilityError;

    fn try_from(slots: Vec<Option<Keypoint>>) -> Result<Self, Self::Error> {
        Self::from_slots(slots)
    }
}

impl From<LandmarkSet> for Vec<Option<Keypoint>> {
    fn from(set: LandmarkSet) -> Self {
        set.slots
    }
}

/// Dense face landmarks (MediaPipe FaceMesh topology, 468 or 478 points).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<Keypoint>", into = "Vec<Keypoint>"))]
pub struct FaceMesh {
    points: Vec<Keypoint>,
}

impl FaceMesh {
    /// Minimum number of points in a FaceMesh result.
    pub const MIN_POINTS: usize = 468;
    /// Nose tip.
    pub const NOSE_TIP: usize = 1;
    /// Upper forehead on the facial midline.
    pub const FOREHEAD: usize = 10;
    /// Chin on the facial midline.
    pub const CHIN: usize = 152;

    /// Wraps a FaceMesh point list.
    ///
    /// # Errors
    ///
    /// Returns [`MobilityError::InvalidLandmarkCount`] if fewer than
    /// [`FaceMesh::MIN_POINTS`] points are supplied.
    pub fn new(points: Vec<Keypoint>) -> MobilityResult<Self> {
        if points.len() < Self::MIN_POINTS {
            return Err(MobilityError::InvalidLandmarkCount {
                expected: Self::MIN_POINTS,
                actual: points.len(),
            });
        }
        Ok(Self { points })
    }

    /// Gets a point by FaceMesh index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Keypoint> {
        self.points.get(index)
    }

    /// The facial midline points used as the head reference.
    #[must_use]
    pub fn midline(&self) -> [&Keypoint; 3] {
        [
            &self.points[Self::FOREHEAD],
            &self.points[Self::NOSE_TIP],
            &self.points[Self::CHIN],
        ]
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; a face mesh cannot be constructed empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl TryFrom<Vec<Keypoint>> for FaceMesh {
    type Error = MobilityError;

    fn try_from(points: Vec<Keypoint>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<FaceMesh> for Vec<Keypoint> {
    fn from(mesh: FaceMesh) -> Self {
        mesh.points
    }
}

/// One capture's landmarks, tagged by what the detector was able to provide.
///
/// The variant is chosen once, at normalization time, so angle computation
/// dispatches on it instead of probing for optional data.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum LandmarkFrame {
    /// The 33-point pose landmarks only.
    Basic {
        /// Pose landmarks
        pose: LandmarkSet,
    },
    /// Pose landmarks plus a dense face mesh.
    ExtendedFace {
        /// Pose landmarks
        pose: LandmarkSet,
        /// Dense face landmarks
        face_mesh: FaceMesh,
    },
}

impl LandmarkFrame {
    /// Normalizes a detector result into the matching variant.
    #[must_use]
    pub fn from_detection(pose: LandmarkSet, face_mesh: Option<FaceMesh>) -> Self {
        match face_mesh {
            Some(face_mesh) => Self::ExtendedFace { pose, face_mesh },
            None => Self::Basic { pose },
        }
    }

    /// Pose landmarks of either variant.
    #[must_use]
    pub fn pose(&self) -> &LandmarkSet {
        match self {
            Self::Basic { pose } | Self::ExtendedFace { pose, .. } => pose,
        }
    }

    /// Face mesh, when the detector provided one.
    #[must_use]
    pub fn face_mesh(&self) -> Option<&FaceMesh> {
        match self {
            Self::Basic { .. } => None,
            Self::ExtendedFace { face_mesh, .. } => Some(face_mesh),
        }
    }

    /// Consumes the frame, keeping only the pose landmarks.
    #[must_use]
    pub fn into_pose(self) -> LandmarkSet {
        match self {
            Self::Basic { pose } | Self::ExtendedFace { pose, .. } => pose,
        }
    }
}

impl From<LandmarkSet> for LandmarkFrame {
    fn from(pose: LandmarkSet) -> Self {
        Self::Basic { pose }
    }
}

/// Result of submitting one image to the pose engine.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PoseDetection {
    /// A pose was found.
    Detected(LandmarkFrame),
    /// The engine found no person in the image.
    NoPose,
}

impl PoseDetection {
    /// Returns the frame if a pose was detected.
    #[must_use]
    pub fn frame(&self) -> Option<&LandmarkFrame> {
        match self {
            Self::Detected(frame) => Some(frame),
            Self::NoPose => None,
        }
    }
}

// =============================================================================
// Derived Geometry
// =============================================================================

/// A 2D point in normalized image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point2D {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate (grows downward)
    pub y: f64,
}

impl Point2D {
    /// Creates a new point.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Midpoint between two points.
    #[must_use]
    pub fn midpoint(&self, other: &Self) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Arithmetic mean of a set of points, or `None` if empty.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn centroid(points: &[Self]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let n = points.len() as f64;
        let (sx, sy) = points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Some(Self::new(sx / n, sy / n))
    }
}

/// How an [`AnatomicalAnchor`] was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AnchorQuality {
    /// Interpolated from ear, shoulder and elbow.
    Estimated,
    /// Ear or elbow missing; the raw shoulder joint was used.
    RawShoulder,
    /// Shoulder missing too; the anchor is a zero point.
    Missing,
}

/// Derived shoulder-anchor point (acromion estimate).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnatomicalAnchor {
    /// Normalized horizontal coordinate
    pub x: f64,
    /// Normalized vertical coordinate
    pub y: f64,
    /// Relative depth
    pub z: f64,
    /// Minimum visibility of the contributing keypoints
    pub visibility: f64,
    /// How the anchor was obtained
    pub quality: AnchorQuality,
}

impl AnatomicalAnchor {
    /// Anchor taken directly from the detected shoulder joint.
    #[must_use]
    pub fn from_shoulder(shoulder: &Keypoint) -> Self {
        Self {
            x: shoulder.x,
            y: shoulder.y,
            z: shoulder.z,
            visibility: shoulder.visibility(),
            quality: AnchorQuality::RawShoulder,
        }
    }

    /// Zero anchor used when no shoulder was detected.
    #[must_use]
    pub fn missing() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            visibility: 0.0,
            quality: AnchorQuality::Missing,
        }
    }

    /// Returns `true` unless the anchor was fully estimated.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.quality != AnchorQuality::Estimated
    }

    /// Returns the 2D position.
    #[must_use]
    pub fn position_2d(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }
}

// =============================================================================
// Session Types
// =============================================================================

/// Body side, from the subject's own point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Side {
    /// Subject's left
    Left,
    /// Subject's right
    Right,
}

impl Side {
    /// The other side.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Ear landmark on this side.
    #[must_use]
    pub fn ear(self) -> LandmarkIndex {
        match self {
            Self::Left => LandmarkIndex::LeftEar,
            Self::Right => LandmarkIndex::RightEar,
        }
    }

    /// Shoulder landmark on this side.
    #[must_use]
    pub fn shoulder(self) -> LandmarkIndex {
        match self {
            Self::Left => LandmarkIndex::LeftShoulder,
            Self::Right => LandmarkIndex::RightShoulder,
        }
    }

    /// Elbow landmark on this side.
    #[must_use]
    pub fn elbow(self) -> LandmarkIndex {
        match self {
            Self::Left => LandmarkIndex::LeftElbow,
            Self::Right => LandmarkIndex::RightElbow,
        }
    }

    /// Image-x direction pointing away from the body midline on this side.
    ///
    /// In an unmirrored capture the subject's left appears on the image right.
    #[must_use]
    pub fn outward_sign(self) -> f64 {
        match self {
            Self::Left => 1.0,
            Self::Right => -1.0,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// The three captures that make up one assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CaptureType {
    /// Facing forward, head upright
    Neutral,
    /// Head tilted toward the right shoulder
    RightTilt,
    /// Head tilted toward the left shoulder
    LeftTilt,
}

impl CaptureType {
    /// All capture types in protocol order.
    #[must_use]
    pub fn all() -> &'static [Self; 3] {
        &[Self::Neutral, Self::RightTilt, Self::LeftTilt]
    }

    /// Position in protocol order.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Neutral => 0,
            Self::RightTilt => 1,
            Self::LeftTilt => 2,
        }
    }

    /// Returns `true` for the two side-bend captures.
    #[must_use]
    pub fn is_tilt(self) -> bool {
        !matches!(self, Self::Neutral)
    }

    /// Side the head bends toward, for tilt captures.
    #[must_use]
    pub fn tilt_side(self) -> Option<Side> {
        match self {
            Self::Neutral => None,
            Self::RightTilt => Some(Side::Right),
            Self::LeftTilt => Some(Side::Left),
        }
    }
}

impl std::fmt::Display for CaptureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Neutral => write!(f, "neutral"),
            Self::RightTilt => write!(f, "right tilt"),
            Self::LeftTilt => write!(f, "left tilt"),
        }
    }
}

/// Angles measured from one analyzed capture.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Measurement {
    /// Capture this measurement belongs to
    pub capture_type: CaptureType,
    /// Landmarks the angles were computed from
    pub landmarks: LandmarkSet,
    /// Neck tilt in degrees (positive toward image right)
    pub neck_tilt_angle: f64,
    /// Shoulder tilt in degrees
    pub shoulder_tilt_angle: f64,
    /// When the measurement was taken
    pub captured_at: DateTime<Utc>,
}

impl Measurement {
    /// Creates a measurement stamped with the current time.
    #[must_use]
    pub fn new(
        capture_type: CaptureType,
        landmarks: LandmarkSet,
        neck_tilt_angle: f64,
        shoulder_tilt_angle: f64,
    ) -> Self {
        Self {
            capture_type,
            landmarks,
            neck_tilt_angle,
            shoulder_tilt_angle,
            captured_at: Utc::now(),
        }
    }
}

/// Final assessment assembled from the three measurements.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DiagnosisResult {
    /// Neck tilt of the neutral capture in degrees
    pub neutral_angle: f64,
    /// Right lateral flexion relative to neutral, in degrees
    pub right_flexion_angle: f64,
    /// Left lateral flexion relative to neutral, in degrees
    pub left_flexion_angle: f64,
    /// Classification of the right side
    pub right_flexibility_level: FlexibilityLevel,
    /// Classification of the left side
    pub left_flexibility_level: FlexibilityLevel,
    /// Classification of the left/right difference
    pub asymmetry_level: AsymmetryLevel,
    /// Absolute difference between the two flexion angles
    pub asymmetry_diff: f64,
    /// Side with the smaller flexion angle, if they differ
    pub stiffer_side: Option<Side>,
    /// Advisory statements in priority order
    pub recommendations: Vec<String>,
    /// When the diagnosis was computed
    pub computed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_set() -> LandmarkSet {
        LandmarkSet::from_keypoints(vec![Keypoint::with_visibility(0.5, 0.5, 0.0, 0.9); LANDMARK_COUNT])
            .unwrap()
    }

    #[test]
    fn test_landmark_set_requires_33_slots() {
        assert!(LandmarkSet::from_slots(vec![None; 33]).is_ok());
        let err = LandmarkSet::from_slots(vec![None; 17]).unwrap_err();
        assert!(matches!(
            err,
            MobilityError::InvalidLandmarkCount {
                expected: 33,
                actual: 17
            }
        ));
    }

    #[test]
    fn test_landmark_index_order_is_fixed() {
        for (i, idx) in LandmarkIndex::all().iter().enumerate() {
            assert_eq!(idx.index(), i);
            assert_eq!(LandmarkIndex::try_from(i).unwrap(), *idx);
        }
        assert!(LandmarkIndex::try_from(33).is_err());
        assert!(LandmarkIndex::MouthRight.is_face());
        assert!(!LandmarkIndex::LeftShoulder.is_face());
    }

    #[test]
    fn test_visibility_threshold_is_strict() {
        let kp = Keypoint::with_visibility(0.1, 0.1, 0.0, 0.5);
        assert!(!kp.is_visible(0.5));
        assert!(Keypoint::new(0.1, 0.1, 0.0).is_visible(0.5));
    }

    #[test]
    fn test_get_visible_filters_low_confidence() {
        let mut set = full_set();
        set.set(
            LandmarkIndex::Nose,
            Some(Keypoint::with_visibility(0.5, 0.2, 0.0, 0.2)),
        );
        assert!(set.get(LandmarkIndex::Nose).is_some());
        assert!(set.get_visible(LandmarkIndex::Nose, 0.5).is_none());
        assert_eq!(set.visible_count(0.5), LANDMARK_COUNT - 1);
    }

    #[test]
    fn test_keypoint_midpoint_takes_weaker_visibility() {
        let a = Keypoint::with_visibility(0.2, 0.4, 0.0, 0.9);
        let b = Keypoint::with_visibility(0.4, 0.6, 0.0, 0.6);
        let m = a.midpoint(&b);
        assert!((m.x - 0.3).abs() < 1e-12);
        assert!((m.y - 0.5).abs() < 1e-12);
        assert_eq!(m.visibility, Some(0.6));
    }

    #[test]
    fn test_frame_variant_resolution() {
        let basic = LandmarkFrame::from_detection(full_set(), None);
        assert!(basic.face_mesh().is_none());

        let mesh = FaceMesh::new(vec![Keypoint::new(0.5, 0.2, 0.0); FaceMesh::MIN_POINTS]).unwrap();
        let extended = LandmarkFrame::from_detection(full_set(), Some(mesh));
        assert!(extended.face_mesh().is_some());
        assert_eq!(extended.pose(), basic.pose());
    }

    #[test]
    fn test_face_mesh_rejects_short_lists() {
        assert!(FaceMesh::new(vec![Keypoint::new(0.5, 0.5, 0.0); 100]).is_err());
    }

    #[test]
    fn test_capture_type_protocol() {
        assert_eq!(CaptureType::all().len(), 3);
        assert!(!CaptureType::Neutral.is_tilt());
        assert_eq!(CaptureType::RightTilt.tilt_side(), Some(Side::Right));
        assert_eq!(CaptureType::LeftTilt.to_string(), "left tilt");
    }

    #[test]
    fn test_centroid() {
        assert!(Point2D::centroid(&[]).is_none());
        let c = Point2D::centroid(&[Point2D::new(0.0, 0.0), Point2D::new(1.0, 0.5)]).unwrap();
        assert!((c.x - 0.5).abs() < 1e-12);
        assert!((c.y - 0.25).abs() < 1e-12);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_landmark_set_serde_enforces_length() {
        let json = serde_json::to_string(&full_set()).unwrap();
        let parsed: LandmarkSet = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, full_set());

        let short = "[null, null]";
        assert!(serde_json::from_str::<LandmarkSet>(short).is_err());
    }
}
