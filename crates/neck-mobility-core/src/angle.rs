//! Shoulder-tilt, neck-tilt and lateral-flexion angles.
//!
//! All angles are in degrees and computed on normalized image coordinates,
//! where `y` grows downward.

use tracing::debug;

use crate::error::{MobilityError, MobilityResult};
use crate::types::{AnatomicalAnchor, FaceMesh, LandmarkFrame, LandmarkIndex, LandmarkSet, Point2D};

/// Face landmarks that contributed to a composite head reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompositeParts {
    /// Both ears visible
    pub ears: bool,
    /// Both eyes visible
    pub eyes: bool,
    /// Nose visible
    pub nose: bool,
    /// Both mouth corners visible
    pub mouth: bool,
}

impl CompositeParts {
    /// Number of sub-points averaged.
    #[must_use]
    pub fn count(&self) -> usize {
        [self.ears, self.eyes, self.nose, self.mouth]
            .iter()
            .filter(|used| **used)
            .count()
    }
}

/// Where a head reference point came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadReferenceSource {
    /// Facial midline of a dense face mesh.
    FaceMesh {
        /// Number of visible midline points averaged
        points: usize,
    },
    /// Equal-weight average of pose face landmarks.
    Composite(CompositeParts),
    /// The nose keypoint alone.
    NoseOnly,
}

/// Head reference point and its provenance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadReference {
    /// Reference point
    pub point: Point2D,
    /// How it was derived
    pub source: HeadReferenceSource,
}

/// Shoulder-tilt angle between the two anchors.
///
/// `dx = |left.x - right.x|`, `dy = left.y - right.y`, angle =
/// `atan(dy / dx)`. Level anchors give exactly `0`; the angle is positive when
/// the left anchor sits lower in the image.
///
/// `left` and `right` follow the detector's naming, which is the subject's own
/// side. In an unmirrored capture the subject's left shoulder is the one on
/// the image right, so a positive angle means the shoulder on the right of
/// the image is lower.
///
/// # Errors
///
/// Returns [`MobilityError::DegenerateGeometry`] when the anchors share the
/// same `x`, which leaves the angle undefined.
pub fn shoulder_tilt_angle(left: &AnatomicalAnchor, right: &AnatomicalAnchor) -> MobilityResult<f64> {
    let dx = (left.x - right.x).abs();
    if dx == 0.0 {
        return Err(MobilityError::degenerate("shoulder anchors are vertically aligned"));
    }
    let dy = left.y - right.y;
    Ok((dy / dx).atan().to_degrees())
}

/// Chest reference: midpoint of the stabilized anchors.
#[must_use]
pub fn chest_reference(left: &AnatomicalAnchor, right: &AnatomicalAnchor) -> Point2D {
    left.position_2d().midpoint(&right.position_2d())
}

/// Resolves the head reference point for a frame.
///
/// Extended frames use the visible face-mesh midline points (forehead, nose
/// tip, chin). Otherwise, or if no midline point is visible, the head is the
/// equal-weight average of the ear midpoint, eye midpoint, nose and mouth
/// midpoint, each included only when all of its keypoints are visible above
/// `threshold`. With none of those available the nose is used regardless of
/// its visibility.
///
/// # Errors
///
/// Returns [`MobilityError::MissingLandmark`] if not even the nose was
/// detected.
pub fn head_reference(frame: &LandmarkFrame, threshold: f64) -> MobilityResult<HeadReference> {
    if let Some(mesh) = frame.face_mesh() {
        if let Some(head) = face_mesh_reference(mesh, threshold) {
            return Ok(head);
        }
        debug!("face mesh midline not visible, using pose face landmarks");
    }
    pose_head_reference(frame.pose(), threshold)
}

fn face_mesh_reference(mesh: &FaceMesh, threshold: f64) -> Option<HeadReference> {
    let visible: Vec<Point2D> = mesh
        .midline()
        .into_iter()
        .filter(|kp| kp.is_visible(threshold))
        .map(|kp| kp.position_2d())
        .collect();
    Point2D::centroid(&visible).map(|point| HeadReference {
        point,
        source: HeadReferenceSource::FaceMesh {
            points: visible.len(),
        },
    })
}

fn pose_head_reference(pose: &LandmarkSet, threshold: f64) -> MobilityResult<HeadReference> {
    let pair = |a: LandmarkIndex, b: LandmarkIndex| -> Option<Point2D> {
        let a = pose.get_visible(a, threshold)?;
        let b = pose.get_visible(b, threshold)?;
        Some(a.position_2d().midpoint(&b.position_2d()))
    };

    let ears = pair(LandmarkIndex::LeftEar, LandmarkIndex::RightEar);
    let eyes = pair(LandmarkIndex::LeftEye, LandmarkIndex::RightEye);
    let nose = pose
        .get_visible(LandmarkIndex::Nose, threshold)
        .map(|kp| kp.position_2d());
    let mouth = pair(LandmarkIndex::MouthLeft, LandmarkIndex::MouthRight);

    let parts = CompositeParts {
        ears: ears.is_some(),
        eyes: eyes.is_some(),
        nose: nose.is_some(),
        mouth: mouth.is_some(),
    };
    let points: Vec<Point2D> = [ears, eyes, nose, mouth].into_iter().flatten().collect();

    if let Some(point) = Point2D::centroid(&points) {
        return Ok(HeadReference {
            point,
            source: HeadReferenceSource::Composite(parts),
        });
    }

    pose.get(LandmarkIndex::Nose)
        .map(|kp| HeadReference {
            point: kp.position_2d(),
            source: HeadReferenceSource::NoseOnly,
        })
        .ok_or_else(|| MobilityError::missing_reference("head reference", "no face landmark detected"))
}

/// Neck-tilt angle of the head reference about the chest reference.
///
/// `dx = head.x - chest.x`, `dy = chest.y - head.y`, angle = `atan2(dx, dy)`.
/// Zero is perfectly vertical; positive is toward the image right.
///
/// # Errors
///
/// Returns [`MobilityError::DegenerateGeometry`] if head and chest coincide.
pub fn neck_tilt_angle(head: Point2D, chest: Point2D) -> MobilityResult<f64> {
    let dx = head.x - chest.x;
    let dy = chest.y - head.y;
    if dx == 0.0 && dy == 0.0 {
        return Err(MobilityError::degenerate("head and chest references coincide"));
    }
    Ok(dx.atan2(dy).to_degrees())
}

/// Lateral flexion of a tilt capture relative to the neutral capture.
///
/// Always `|tilt - neutral|`; the side is known from which capture it is.
#[must_use]
pub fn lateral_flexion(neutral_angle: f64, tilt_angle: f64) -> f64 {
    (tilt_angle - neutral_angle).abs()
}

/// Checks that the shoulders stayed level enough during a tilt capture.
///
/// # Errors
///
/// Returns [`MobilityError::ShoulderTiltExceeded`] when
/// `|angle| > threshold`.
pub fn check_shoulder_compensation(shoulder_tilt: f64, threshold: f64) -> MobilityResult<()> {
    if shoulder_tilt.abs() > threshold {
        return Err(MobilityError::ShoulderTiltExceeded {
            angle: shoulder_tilt,
            threshold,
        });
    }
    Ok(())
}
