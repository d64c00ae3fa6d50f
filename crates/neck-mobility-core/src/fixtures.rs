//! Synthetic poses shared by unit tests.

use crate::types::{Keypoint, LandmarkIndex, LandmarkSet, Point2D};

/// Midpoint of the estimated anchors of [`upright_pose`].
pub(crate) const CHEST: Point2D = Point2D { x: 0.5, y: 0.44 };

const FACE: [(LandmarkIndex, f64, f64); 9] = [
    (LandmarkIndex::Nose, 0.50, 0.29),
    (LandmarkIndex::LeftEye, 0.53, 0.27),
    (LandmarkIndex::RightEye, 0.47, 0.27),
    (LandmarkIndex::LeftEar, 0.56, 0.30),
    (LandmarkIndex::RightEar, 0.44, 0.30),
    (LandmarkIndex::MouthLeft, 0.52, 0.33),
    (LandmarkIndex::MouthRight, 0.48, 0.33),
    (LandmarkIndex::LeftEyeInner, 0.52, 0.27),
    (LandmarkIndex::RightEyeInner, 0.48, 0.27),
];

const BODY: [(LandmarkIndex, f64, f64); 6] = [
    (LandmarkIndex::LeftShoulder, 0.65, 0.50),
    (LandmarkIndex::RightShoulder, 0.35, 0.50),
    (LandmarkIndex::LeftElbow, 0.72, 0.70),
    (LandmarkIndex::RightElbow, 0.28, 0.70),
    (LandmarkIndex::LeftHip, 0.60, 0.85),
    (LandmarkIndex::RightHip, 0.40, 0.85),
];

/// Facing the camera, head upright, shoulders level.
pub(crate) fn upright_pose() -> LandmarkSet {
    tilted_pose(0.0)
}

/// [`upright_pose`] with the face landmarks rotated about [`CHEST`].
///
/// Positive degrees move the head toward the image right.
pub(crate) fn tilted_pose(degrees: f64) -> LandmarkSet {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let mut set = LandmarkSet::empty();
    for (index, x, y) in FACE {
        let dx = x - CHEST.x;
        let up = CHEST.y - y;
        let kp = Keypoint::with_visibility(
            CHEST.x + dx * cos + up * sin,
            CHEST.y - (up * cos - dx * sin),
            0.0,
            0.95,
        );
        set.set(index, Some(kp));
    }
    for (index, x, y) in BODY {
        set.set(index, Some(Keypoint::with_visibility(x, y, 0.0, 0.95)));
    }
    set
}
