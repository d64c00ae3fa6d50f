//! Shoulder-anchor (acromion) estimation.
//!
//! Pose detectors place the shoulder joint medially to the bony shoulder tip
//! and have no landmark for the tip itself. The anchor is reconstructed from
//! the ear, shoulder and elbow on the same side: it sits at a fixed fraction of
//! the ear→shoulder vector and is pushed outward by a fraction of the
//! horizontal shoulder→elbow distance.
//!
//! The estimate is non-fatal. When the ear or elbow is missing or not visible
//! the raw shoulder joint is returned, and when the shoulder is missing too a
//! zero anchor is returned. Both cases are tagged through
//! [`AnchorQuality`] so callers can decide whether to trust the result.
//!
//! Both anchors of a pair always share one definition: if the two sides come
//! out with different qualities, [`estimate_anchor_pair`] drops back to the
//! raw shoulders on both sides.

use tracing::warn;

use crate::config::MobilityConfig;
use crate::error::{MobilityError, MobilityResult};
use crate::types::{AnatomicalAnchor, AnchorQuality, LandmarkSet, Side};

/// Left and right anchors of one pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorPair {
    /// Subject's left anchor
    pub left: AnatomicalAnchor,
    /// Subject's right anchor
    pub right: AnatomicalAnchor,
}

impl AnchorPair {
    /// Returns `true` if either anchor fell back from full estimation.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.left.is_degraded() || self.right.is_degraded()
    }

    /// Fails with [`MobilityError::MissingLandmark`] if either side has no
    /// shoulder, or an anchor not visible above `visibility_threshold`.
    ///
    /// The ear and elbow only reach an estimated anchor when visible, so a
    /// weak anchor always points at its shoulder.
    ///
    /// # Errors
    ///
    /// Returns the shoulder of the first side that fails.
    pub fn require_shoulders(&self, visibility_threshold: f64) -> MobilityResult<()> {
        for (side, anchor) in [(Side::Left, &self.left), (Side::Right, &self.right)] {
            if anchor.quality == AnchorQuality::Missing || anchor.visibility <= visibility_threshold {
                return Err(MobilityError::missing_landmark(side.shoulder()));
            }
        }
        Ok(())
    }
}

/// Estimates the shoulder anchor for one side.
///
/// The ear and elbow count only when visible above
/// [`visibility_threshold`](MobilityConfig::visibility_threshold). The
/// shoulder needs only to be present; its visibility is carried into the
/// result as the minimum of the ear and shoulder visibilities.
#[must_use]
pub fn estimate_anchor(landmarks: &LandmarkSet, side: Side, config: &MobilityConfig) -> AnatomicalAnchor {
    let threshold = config.visibility_threshold;
    let ear = landmarks.get_visible(side.ear(), threshold);
    let shoulder = landmarks.get(side.shoulder());
    let elbow = landmarks.get_visible(side.elbow(), threshold);

    let (ear, shoulder, elbow) = match (ear, shoulder, elbow) {
        (Some(ear), Some(shoulder), Some(elbow)) => (ear, shoulder, elbow),
        (_, Some(shoulder), _) => {
            warn!(%side, "ear or elbow not visible, falling back to raw shoulder joint");
            return AnatomicalAnchor::from_shoulder(shoulder);
        }
        (_, None, _) => {
            warn!(%side, "shoulder missing, anchor unavailable");
            return AnatomicalAnchor::missing();
        }
    };

    let t = config.anchor_vertical_ratio;
    let lateral = config.anchor_lateral_ratio * (elbow.x - shoulder.x).abs();

    AnatomicalAnchor {
        x: ear.x + t * (shoulder.x - ear.x) + side.outward_sign() * lateral,
        y: ear.y + t * (shoulder.y - ear.y),
        z: ear.z + t * (shoulder.z - ear.z),
        visibility: ear.visibility().min(shoulder.visibility()),
        quality: AnchorQuality::Estimated,
    }
}

/// Estimates both anchors of a pose.
///
/// An estimated anchor sits well above its raw shoulder joint, so a pair of
/// mixed quality would read as a shoulder tilt. Such a pair is replaced by the
/// raw shoulders of both sides.
#[must_use]
pub fn estimate_anchor_pair(landmarks: &LandmarkSet, config: &MobilityConfig) -> AnchorPair {
    let pair = AnchorPair {
        left: estimate_anchor(landmarks, Side::Left, config),
        right: estimate_anchor(landmarks, Side::Right, config),
    };
    if pair.left.quality == pair.right.quality {
        return pair;
    }

    warn!(
        left = ?pair.left.quality,
        right = ?pair.right.quality,
        "mixed anchor quality, using raw shoulders on both sides"
    );
    AnchorPair {
        left: raw_shoulder(landmarks, Side::Left),
        right: raw_shoulder(landmarks, Side::Right),
    }
}

fn raw_shoulder(landmarks: &LandmarkSet, side: Side) -> AnatomicalAnchor {
    landmarks
        .get(side.shoulder())
        .map_or_else(AnatomicalAnchor::missing, AnatomicalAnchor::from_shoulder)
}
