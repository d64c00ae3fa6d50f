//! Landmark stabilization.
//!
//! Three independent noise-reduction steps, each a pure function over
//! immutable inputs:
//!
//! 1. **Bilateral blend** ([`bilateral_blend`]): pulls each shoulder anchor's
//!    height toward the pair's mean, countering one anchor being noisier than
//!    the symmetry assumption allows.
//! 2. **Temporal smoothing** ([`smooth_temporal`]): EMA between the current
//!    frame and the previous smoothed frame. For live preview only; the still
//!    captures used in the report are not smoothed. [`LandmarkSmoother`] holds
//!    the previous frame for callers that stream.
//! 3. **Median aggregation** ([`median_aggregate`]): per-slot, per-axis median
//!    over several detection passes of the same still image, with outlier
//!    rejection.

use tracing::debug;

use crate::anchor::AnchorPair;
use crate::config::MobilityConfig;
use crate::error::{MobilityError, MobilityResult};
use crate::types::{Keypoint, LandmarkSet};

/// Moves both anchors' `y` toward their mean by `factor`.
///
/// `factor = 0` leaves the anchors untouched, `factor = 1` makes them level.
#[must_use]
pub fn bilateral_blend(anchors: &AnchorPair, factor: f64) -> AnchorPair {
    let avg_y = (anchors.left.y + anchors.right.y) / 2.0;
    let mut blended = *anchors;
    blended.left.y += (avg_y - anchors.left.y) * factor;
    blended.right.y += (avg_y - anchors.right.y) * factor;
    blended
}

/// Exponential moving average of `current` against `previous`.
///
/// Slots are smoothed only when both frames detected them; otherwise the
/// current slot passes through. With no previous frame the whole set passes
/// through unchanged.
#[must_use]
pub fn smooth_temporal(current: &LandmarkSet, previous: Option<&LandmarkSet>, alpha: f64) -> LandmarkSet {
    let Some(previous) = previous else {
        return current.clone();
    };

    let slots = current
        .slots()
        .iter()
        .zip(previous.slots())
        .map(|(cur, prev)| match (cur, prev) {
            (Some(cur), Some(prev)) => Some(Keypoint {
                x: alpha * cur.x + (1.0 - alpha) * prev.x,
                y: alpha * cur.y + (1.0 - alpha) * prev.y,
                z: alpha * cur.z + (1.0 - alpha) * prev.z,
                visibility: cur.visibility,
            }),
            (cur, _) => *cur,
        })
        .collect();

    LandmarkSet::from_complete_slots(slots)
}

/// Caller-owned temporal smoothing state for streaming previews.
///
/// Each flow owns its own smoother; nothing is shared between flows.
#[derive(Debug, Clone)]
pub struct LandmarkSmoother {
    previous: Option<LandmarkSet>,
    alpha: f64,
}

impl LandmarkSmoother {
    /// Create a new smoother.
    ///
    /// `alpha` is the weight of the newest frame, clamped to `[0.01, 1.0]`.
    #[must_use]
    pub fn new(alpha: f64) -> Self {
        Self {
            previous: None,
            alpha: alpha.clamp(0.01, 1.0),
        }
    }

    /// Create a smoother with the configured
    /// [`smoothing_alpha`](MobilityConfig::smoothing_alpha).
    #[must_use]
    pub fn from_config(config: &MobilityConfig) -> Self {
        Self::new(config.smoothing_alpha)
    }

    /// Smooth a frame against the last output and remember the result.
    pub fn push(&mut self, frame: &LandmarkSet) -> LandmarkSet {
        let smoothed = smooth_temporal(frame, self.previous.as_ref(), self.alpha);
        self.previous = Some(smoothed.clone());
        smoothed
    }

    /// Forget the previous frame.
    pub fn reset(&mut self) {
        self.previous = None;
    }

    /// Current EMA smoothing factor.
    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

/// Returns `true` if aggregation should ignore this keypoint.
///
/// A keypoint is an outlier when its visibility is below
/// `visibility_threshold` (normally
/// [`DEFAULT_VISIBILITY_THRESHOLD`](crate::DEFAULT_VISIBILITY_THRESHOLD)) or
/// either coordinate leaves `[0, 1]`.
#[must_use]
pub fn is_outlier(keypoint: &Keypoint, visibility_threshold: f64) -> bool {
    keypoint.visibility() < visibility_threshold || !keypoint.in_frame()
}

/// Per-slot, per-axis median over several detections of the same image.
///
/// Outliers (see [`is_outlier`]) are excluded from the median. If every
/// sample of a slot is an outlier, or the slot is only detected in outlier
/// form, the first sample's keypoint is kept as-is.
///
/// The first sample's visibility is preserved even when the first sample was
/// itself rejected. Its position is replaced by the median of the other
/// passes, but a low visibility still fails later visibility checks; reorder
/// the passes if the first one is known to be bad.
///
/// # Errors
///
/// Returns [`MobilityError::EmptySampleSet`] if `samples` is empty.
pub fn median_aggregate(samples: &[LandmarkSet], visibility_threshold: f64) -> MobilityResult<LandmarkSet> {
    let first = samples.first().ok_or(MobilityError::EmptySampleSet)?;
    if samples.len() == 1 {
        return Ok(first.clone());
    }

    let mut rejected = 0_usize;
    let slots = (0..first.slots().len())
        .map(|i| {
            let inliers: Vec<&Keypoint> = samples
                .iter()
                .filter_map(|s| s.slots()[i].as_ref())
                .filter(|kp| {
                    let keep = !is_outlier(kp, visibility_threshold);
                    rejected += usize::from(!keep);
                    keep
                })
                .collect();

            if inliers.is_empty() {
                return first.slots()[i];
            }

            Some(Keypoint {
                x: median(inliers.iter().map(|kp| kp.x)),
                y: median(inliers.iter().map(|kp| kp.y)),
                z: median(inliers.iter().map(|kp| kp.z)),
                visibility: first.slots()[i]
                    .map_or(inliers[0].visibility, |kp| kp.visibility),
            })
        })
        .collect();

    debug!(samples = samples.len(), rejected, "median-aggregated landmark samples");
    Ok(LandmarkSet::from_complete_slots(slots))
}

/// Median of a non-empty sequence; even counts average the middle pair.
#[allow(clippy::cast_precision_loss)]
fn median(values: impl Iterator<Item = f64>) -> f64 {
    let mut v: Vec<f64> = values.collect();
    v.sort_by(f64::total_cmp);
    let mid = v.len() / 2;
    if v.len() % 2 == 0 {
        (v[mid - 1] + v[mid]) / 2.0
    } else {
        v[mid]
    }
}
