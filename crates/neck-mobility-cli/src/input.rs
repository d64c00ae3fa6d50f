//! Capture files: resolved pose-engine output stored as JSON.
//!
//! One file per capture. Each file lists one or more detection passes over
//! the same still image:
//!
//! ```json
//! {
//!   "detections": [
//!     {
//!       "landmarks": [ { "x": 0.5, "y": 0.29, "z": 0.0, "visibility": 0.99 }, null, ... ],
//!       "face_mesh": null
//!     }
//!   ]
//! }
//! ```
//!
//! `landmarks` holds exactly 33 slots (`null` for undetected points), or is
//! itself `null` when the engine found nobody. `face_mesh` is optional.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use neck_mobility_core::{
    CaptureType, FaceMesh, LandmarkFrame, LandmarkSet, MobilityResult, PoseDetection, PoseSource,
};

/// Contents of one capture file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureFile {
    /// Detection passes over the same image
    pub detections: Vec<DetectionRecord>,
}

/// One detection pass as written by the pose engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionRecord {
    /// 33 pose landmarks, or `None` if no pose was detected
    pub landmarks: Option<LandmarkSet>,
    /// Dense face landmarks, when available
    #[serde(default)]
    pub face_mesh: Option<FaceMesh>,
}

impl From<DetectionRecord> for PoseDetection {
    fn from(record: DetectionRecord) -> Self {
        match record.landmarks {
            Some(pose) => PoseDetection::Detected(LandmarkFrame::from_detection(pose, record.face_mesh)),
            None => PoseDetection::NoPose,
        }
    }
}

impl CaptureFile {
    /// Reads and parses a capture file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read capture file {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("Invalid capture file {}", path.display()))
    }

    /// Parses capture-file JSON.
    pub fn parse(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Converts every pass into a [`PoseDetection`].
    pub fn into_detections(self) -> Vec<PoseDetection> {
        self.detections.into_iter().map(PoseDetection::from).collect()
    }
}

/// [`PoseSource`] backed by capture files loaded up front.
#[derive(Debug, Default)]
pub struct CaptureFileSource {
    captures: HashMap<CaptureType, Vec<PoseDetection>>,
}

impl CaptureFileSource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the file for one capture type, replacing any earlier one.
    pub fn load(&mut self, capture_type: CaptureType, path: &Path) -> Result<()> {
        let file = CaptureFile::load(path)?;
        tracing::debug!(
            capture = %capture_type,
            passes = file.detections.len(),
            path = %path.display(),
            "capture file loaded"
        );
        self.captures.insert(capture_type, file.into_detections());
        Ok(())
    }

    /// Adds already-parsed detections for one capture type.
    pub fn insert(&mut self, capture_type: CaptureType, detections: Vec<PoseDetection>) {
        self.captures.insert(capture_type, detections);
    }
}

impl PoseSource for CaptureFileSource {
    fn detect(&mut self, capture_type: CaptureType) -> MobilityResult<Vec<PoseDetection>> {
        Ok(self.captures.get(&capture_type).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neck_mobility_core::LandmarkIndex;

    fn landmarks_json(count: usize) -> String {
        let slots: Vec<String> = (0..count)
            .map(|i| {
                if i == LandmarkIndex::Nose.index() {
                    r#"{"x":0.5,"y":0.29,"visibility":0.98}"#.to_string()
                } else {
                    "null".to_string()
                }
            })
            .collect();
        format!("[{}]", slots.join(","))
    }

    #[test]
    fn test_parse_detected_pass() {
        let json = format!(r#"{{ "detections": [ {{ "landmarks": {} }} ] }}"#, landmarks_json(33));
        let file = CaptureFile::parse(&json).unwrap();
        let detections = file.into_detections();
        assert_eq!(detections.len(), 1);

        let frame = detections[0].frame().expect("pose detected");
        let nose = frame.pose().get(LandmarkIndex::Nose).unwrap();
        assert_eq!(nose.z, 0.0);
        assert_eq!(nose.visibility, Some(0.98));
        assert!(frame.face_mesh().is_none());
    }

    #[test]
    fn test_parse_no_pose_pass() {
        let file = CaptureFile::parse(r#"{ "detections": [ { "landmarks": null } ] }"#).unwrap();
        assert_eq!(file.into_detections(), vec![PoseDetection::NoPose]);
    }

    #[test]
    fn test_wrong_slot_count_is_rejected() {
        let json = format!(r#"{{ "detections": [ {{ "landmarks": {} }} ] }}"#, landmarks_json(17));
        let err = CaptureFile::parse(&json).unwrap_err();
        assert!(format!("{err:#}").contains("expected 33"), "got {err:#}");
    }

    #[test]
    fn test_source_returns_loaded_capture() {
        let mut source = CaptureFileSource::new();
        source.insert(CaptureType::Neutral, vec![PoseDetection::NoPose]);
        assert_eq!(source.detect(CaptureType::Neutral).unwrap().len(), 1);
        assert!(source.detect(CaptureType::LeftTilt).unwrap().is_empty());
    }
}
