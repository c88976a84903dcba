//! Per-frame records.
//!
//! A [`PoseFrame`] is what the pose collaborator hands over. It becomes a
//! [`FrameRecord`] once at the start of a run, gets annotated by a single
//! metrics pass, and is read-only after that.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::landmark::{Joint, JointAngle, Landmark};

/// Landmarks keyed by joint name.
pub type LandmarkMap = BTreeMap<String, Landmark>;

/// Raw frame from the pose-estimation collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseFrame {
    /// Frame number in the source video.
    pub frame_number: u64,
    /// Seconds since the start of the video.
    pub timestamp: f64,
    /// Detected landmarks, or `None` when no pose was found.
    #[serde(default)]
    pub landmarks: Option<LandmarkMap>,
}

/// Body center of mass, approximated by the hip midpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CenterOfMass {
    pub x: f64,
    pub y: f64,
    pub x_pixel: i32,
    pub y_pixel: i32,
}

/// A sampled frame with its derived kinematics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub frame_number: u64,
    pub timestamp: f64,
    pub pose_detected: bool,
    pub landmarks: Option<LandmarkMap>,

    /// Joint angles in degrees, keyed by [`JointAngle::key`]. Undefined
    /// angles are absent.
    #[serde(default)]
    pub angles: BTreeMap<String, f64>,

    /// Joint speeds in pixels per second, keyed by joint name.
    #[serde(default)]
    pub velocities: BTreeMap<String, f64>,

    /// Joint accelerations in pixels per second squared, keyed by joint name.
    #[serde(default)]
    pub accelerations: BTreeMap<String, f64>,

    #[serde(default)]
    pub center_of_mass: Option<CenterOfMass>,

    /// Forearm angle above horizontal, in degrees.
    #[serde(default)]
    pub shooting_arc: Option<f64>,
}

impl From<PoseFrame> for FrameRecord {
    fn from(frame: PoseFrame) -> Self {
        let pose_detected = frame
            .landmarks
            .as_ref()
            .map(|landmarks| !landmarks.is_empty())
            .unwrap_or(false);
        Self {
            frame_number: frame.frame_number,
            timestamp: frame.timestamp,
            pose_detected,
            landmarks: if pose_detected { frame.landmarks } else { None },
            angles: BTreeMap::new(),
            velocities: BTreeMap::new(),
            accelerations: BTreeMap::new(),
            center_of_mass: None,
            shooting_arc: None,
        }
    }
}

impl FrameRecord {
    /// Landmark for a joint, if the pose was detected and includes it.
    pub fn landmark(&self, joint: Joint) -> Option<&Landmark> {
        self.landmarks.as_ref()?.get(joint.name())
    }

    /// Normalized y of a joint.
    pub fn joint_y(&self, joint: Joint) -> Option<f64> {
        self.landmark(joint).map(|lm| lm.y)
    }

    /// Stored angle in degrees.
    pub fn angle(&self, angle: JointAngle) -> Option<f64> {
        self.angles.get(angle.key()).copied()
    }

    /// Stored speed of a joint in pixels per second.
    pub fn velocity(&self, joint: Joint) -> Option<f64> {
        self.velocities.get(joint.name()).copied()
    }

    /// Stored acceleration of a joint in pixels per second squared.
    pub fn acceleration(&self, joint: Joint) -> Option<f64> {
        self.accelerations.get(joint.name()).copied()
    }
}
