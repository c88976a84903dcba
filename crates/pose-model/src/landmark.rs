//! Pose landmarks and the joints the analysis reads.
//!
//! Landmarks arrive from an external pose estimator. Normalized coordinates
//! are in `[0.0, 1.0]` relative to the frame; image y grows downward, so a
//! larger `y` means a lower position.

use serde::{Deserialize, Serialize};

/// A single named anatomical point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Normalized X coordinate.
    pub x: f64,
    /// Normalized Y coordinate (downward).
    pub y: f64,
    /// Relative depth.
    #[serde(default)]
    pub z: f64,
    /// Detection confidence in `[0.0, 1.0]`.
    #[serde(default = "full_visibility")]
    pub visibility: f64,
    /// X coordinate in pixels.
    pub x_pixel: i32,
    /// Y coordinate in pixels.
    pub y_pixel: i32,
}

fn full_visibility() -> f64 {
    1.0
}

impl Landmark {
    /// Create a landmark from normalized coordinates and a frame size.
    pub fn from_normalized(x: f64, y: f64, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            z: 0.0,
            visibility: 1.0,
            x_pixel: (x * width as f64) as i32,
            y_pixel: (y * height as f64) as i32,
        }
    }

    /// Same landmark with a different visibility score.
    pub fn with_visibility(mut self, visibility: f64) -> Self {
        self.visibility = visibility;
        self
    }

    /// Whether the landmark is at least `min_visibility` confident.
    pub fn is_visible(&self, min_visibility: f64) -> bool {
        self.visibility >= min_visibility
    }

    /// Euclidean distance in pixels.
    pub fn pixel_distance(&self, other: &Landmark) -> f64 {
        let dx = (self.x_pixel - other.x_pixel) as f64;
        let dy = (self.y_pixel - other.y_pixel) as f64;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Joints referenced by the shot analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    Nose,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    RightIndex,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl Joint {
    /// Joints the pose collaborator must supply for a complete analysis.
    pub const REQUIRED: [Joint; 10] = [
        Joint::RightHip,
        Joint::RightKnee,
        Joint::RightAnkle,
        Joint::RightShoulder,
        Joint::RightElbow,
        Joint::RightWrist,
        Joint::RightIndex,
        Joint::Nose,
        Joint::LeftShoulder,
        Joint::LeftHip,
    ];

    /// Landmark key used by the pose collaborator.
    pub fn name(self) -> &'static str {
        match self {
            Joint::Nose => "nose",
            Joint::LeftShoulder => "left_shoulder",
            Joint::RightShoulder => "right_shoulder",
            Joint::LeftElbow => "left_elbow",
            Joint::RightElbow => "right_elbow",
            Joint::LeftWrist => "left_wrist",
            Joint::RightWrist => "right_wrist",
            Joint::RightIndex => "right_index",
            Joint::LeftHip => "left_hip",
            Joint::RightHip => "right_hip",
            Joint::LeftKnee => "left_knee",
            Joint::RightKnee => "right_knee",
            Joint::LeftAnkle => "left_ankle",
            Joint::RightAnkle => "right_ankle",
        }
    }
}

impl std::fmt::Display for Joint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Vertex-angle metrics computed on every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointAngle {
    Knee,
    Hip,
    Elbow,
    Shoulder,
    Wrist,
    TrunkLean,
}

impl JointAngle {
    pub const ALL: [JointAngle; 6] = [
        JointAngle::Knee,
        JointAngle::Hip,
        JointAngle::Elbow,
        JointAngle::Shoulder,
        JointAngle::Wrist,
        JointAngle::TrunkLean,
    ];

    /// Key under which the angle is stored on a frame.
    pub fn key(self) -> &'static str {
        match self {
            JointAngle::Knee => "knee_angle",
            JointAngle::Hip => "hip_angle",
            JointAngle::Elbow => "elbow_angle",
            JointAngle::Shoulder => "shoulder_angle",
            JointAngle::Wrist => "wrist_angle",
            JointAngle::TrunkLean => "trunk_lean",
        }
    }

    /// The three joints forming the angle; the middle one is the vertex.
    pub fn joints(self) -> [Joint; 3] {
        match self {
            JointAngle::Knee => [Joint::RightHip, Joint::RightKnee, Joint::RightAnkle],
            JointAngle::Hip => [Joint::RightShoulder, Joint::RightHip, Joint::RightKnee],
            JointAngle::Elbow => [Joint::RightShoulder, Joint::RightElbow, Joint::RightWrist],
            JointAngle::Shoulder => [Joint::RightHip, Joint::RightShoulder, Joint::RightElbow],
            JointAngle::Wrist => [Joint::RightElbow, Joint::RightWrist, Joint::RightIndex],
            JointAngle::TrunkLean => [Joint::Nose, Joint::RightHip, Joint::RightKnee],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joint_serializes_as_landmark_key() {
        let json = serde_json::to_string(&Joint::RightWrist).unwrap();
        assert_eq!(json, "\"right_wrist\"");
        assert_eq!(Joint::RightWrist.name(), "right_wrist");
    }

    #[test]
    fn test_landmark_defaults_visibility_when_absent() {
        let raw = r#"{"x":0.5,"y":0.25,"x_pixel":320,"y_pixel":120}"#;
        let lm: Landmark = serde_json::from_str(raw).unwrap();
        assert_eq!(lm.visibility, 1.0);
        assert_eq!(lm.z, 0.0);
    }

    #[test]
    fn test_pixel_distance() {
        let a = Landmark::from_normalized(0.0, 0.0, 100, 100);
        let b = Landmark::from_normalized(0.03, 0.04, 100, 100);
        assert!((a.pixel_distance(&b) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_elbow_angle_vertex_is_elbow() {
        assert_eq!(JointAngle::Elbow.joints()[1], Joint::RightElbow);
        assert_eq!(JointAngle::Elbow.key(), "elbow_angle");
    }
}
