//! Derived analyses computed from frames and keyframes.
//!
//! These are plain data: the computation lives in `shotform-analysis`.

use serde::{Deserialize, Serialize};

use crate::keyframe::KeyframeName;
use crate::landmark::Joint;

/// Frame range an analysis was computed over (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRange {
    pub start_frame: usize,
    pub end_frame: usize,
    /// Keyframe the range starts at, when one was available.
    pub start_keyframe: Option<KeyframeName>,
}

/// Interval between two time-adjacent keyframes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseDuration {
    pub from: KeyframeName,
    pub to: KeyframeName,
    pub frames: i64,
    pub seconds: f64,
    pub from_frame: usize,
    pub to_frame: usize,
}

impl PhaseDuration {
    /// `"<from>_to_<to>"`.
    pub fn name(&self) -> String {
        format!("{}_to_{}", self.from, self.to)
    }
}

/// Durations of the coarse shot phases, in seconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyPhases {
    /// `ball_lowest` → `squat_deepest`.
    pub preparation: Option<f64>,
    /// `squat_deepest` → `release`.
    pub power_phase: Option<f64>,
    /// `release` → `follow_through`.
    pub follow_through: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RhythmAnalysis {
    pub phase_durations: Vec<PhaseDuration>,
    /// First to last keyframe, in seconds.
    pub total_duration: f64,
    /// Anchor to last keyframe, in seconds.
    pub shooting_duration: f64,
    /// Coefficient of variation of the phase durations.
    pub rhythm_consistency: f64,
    pub key_phases: KeyPhases,
    pub phase_count: usize,
    pub avg_phase_duration: f64,
}

/// How a joint's initiation frame was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitiationMethod {
    /// Speed jumped by at least the acceleration threshold while above the
    /// movement threshold.
    Acceleration,
    /// First frame reaching a fraction of the joint's own peak speed.
    PeakFraction,
}

/// When a joint started moving significantly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointInitiation {
    pub joint: Joint,
    /// Absolute frame index.
    pub frame: usize,
    /// Seconds from frame 0.
    pub time: f64,
    pub velocity: f64,
    /// Frame-to-frame speed increase; 0 for the peak-fraction fallback.
    pub acceleration: f64,
    pub method: InitiationMethod,
}

/// Initiation gap between consecutive joints of the actual sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointInterval {
    pub from: Joint,
    pub to: Joint,
    pub frame_diff: i64,
    pub time_diff_seconds: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairCategory {
    UpperArm,
    LowerLimb,
}

/// Which member of a joint pair moved first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairLeader {
    Joint(Joint),
    Simultaneous,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairTiming {
    pub joint1_frame: usize,
    pub joint2_frame: usize,
    /// `joint2_frame - joint1_frame`.
    pub frame_diff: i64,
    pub time_diff_seconds: f64,
    pub leader: PairLeader,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointPairAnalysis {
    pub joint1: Joint,
    pub joint2: Joint,
    pub category: PairCategory,
    /// `None` when either joint has no initiation frame.
    pub timing: Option<PairTiming>,
}

impl JointPairAnalysis {
    pub fn name(&self) -> String {
        format!("{}-{}", self.joint1, self.joint2)
    }
}

/// Coarse body regions of the kinetic chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyRegion {
    Lower,
    Hip,
    Upper,
}

/// Kinetic-chain initiation pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    LowerHipUpper,
    HipLowerUpper,
    HipUpperLower,
    HipFirst,
    LowerSynchronized,
    LowerFirst,
    UpperFirst,
    IncompleteData,
}

impl PatternType {
    pub fn description(self) -> &'static str {
        match self {
            PatternType::LowerHipUpper => "lower body -> hip -> upper body",
            PatternType::HipLowerUpper => "hip -> lower body -> upper body",
            PatternType::HipUpperLower => "hip -> upper body -> lower body",
            PatternType::HipFirst => "hip-led drive",
            PatternType::LowerSynchronized => "lower body leads, upper body follows together",
            PatternType::LowerFirst => "lower-body-led drive",
            PatternType::UpperFirst => "upper body starts first",
            PatternType::IncompleteData => "not enough data to classify the movement pattern",
        }
    }
}

/// Earliest initiation frame per region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionStarts {
    pub lower: usize,
    pub hip: usize,
    pub upper: usize,
}

/// Signed frame gaps between region starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionTimeDiffs {
    pub hip_vs_lower: i64,
    pub upper_vs_hip: i64,
    pub upper_vs_lower: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementPattern {
    pub pattern_type: PatternType,
    /// Regions in initiation order; empty for incomplete data.
    pub initiation_order: Vec<BodyRegion>,
    pub key_parts: Option<RegionStarts>,
    pub time_differences: Option<RegionTimeDiffs>,
}

impl MovementPattern {
    pub fn incomplete() -> Self {
        Self {
            pattern_type: PatternType::IncompleteData,
            initiation_order: vec![],
            key_parts: None,
            time_differences: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForceSequenceAnalysis {
    /// Initiation per joint, in monitoring order; joints without data are absent.
    pub initiations: Vec<JointInitiation>,
    /// Joints ordered by initiation frame.
    pub actual_sequence: Vec<Joint>,
    pub time_intervals: Vec<JointInterval>,
    pub joint_pairs: Vec<JointPairAnalysis>,
    pub pairs_summary: String,
    pub pattern: MovementPattern,
    pub movement_threshold: f64,
    pub acceleration_threshold: f64,
    pub monitored_joints: Vec<Joint>,
    pub analysis_range: AnalysisRange,
}

impl ForceSequenceAnalysis {
    pub fn initiation(&self, joint: Joint) -> Option<&JointInitiation> {
        self.initiations.iter().find(|i| i.joint == joint)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferTiming {
    /// Upper body peaks more than a few frames after the lower body.
    Sequential,
    /// Upper body peaks together with or shortly after the lower body.
    Synchronized,
    /// Upper body peaks first.
    Reversed,
    /// Not enough frames to compare.
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyTransferAnalysis {
    pub lower_body_peak_velocity: f64,
    pub upper_body_peak_velocity: f64,
    pub velocity_ratio: f64,
    pub transfer_timing: TransferTiming,
    pub lower_peak_frame: usize,
    pub upper_peak_frame: usize,
    /// `upper_peak_frame - lower_peak_frame`.
    pub timing_difference: i64,
    pub lower_body_joints: Vec<Joint>,
    pub upper_body_joints: Vec<Joint>,
    pub analysis_range: AnalysisRange,
}
