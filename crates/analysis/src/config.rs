//! Analysis configuration.
//!
//! Every threshold the detectors use is a named field here so that a run
//! can be tuned without touching the algorithms.

use shotform_common::config::AnalysisDefaults;
use shotform_common::{ShotformError, ShotformResult};
use shotform_pose_model::{Joint, JointAngle};

/// What to do when the wrist is never visible enough to locate the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnchorPolicy {
    /// Use frame 0 and log a warning.
    #[default]
    Fallback,
    /// Abort the run with `AnchorNotFound`.
    Fail,
}

/// Thresholds for the keyframe detectors.
#[derive(Debug, Clone)]
pub struct KeyframeThresholds {
    /// Minimum wrist rise (normalized) across four samples to mark the lift.
    pub lift_min_rise: f64,

    /// Chest height as a fraction of the shoulder-to-hip distance.
    pub chest_fraction: f64,

    /// Elbow angle (degrees) counted as a fully extended arm.
    pub full_extension_angle: f64,

    /// Maximum elbow angle still accepted as near-full extension.
    pub near_extension_angle: f64,

    /// An elbow that never bends below this is not bent at all.
    pub straight_angle: f64,

    /// Release score weight for wrist height.
    pub release_height_weight: f64,

    /// Release score gain and cap for elbow extension speed.
    pub release_extension_gain: f64,
    pub release_extension_cap: f64,

    /// Release score gain and cap for upward wrist speed.
    pub release_velocity_gain: f64,
    pub release_velocity_cap: f64,
}

impl Default for KeyframeThresholds {
    fn default() -> Self {
        Self {
            lift_min_rise: 0.01,
            chest_fraction: 0.33,
            full_extension_angle: 170.0,
            near_extension_angle: 155.0,
            straight_angle: 180.0,
            release_height_weight: 40.0,
            release_extension_gain: 3.5,
            release_extension_cap: 35.0,
            release_velocity_gain: 250.0,
            release_velocity_cap: 25.0,
        }
    }
}

/// Thresholds for movement-initiation detection.
#[derive(Debug, Clone)]
pub struct ForceThresholds {
    /// Minimum speed (px/s) for a frame to count as moving.
    pub movement_threshold: f64,

    /// Minimum frame-to-frame speed increase (px/s).
    pub acceleration_threshold: f64,

    /// Fallback: fraction of the joint's peak speed that marks initiation.
    pub peak_fraction: f64,

    /// Upper and lower body starting within this many frames move together.
    pub synchronized_frames: i64,
}

impl Default for ForceThresholds {
    fn default() -> Self {
        Self {
            movement_threshold: 20.0,
            acceleration_threshold: 50.0,
            peak_fraction: 0.3,
            synchronized_frames: 2,
        }
    }
}

/// Thresholds for energy-transfer classification.
#[derive(Debug, Clone)]
pub struct EnergyThresholds {
    /// Peak gap (frames) above which transfer counts as sequential.
    pub sequential_frames: i64,
}

impl Default for EnergyThresholds {
    fn default() -> Self {
        Self {
            sequential_frames: 3,
        }
    }
}

/// Full configuration of one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Minimum frames with a detected pose.
    pub min_valid_frames: usize,

    /// Moving-average window for joint speeds.
    pub smoothing_window: usize,

    /// Minimum wrist visibility for anchor detection. A wrist that is present
    /// but below this score does not count, which is stricter than requiring
    /// the landmark to exist; 0 accepts any present wrist.
    pub min_wrist_visibility: f64,

    pub anchor_policy: AnchorPolicy,

    /// Angles computed on every frame.
    pub angles: Vec<JointAngle>,

    /// Joints whose speed and acceleration are tracked.
    pub joints_of_interest: Vec<Joint>,

    pub keyframes: KeyframeThresholds,
    pub force: ForceThresholds,
    pub energy: EnergyThresholds,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::from_defaults(&AnalysisDefaults::default())
    }
}

impl AnalysisConfig {
    /// Build a configuration from the user-facing defaults.
    pub fn from_defaults(defaults: &AnalysisDefaults) -> Self {
        Self {
            min_valid_frames: defaults.min_valid_frames,
            smoothing_window: defaults.smoothing_window,
            min_wrist_visibility: defaults.min_wrist_visibility,
            anchor_policy: if defaults.strict_anchor {
                AnchorPolicy::Fail
            } else {
                AnchorPolicy::Fallback
            },
            angles: JointAngle::ALL.to_vec(),
            joints_of_interest: Joint::REQUIRED.to_vec(),
            keyframes: KeyframeThresholds::default(),
            force: ForceThresholds::default(),
            energy: EnergyThresholds::default(),
        }
    }

    /// Reject settings no detector can work with.
    pub fn validate(&self) -> ShotformResult<()> {
        if !(0.0..=1.0).contains(&self.min_wrist_visibility) {
            return Err(ShotformError::config(format!(
                "min_wrist_visibility must be within [0, 1], got {}",
                self.min_wrist_visibility
            )));
        }
        if !(0.0..=1.0).contains(&self.keyframes.chest_fraction) {
            return Err(ShotformError::config(format!(
                "chest_fraction must be within [0, 1], got {}",
                self.keyframes.chest_fraction
            )));
        }
        if !(self.force.peak_fraction > 0.0 && self.force.peak_fraction <= 1.0) {
            return Err(ShotformError::config(format!(
                "peak_fraction must be within (0, 1], got {}",
                self.force.peak_fraction
            )));
        }
        if self.joints_of_interest.is_empty() {
            return Err(ShotformError::config("no joints of interest configured"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_user_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.min_valid_frames, 10);
        assert_eq!(config.smoothing_window, 3);
        assert_eq!(config.anchor_policy, AnchorPolicy::Fallback);
        assert_eq!(config.angles.len(), 6);
        assert_eq!(config.joints_of_interest.len(), 10);
    }

    #[test]
    fn test_strict_anchor_selects_fail_policy() {
        let defaults = AnalysisDefaults {
            strict_anchor: true,
            ..Default::default()
        };
        let config = AnalysisConfig::from_defaults(&defaults);
        assert_eq!(config.anchor_policy, AnchorPolicy::Fail);
    }

    #[test]
    fn test_validate_rejects_out_of_range_settings() {
        assert!(AnalysisConfig::default().validate().is_ok());

        let mut config = AnalysisConfig::default();
        config.min_wrist_visibility = 1.5;
        assert!(matches!(config.validate(), Err(ShotformError::Config { .. })));

        let mut config = AnalysisConfig::default();
        config.force.peak_fraction = 0.0;
        assert!(matches!(config.validate(), Err(ShotformError::Config { .. })));

        let mut config = AnalysisConfig::default();
        config.min_wrist_visibility = f64::NAN;
        assert!(config.validate().is_err());
    }
}
