//! Energy transfer from the lower to the upper body.

use shotform_pose_model::{
    AnalysisRange, EnergyTransferAnalysis, FrameRecord, Joint, KeyframeSet, TransferTiming,
};

use crate::config::EnergyThresholds;
use crate::force_sequence::shot_range;
use crate::metrics::argmax;

pub const LOWER_BODY_JOINTS: [Joint; 3] = [Joint::RightAnkle, Joint::RightKnee, Joint::RightHip];
pub const UPPER_BODY_JOINTS: [Joint; 3] = [Joint::RightShoulder, Joint::RightElbow, Joint::RightWrist];

/// Result for a window too short to compare.
pub fn unknown_transfer(range: AnalysisRange) -> EnergyTransferAnalysis {
    EnergyTransferAnalysis {
        lower_body_peak_velocity: 0.0,
        upper_body_peak_velocity: 0.0,
        velocity_ratio: 0.0,
        transfer_timing: TransferTiming::Unknown,
        lower_peak_frame: 0,
        upper_peak_frame: 0,
        timing_difference: 0,
        lower_body_joints: LOWER_BODY_JOINTS.to_vec(),
        upper_body_joints: UPPER_BODY_JOINTS.to_vec(),
        analysis_range: range,
    }
}

/// Mean of the positive, present speeds of `joints`; 0 without a pose.
fn group_speed(frame: &FrameRecord, joints: &[Joint]) -> f64 {
    if !frame.pose_detected {
        return 0.0;
    }
    let moving: Vec<f64> = joints
        .iter()
        .filter_map(|&j| frame.velocity(j))
        .filter(|v| *v > 0.0)
        .collect();
    if moving.is_empty() {
        0.0
    } else {
        moving.iter().sum::<f64>() / moving.len() as f64
    }
}

/// Compare lower- and upper-body peak speeds between anchor and release.
pub fn analyze_energy_transfer(
    frames: &[FrameRecord],
    keyframes: &KeyframeSet,
    thresholds: &EnergyThresholds,
) -> EnergyTransferAnalysis {
    let range = shot_range(frames.len(), keyframes);
    if range.start_frame >= range.end_frame {
        return unknown_transfer(range);
    }

    let window = frames.get(range.start_frame..=range.end_frame).unwrap_or(&[]);
    let lower: Vec<f64> = window.iter().map(|f| group_speed(f, &LOWER_BODY_JOINTS)).collect();
    let upper: Vec<f64> = window.iter().map(|f| group_speed(f, &UPPER_BODY_JOINTS)).collect();

    compare_peaks(&lower, &upper, range, thresholds)
}

/// Classify per-frame group speeds that start at `range.start_frame`.
pub fn compare_peaks(
    lower: &[f64],
    upper: &[f64],
    range: AnalysisRange,
    thresholds: &EnergyThresholds,
) -> EnergyTransferAnalysis {
    let (Some(lower_idx), Some(upper_idx)) = (argmax(lower), argmax(upper)) else {
        return unknown_transfer(range);
    };

    let lower_peak = lower[lower_idx];
    let upper_peak = upper[upper_idx];
    let lower_peak_frame = range.start_frame + lower_idx;
    let upper_peak_frame = range.start_frame + upper_idx;
    let timing_difference = upper_peak_frame as i64 - lower_peak_frame as i64;

    let transfer_timing = if timing_difference > thresholds.sequential_frames {
        TransferTiming::Sequential
    } else if timing_difference >= 0 {
        TransferTiming::Synchronized
    } else {
        TransferTiming::Reversed
    };

    EnergyTransferAnalysis {
        lower_body_peak_velocity: lower_peak,
        upper_body_peak_velocity: upper_peak,
        velocity_ratio: if lower_peak > 0.0 {
            upper_peak / lower_peak
        } else {
            0.0
        },
        transfer_timing,
        lower_peak_frame,
        upper_peak_frame,
        timing_difference,
        lower_body_joints: LOWER_BODY_JOINTS.to_vec(),
        upper_body_joints: UPPER_BODY_JOINTS.to_vec(),
        analysis_range: range,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shotform_pose_model::{AnchorOutcome, Keyframe, KeyframeName, LandmarkMap, PoseFrame};

    fn range(start: usize, end: usize) -> AnalysisRange {
        AnalysisRange {
            start_frame: start,
            end_frame: end,
            start_keyframe: Some(KeyframeName::BallLowest),
        }
    }

    fn spike(len: usize, at: usize, value: f64) -> Vec<f64> {
        (0..len).map(|i| if i == at { value } else { value / 10.0 }).collect()
    }

    #[test]
    fn test_sequential_transfer() {
        let lower = spike(20, 10, 100.0);
        let upper = spike(20, 14, 250.0);
        let result = compare_peaks(&lower, &upper, range(0, 19), &EnergyThresholds::default());

        assert!((result.velocity_ratio - 2.5).abs() < 1e-9);
        assert_eq!(result.timing_difference, 4);
        assert_eq!(result.transfer_timing, TransferTiming::Sequential);
    }

    #[test]
    fn test_synchronized_and_reversed() {
        let thresholds = EnergyThresholds::default();
        let lower = spike(10, 4, 50.0);

        let same = compare_peaks(&lower, &spike(10, 7, 80.0), range(0, 9), &thresholds);
        assert_eq!(same.transfer_timing, TransferTiming::Synchronized);

        let early = compare_peaks(&lower, &spike(10, 2, 80.0), range(0, 9), &thresholds);
        assert_eq!(early.transfer_timing, TransferTiming::Reversed);
        assert_eq!(early.timing_difference, -2);
    }

    #[test]
    fn test_zero_lower_peak_gives_zero_ratio() {
        let result = compare_peaks(&[0.0, 0.0], &[1.0, 3.0], range(5, 6), &EnergyThresholds::default());
        assert_eq!(result.velocity_ratio, 0.0);
        assert_eq!(result.upper_peak_frame, 6);
    }

    #[test]
    fn test_single_frame_window_is_unknown() {
        let frames: Vec<FrameRecord> = (0..3)
            .map(|i| {
                FrameRecord::from(PoseFrame {
                    frame_number: i,
                    timestamp: 0.0,
                    landmarks: Some(LandmarkMap::new()),
                })
            })
            .collect();
        let keyframes = KeyframeSet::new(
            vec![Keyframe {
                name: KeyframeName::BallLowest,
                index: 2,
                frame_number: 2,
                timestamp: 0.0,
                description: String::new(),
            }],
            AnchorOutcome::Detected,
            vec![],
        );
        let result = analyze_energy_transfer(&frames, &keyframes, &EnergyThresholds::default());
        assert_eq!(result.transfer_timing, TransferTiming::Unknown);
    }

    #[test]
    fn test_group_speed_ignores_missing_and_still_joints() {
        let mut frame = FrameRecord::from(PoseFrame {
            frame_number: 0,
            timestamp: 0.0,
            landmarks: Some(
                [("nose".to_string(), shotform_pose_model::Landmark::from_normalized(0.5, 0.5, 10, 10))]
                    .into_iter()
                    .collect(),
            ),
        });
        frame.velocities.insert("right_ankle".into(), 0.0);
        frame.velocities.insert("right_knee".into(), 30.0);
        frame.velocities.insert("right_hip".into(), 10.0);
        assert_eq!(group_speed(&frame, &LOWER_BODY_JOINTS), 20.0);
        assert_eq!(group_speed(&frame, &UPPER_BODY_JOINTS), 0.0);
    }
}
