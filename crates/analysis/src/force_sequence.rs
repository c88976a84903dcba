//! Movement-initiation order along the kinetic chain.
//!
//! For each monitored joint, find the frame where it starts moving
//! significantly, then compare joints pairwise and classify the overall
//! lower-body / hip / upper-body pattern.

use shotform_common::FrameClock;
use shotform_pose_model::{
    AnalysisRange, BodyRegion, ForceSequenceAnalysis, FrameRecord, InitiationMethod, Joint,
    JointInitiation, JointInterval, JointPairAnalysis, KeyframeName, KeyframeSet, MovementPattern,
    PairCategory, PairLeader, PairTiming, PatternType, RegionStarts, RegionTimeDiffs,
};

use crate::config::ForceThresholds;
use crate::metrics::argmax_by;

/// Joints monitored, bottom of the chain first.
pub const MONITORED_JOINTS: [Joint; 6] = [
    Joint::RightAnkle,
    Joint::RightKnee,
    Joint::RightHip,
    Joint::RightShoulder,
    Joint::RightElbow,
    Joint::RightWrist,
];

const LOWER_JOINTS: [Joint; 2] = [Joint::RightAnkle, Joint::RightKnee];
const UPPER_JOINTS: [Joint; 3] = [Joint::RightShoulder, Joint::RightElbow, Joint::RightWrist];

const KEY_PAIRS: [(Joint, Joint, PairCategory); 3] = [
    (Joint::RightWrist, Joint::RightElbow, PairCategory::UpperArm),
    (Joint::RightElbow, Joint::RightShoulder, PairCategory::UpperArm),
    (Joint::RightHip, Joint::RightKnee, PairCategory::LowerLimb),
];

/// Fewer samples than this cannot show an initiation.
const MIN_SAMPLES: usize = 3;

/// Inclusive frame range from the anchor to the release (or the last frame).
pub fn shot_range(frame_count: usize, keyframes: &KeyframeSet) -> AnalysisRange {
    let start_keyframe = keyframes
        .contains(KeyframeName::BallLowest)
        .then_some(KeyframeName::BallLowest);
    let last = frame_count.saturating_sub(1);
    AnalysisRange {
        start_frame: keyframes.index_of(KeyframeName::BallLowest).unwrap_or(0),
        end_frame: keyframes
            .index_of(KeyframeName::Release)
            .map_or(last, |release| release.min(last)),
        start_keyframe,
    }
}

/// Analyze which joints start moving first between the anchor and release.
pub fn analyze_force_sequence(
    frames: &[FrameRecord],
    keyframes: &KeyframeSet,
    clock: FrameClock,
    thresholds: &ForceThresholds,
) -> ForceSequenceAnalysis {
    let range = shot_range(frames.len(), keyframes);
    let in_range = frames
        .get(range.start_frame..=range.end_frame)
        .unwrap_or(&[]);

    let initiations: Vec<JointInitiation> = MONITORED_JOINTS
        .iter()
        .filter_map(|&joint| {
            let samples = joint_samples(in_range, range.start_frame, joint)?;
            find_initiation(joint, &samples, clock, thresholds)
        })
        .collect();

    let mut ordered: Vec<&JointInitiation> = initiations.iter().collect();
    ordered.sort_by_key(|init| init.frame);
    let actual_sequence: Vec<Joint> = ordered.iter().map(|init| init.joint).collect();

    let time_intervals = ordered
        .windows(2)
        .map(|w| {
            let frame_diff = FrameClock::frame_gap(w[0].frame, w[1].frame);
            JointInterval {
                from: w[0].joint,
                to: w[1].joint,
                frame_diff,
                time_diff_seconds: clock.frames_to_secs(frame_diff),
            }
        })
        .collect();

    let joint_pairs = analyze_joint_pairs(&initiations, clock);
    let pairs_summary = summarize_pairs(&joint_pairs);
    let pattern = classify_pattern(&initiations, thresholds.synchronized_frames);

    tracing::debug!(
        joints = initiations.len(),
        pattern = ?pattern.pattern_type,
        "Force sequence analyzed"
    );

    ForceSequenceAnalysis {
        initiations,
        actual_sequence,
        time_intervals,
        joint_pairs,
        pairs_summary,
        pattern,
        movement_threshold: thresholds.movement_threshold,
        acceleration_threshold: thresholds.acceleration_threshold,
        monitored_joints: MONITORED_JOINTS.to_vec(),
        analysis_range: range,
    }
}

/// `(absolute index, speed)` per frame. Frames without a pose or without the
/// joint count as 0; `None` when the joint was never measured.
fn joint_samples(frames: &[FrameRecord], offset: usize, joint: Joint) -> Option<Vec<(usize, f64)>> {
    let mut seen = false;
    let samples: Vec<(usize, f64)> = frames
        .iter()
        .enumerate()
        .map(|(i, frame)| {
            let speed = if frame.pose_detected {
                frame.velocity(joint)
            } else {
                None
            };
            seen |= speed.is_some();
            (offset + i, speed.unwrap_or(0.0))
        })
        .collect();

    (seen && samples.len() >= MIN_SAMPLES).then_some(samples)
}

fn find_initiation(
    joint: Joint,
    samples: &[(usize, f64)],
    clock: FrameClock,
    thresholds: &ForceThresholds,
) -> Option<JointInitiation> {
    let accelerating = samples.windows(2).find(|w| {
        let increase = w[1].1 - w[0].1;
        increase >= thresholds.acceleration_threshold && w[1].1 >= thresholds.movement_threshold
    });
    if let Some(w) = accelerating {
        let (frame, velocity) = w[1];
        return Some(JointInitiation {
            joint,
            frame,
            time: clock.index_to_secs(frame),
            velocity,
            acceleration: velocity - w[0].1,
            method: InitiationMethod::Acceleration,
        });
    }

    let peak_pos = argmax_by(samples.iter().enumerate().map(|(pos, (_, v))| (pos, *v)))?;
    let threshold = samples[peak_pos].1 * thresholds.peak_fraction;
    samples[..peak_pos]
        .iter()
        .find(|(_, v)| *v >= threshold)
        .map(|&(frame, velocity)| JointInitiation {
            joint,
            frame,
            time: clock.index_to_secs(frame),
            velocity,
            acceleration: 0.0,
            method: InitiationMethod::PeakFraction,
        })
}

fn initiation_frame(initiations: &[JointInitiation], joint: Joint) -> Option<usize> {
    initiations.iter().find(|i| i.joint == joint).map(|i| i.frame)
}

/// Which member of each key pair moved first.
pub fn analyze_joint_pairs(initiations: &[JointInitiation], clock: FrameClock) -> Vec<JointPairAnalysis> {
    KEY_PAIRS
        .iter()
        .map(|&(joint1, joint2, category)| {
            let timing = match (
                initiation_frame(initiations, joint1),
                initiation_frame(initiations, joint2),
            ) {
                (Some(joint1_frame), Some(joint2_frame)) => {
                    let frame_diff = FrameClock::frame_gap(joint1_frame, joint2_frame);
                    let leader = match frame_diff {
                        d if d > 0 => PairLeader::Joint(joint1),
                        d if d < 0 => PairLeader::Joint(joint2),
                        _ => PairLeader::Simultaneous,
                    };
                    Some(PairTiming {
                        joint1_frame,
                        joint2_frame,
                        frame_diff,
                        time_diff_seconds: clock.frames_to_secs(frame_diff),
                        leader,
                    })
                }
                _ => None,
            };
            JointPairAnalysis {
                joint1,
                joint2,
                category,
                timing,
            }
        })
        .collect()
}

/// One clause per measured pair, `"; "`-separated.
pub fn summarize_pairs(pairs: &[JointPairAnalysis]) -> String {
    let parts: Vec<String> = pairs
        .iter()
        .filter_map(|pair| {
            let timing = pair.timing.as_ref()?;
            let lead = match timing.leader {
                PairLeader::Joint(joint) => format!("{joint} moves first"),
                PairLeader::Simultaneous => "simultaneous".to_string(),
            };
            Some(format!(
                "{}: {lead} ({} frame gap)",
                pair.name(),
                timing.frame_diff.abs()
            ))
        })
        .collect();

    if parts.is_empty() {
        "incomplete data".to_string()
    } else {
        parts.join("; ")
    }
}

/// Classify the lower / hip / upper initiation order.
///
/// Regions starting on the same frame keep the order lower, hip, upper.
pub fn classify_pattern(initiations: &[JointInitiation], synchronized_frames: i64) -> MovementPattern {
    let earliest = |joints: &[Joint]| {
        joints
            .iter()
            .filter_map(|&j| initiation_frame(initiations, j))
            .min()
    };

    let (Some(lower), Some(hip), Some(upper)) = (
        earliest(&LOWER_JOINTS),
        initiation_frame(initiations, Joint::RightHip),
        earliest(&UPPER_JOINTS),
    ) else {
        return MovementPattern::incomplete();
    };

    let mut timing = [
        (BodyRegion::Lower, lower),
        (BodyRegion::Hip, hip),
        (BodyRegion::Upper, upper),
    ];
    timing.sort_by_key(|(_, frame)| *frame);
    let order: Vec<BodyRegion> = timing.iter().map(|(region, _)| *region).collect();

    let diffs = RegionTimeDiffs {
        hip_vs_lower: FrameClock::frame_gap(lower, hip),
        upper_vs_hip: FrameClock::frame_gap(hip, upper),
        upper_vs_lower: FrameClock::frame_gap(lower, upper),
    };

    use BodyRegion::{Hip, Lower, Upper};
    let pattern_type = match order.as_slice() {
        [Lower, Hip, Upper] => PatternType::LowerHipUpper,
        [Hip, Lower, Upper] => PatternType::HipLowerUpper,
        [Hip, Upper, Lower] => PatternType::HipUpperLower,
        [Hip, ..] => PatternType::HipFirst,
        [Lower, ..] if diffs.upper_vs_lower.abs() <= synchronized_frames => {
            PatternType::LowerSynchronized
        }
        [Lower, ..] => PatternType::LowerFirst,
        _ => PatternType::UpperFirst,
    };

    MovementPattern {
        pattern_type,
        initiation_order: order,
        key_parts: Some(RegionStarts { lower, hip, upper }),
        time_differences: Some(diffs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shotform_pose_model::{AnchorOutcome, Keyframe, LandmarkMap, PoseFrame};

    fn init(joint: Joint, frame: usize) -> JointInitiation {
        JointInitiation {
            joint,
            frame,
            time: frame as f64 / 30.0,
            velocity: 0.0,
            acceleration: 0.0,
            method: InitiationMethod::Acceleration,
        }
    }

    fn frames_with_speeds(speeds: &[(Joint, Vec<f64>)], len: usize) -> Vec<FrameRecord> {
        (0..len)
            .map(|i| {
                let mut landmarks = LandmarkMap::new();
                landmarks.insert(
                    "nose".into(),
                    shotform_pose_model::Landmark::from_normalized(0.5, 0.1, 100, 100),
                );
                let mut record = FrameRecord::from(PoseFrame {
                    frame_number: i as u64,
                    timestamp: i as f64 / 30.0,
                    landmarks: Some(landmarks),
                });
                for (joint, series) in speeds {
                    record.velocities.insert(joint.name().to_string(), series[i]);
                }
                record
            })
            .collect()
    }

    fn anchor_only(anchor: usize) -> KeyframeSet {
        KeyframeSet::new(
            vec![Keyframe {
                name: KeyframeName::BallLowest,
                index: anchor,
                frame_number: anchor as u64,
                timestamp: 0.0,
                description: String::new(),
            }],
            AnchorOutcome::Detected,
            vec![],
        )
    }

    #[test]
    fn test_pattern_ties_resolve_lower_hip_upper() {
        let inits = vec![
            init(Joint::RightKnee, 5),
            init(Joint::RightHip, 5),
            init(Joint::RightWrist, 20),
        ];
        let pattern = classify_pattern(&inits, 2);
        assert_eq!(pattern.pattern_type, PatternType::LowerHipUpper);
        assert_eq!(
            pattern.initiation_order,
            vec![BodyRegion::Lower, BodyRegion::Hip, BodyRegion::Upper]
        );
    }

    #[test]
    fn test_pattern_classification() {
        let hip_first = vec![
            init(Joint::RightAnkle, 8),
            init(Joint::RightHip, 3),
            init(Joint::RightElbow, 12),
        ];
        assert_eq!(classify_pattern(&hip_first, 2).pattern_type, PatternType::HipLowerUpper);

        let synced = vec![
            init(Joint::RightAnkle, 4),
            init(Joint::RightHip, 9),
            init(Joint::RightShoulder, 6),
        ];
        assert_eq!(classify_pattern(&synced, 2).pattern_type, PatternType::LowerSynchronized);

        let lower_first = vec![
            init(Joint::RightAnkle, 4),
            init(Joint::RightHip, 12),
            init(Joint::RightShoulder, 8),
        ];
        assert_eq!(classify_pattern(&lower_first, 2).pattern_type, PatternType::LowerFirst);

        let upper_first = vec![
            init(Joint::RightAnkle, 10),
            init(Joint::RightHip, 12),
            init(Joint::RightWrist, 2),
        ];
        assert_eq!(classify_pattern(&upper_first, 2).pattern_type, PatternType::UpperFirst);
    }

    #[test]
    fn test_pattern_incomplete_without_hip() {
        let inits = vec![init(Joint::RightKnee, 5), init(Joint::RightWrist, 20)];
        let pattern = classify_pattern(&inits, 2);
        assert_eq!(pattern.pattern_type, PatternType::IncompleteData);
        assert!(pattern.key_parts.is_none());
    }

    #[test]
    fn test_joint_pairs_leader_and_missing() {
        let inits = vec![
            init(Joint::RightWrist, 14),
            init(Joint::RightElbow, 10),
            init(Joint::RightShoulder, 10),
        ];
        let pairs = analyze_joint_pairs(&inits, FrameClock::new(30.0));

        let wrist_elbow = pairs[0].timing.as_ref().unwrap();
        assert_eq!(wrist_elbow.frame_diff, -4);
        assert_eq!(wrist_elbow.leader, PairLeader::Joint(Joint::RightElbow));

        let elbow_shoulder = pairs[1].timing.as_ref().unwrap();
        assert_eq!(elbow_shoulder.leader, PairLeader::Simultaneous);

        assert!(pairs[2].timing.is_none());
        let summary = summarize_pairs(&pairs);
        assert!(summary.contains("right_elbow moves first (4 frame gap)"));
        assert!(!summary.contains("right_hip"));
    }

    #[test]
    fn test_initiation_by_acceleration_and_fallback() {
        let frames = frames_with_speeds(
            &[
                (Joint::RightKnee, vec![0.0, 10.0, 80.0, 120.0, 60.0, 20.0]),
                (Joint::RightWrist, vec![0.0, 5.0, 15.0, 30.0, 40.0, 10.0]),
            ],
            6,
        );
        let result = analyze_force_sequence(
            &frames,
            &anchor_only(0),
            FrameClock::new(30.0),
            &ForceThresholds::default(),
        );

        let knee = result.initiation(Joint::RightKnee).unwrap();
        assert_eq!(knee.frame, 2);
        assert_eq!(knee.method, InitiationMethod::Acceleration);
        assert!((knee.acceleration - 70.0).abs() < 1e-9);

        let wrist = result.initiation(Joint::RightWrist).unwrap();
        assert_eq!(wrist.frame, 2);
        assert_eq!(wrist.method, InitiationMethod::PeakFraction);

        assert!(result.initiation(Joint::RightAnkle).is_none());
        assert_eq!(result.actual_sequence, vec![Joint::RightKnee, Joint::RightWrist]);
        assert_eq!(result.time_intervals.len(), 1);
        assert_eq!(result.time_intervals[0].frame_diff, 0);
    }

    #[test]
    fn test_range_starts_at_anchor() {
        let frames = frames_with_speeds(
            &[(Joint::RightKnee, vec![0.0, 100.0, 0.0, 0.0, 60.0, 120.0])],
            6,
        );
        let result = analyze_force_sequence(
            &frames,
            &anchor_only(2),
            FrameClock::new(30.0),
            &ForceThresholds::default(),
        );
        assert_eq!(result.analysis_range.start_frame, 2);
        assert_eq!(result.analysis_range.end_frame, 5);
        assert_eq!(result.initiation(Joint::RightKnee).unwrap().frame, 4);
        assert!((result.initiation(Joint::RightKnee).unwrap().time - 4.0 / 30.0).abs() < 1e-12);
    }
}
