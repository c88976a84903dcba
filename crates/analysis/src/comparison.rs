//! Side-by-side comparison of two analyzed shots.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use shotform_pose_model::{AnalysisResult, KeyframeName};

/// Difference of one angle between the two shots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngleDiff {
    pub value1: f64,
    pub value2: f64,
    /// `value2 - value1`.
    pub difference: f64,
    /// Difference relative to `value1`, in percent; 0 when `value1` is 0.
    pub percentage: f64,
}

/// A keyframe present in both shots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyframeDiff {
    pub name: KeyframeName,
    pub timestamp1: f64,
    pub timestamp2: f64,
    /// `timestamp2 - timestamp1`.
    pub time_difference: f64,
    /// Angles measured on both source frames.
    pub angle_differences: BTreeMap<String, AngleDiff>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotComparison {
    pub label1: String,
    pub label2: String,
    pub total_keyframes_1: usize,
    pub total_keyframes_2: usize,
    pub common_keyframes: Vec<KeyframeName>,
    pub only_in_1: Vec<KeyframeName>,
    pub only_in_2: Vec<KeyframeName>,
    pub keyframes: Vec<KeyframeDiff>,
}

fn angle_diff(value1: f64, value2: f64) -> AngleDiff {
    let difference = value2 - value1;
    AngleDiff {
        value1,
        value2,
        difference,
        percentage: if value1 != 0.0 {
            difference / value1 * 100.0
        } else {
            0.0
        },
    }
}

/// Compare the keyframes of two results.
pub fn compare_results(
    first: &AnalysisResult,
    second: &AnalysisResult,
    label1: impl Into<String>,
    label2: impl Into<String>,
) -> ShotComparison {
    let in_first = |name| first.keyframes.contains(name);
    let in_second = |name| second.keyframes.contains(name);

    let common_keyframes: Vec<_> = KeyframeName::ALL
        .into_iter()
        .filter(|&n| in_first(n) && in_second(n))
        .collect();
    let only_in_1 = KeyframeName::ALL
        .into_iter()
        .filter(|&n| in_first(n) && !in_second(n))
        .collect();
    let only_in_2 = KeyframeName::ALL
        .into_iter()
        .filter(|&n| !in_first(n) && in_second(n))
        .collect();

    let keyframes = common_keyframes
        .iter()
        .filter_map(|&name| {
            let kf1 = first.keyframes.get(name)?;
            let kf2 = second.keyframes.get(name)?;

            let angle_differences = match (first.frame_for(name), second.frame_for(name)) {
                (Some(f1), Some(f2)) => f1
                    .angles
                    .iter()
                    .filter_map(|(key, v1)| {
                        f2.angles.get(key).map(|v2| (key.clone(), angle_diff(*v1, *v2)))
                    })
                    .collect(),
                _ => BTreeMap::new(),
            };

            Some(KeyframeDiff {
                name,
                timestamp1: kf1.timestamp,
                timestamp2: kf2.timestamp,
                time_difference: kf2.timestamp - kf1.timestamp,
                angle_differences,
            })
        })
        .collect();

    ShotComparison {
        label1: label1.into(),
        label2: label2.into(),
        total_keyframes_1: first.keyframes.len(),
        total_keyframes_2: second.keyframes.len(),
        common_keyframes,
        only_in_1,
        only_in_2,
        keyframes,
    }
}

fn join_names(names: &[KeyframeName]) -> String {
    names.iter().map(|n| n.as_str()).collect::<Vec<_>>().join(", ")
}

impl ShotComparison {
    /// Plain-text report.
    pub fn summary(&self) -> String {
        let rule = "-".repeat(70);
        let mut out = format!(
            "Keyframe comparison\n{}\nShot A: {}\nShot B: {}\n{rule}\n\
             Keyframes: {} vs {}\nCommon keyframes: {}\n",
            "=".repeat(70),
            self.label1,
            self.label2,
            self.total_keyframes_1,
            self.total_keyframes_2,
            self.common_keyframes.len(),
        );
        if !self.only_in_1.is_empty() {
            out.push_str(&format!("Only in shot A: {}\n", join_names(&self.only_in_1)));
        }
        if !self.only_in_2.is_empty() {
            out.push_str(&format!("Only in shot B: {}\n", join_names(&self.only_in_2)));
        }
        out.push_str(&rule);
        out.push_str("\nKey differences:");

        for kf in &self.keyframes {
            out.push_str(&format!("\n\n  {}:", kf.name.label()));
            for (angle, diff) in &kf.angle_differences {
                out.push_str(&format!(
                    "\n    {angle}: {:+.1}° ({:.1}° -> {:.1}°)",
                    diff.difference, diff.value1, diff.value2
                ));
            }
            out.push_str(&format!("\n    time: {:+.2}s", kf.time_difference));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shotform_pose_model::{
        AnalysisRange, AnalysisWindow, AnchorOutcome, EnergyTransferAnalysis, ForceSequenceAnalysis,
        FrameRecord, Keyframe, KeyframeSet, MovementPattern, PoseFrame, RhythmAnalysis, TransferTiming,
    };

    fn result(entries: &[(KeyframeName, usize, f64)]) -> AnalysisResult {
        let mut frames: Vec<FrameRecord> = (0..10)
            .map(|i| {
                FrameRecord::from(PoseFrame {
                    frame_number: i,
                    timestamp: i as f64 / 10.0,
                    landmarks: None,
                })
            })
            .collect();
        let keyframes = entries
            .iter()
            .map(|(name, index, elbow)| {
                frames[*index].angles.insert("elbow_angle".into(), *elbow);
                Keyframe {
                    name: *name,
                    index: *index,
                    frame_number: *index as u64,
                    timestamp: *index as f64 / 10.0,
                    description: String::new(),
                }
            })
            .collect();
        let range = AnalysisRange {
            start_frame: 0,
            end_frame: 9,
            start_keyframe: None,
        };
        AnalysisResult::new(
            frames,
            KeyframeSet::new(keyframes, AnchorOutcome::Detected, vec![]),
            RhythmAnalysis::default(),
            ForceSequenceAnalysis {
                initiations: vec![],
                actual_sequence: vec![],
                time_intervals: vec![],
                joint_pairs: vec![],
                pairs_summary: String::new(),
                pattern: MovementPattern::incomplete(),
                movement_threshold: 20.0,
                acceleration_threshold: 50.0,
                monitored_joints: vec![],
                analysis_range: range,
            },
            EnergyTransferAnalysis {
                lower_body_peak_velocity: 0.0,
                upper_body_peak_velocity: 0.0,
                velocity_ratio: 0.0,
                transfer_timing: TransferTiming::Unknown,
                lower_peak_frame: 0,
                upper_peak_frame: 0,
                timing_difference: 0,
                lower_body_joints: vec![],
                upper_body_joints: vec![],
                analysis_range: range,
            },
            10.0,
            AnalysisWindow {
                start_frame: 0,
                end_frame: 9,
            },
        )
    }

    #[test]
    fn test_compare_common_and_exclusive_keyframes() {
        let a = result(&[
            (KeyframeName::BallLowest, 0, 100.0),
            (KeyframeName::Release, 6, 160.0),
            (KeyframeName::WristSnap, 7, 150.0),
        ]);
        let b = result(&[
            (KeyframeName::BallLowest, 1, 90.0),
            (KeyframeName::Release, 8, 168.0),
            (KeyframeName::FollowThrough, 9, 175.0),
        ]);

        let cmp = compare_results(&a, &b, "morning", "evening");
        assert_eq!(
            cmp.common_keyframes,
            vec![KeyframeName::BallLowest, KeyframeName::Release]
        );
        assert_eq!(cmp.only_in_1, vec![KeyframeName::WristSnap]);
        assert_eq!(cmp.only_in_2, vec![KeyframeName::FollowThrough]);

        let release = &cmp.keyframes[1];
        assert!((release.time_difference - 0.2).abs() < 1e-9);
        let elbow = &release.angle_differences["elbow_angle"];
        assert!((elbow.difference - 8.0).abs() < 1e-9);
        assert!((elbow.percentage - 5.0).abs() < 1e-9);

        let text = cmp.summary();
        assert!(text.starts_with("Keyframe comparison\n====="));
        assert!(text.contains("Shot A: morning"));
        assert!(text.contains("Common keyframes: "));
        assert!(text.contains("Only in shot A: wrist_snap"));
        assert!(text.contains("elbow_angle: +8.0°"));
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn test_zero_baseline_angle_has_zero_percentage() {
        assert_eq!(angle_diff(0.0, 12.0).percentage, 0.0);
    }
}
