//! Timing between consecutive keyframes.

use shotform_common::FrameClock;
use shotform_pose_model::{KeyPhases, KeyframeName, KeyframeSet, PhaseDuration, RhythmAnalysis};

const CONSISTENCY_EPSILON: f64 = 1e-6;

/// Seconds from keyframe `from` to keyframe `to`, when both exist.
fn span(keyframes: &KeyframeSet, clock: FrameClock, from: KeyframeName, to: KeyframeName) -> Option<f64> {
    let gap = FrameClock::frame_gap(keyframes.index_of(from)?, keyframes.index_of(to)?);
    Some(clock.frames_to_secs(gap))
}

pub fn analyze_rhythm(keyframes: &KeyframeSet, clock: FrameClock) -> RhythmAnalysis {
    let ordered: Vec<_> = keyframes.iter().collect();
    if ordered.is_empty() {
        return RhythmAnalysis::default();
    }

    let phase_durations: Vec<PhaseDuration> = ordered
        .windows(2)
        .map(|w| {
            let frames = FrameClock::frame_gap(w[0].index, w[1].index);
            PhaseDuration {
                from: w[0].name,
                to: w[1].name,
                frames,
                seconds: clock.frames_to_secs(frames),
                from_frame: w[0].index,
                to_frame: w[1].index,
            }
        })
        .collect();

    let last_index = ordered[ordered.len() - 1].index;
    let total_duration = clock.frames_to_secs(FrameClock::frame_gap(ordered[0].index, last_index));
    let shooting_duration = keyframes
        .index_of(KeyframeName::BallLowest)
        .map(|anchor| clock.frames_to_secs(FrameClock::frame_gap(anchor, last_index)))
        .unwrap_or(0.0);

    let intervals: Vec<f64> = phase_durations.iter().map(|p| p.seconds).collect();
    let mean = if intervals.is_empty() {
        0.0
    } else {
        intervals.iter().sum::<f64>() / intervals.len() as f64
    };
    let rhythm_consistency = if intervals.len() > 1 {
        let variance = intervals.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / intervals.len() as f64;
        variance.sqrt() / (mean + CONSISTENCY_EPSILON)
    } else {
        0.0
    };

    let key_phases = KeyPhases {
        preparation: span(keyframes, clock, KeyframeName::BallLowest, KeyframeName::SquatDeepest),
        power_phase: span(keyframes, clock, KeyframeName::SquatDeepest, KeyframeName::Release),
        follow_through: span(keyframes, clock, KeyframeName::Release, KeyframeName::FollowThrough),
    };

    RhythmAnalysis {
        phase_count: phase_durations.len(),
        phase_durations,
        total_duration,
        shooting_duration,
        rhythm_consistency,
        key_phases,
        avg_phase_duration: mean,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shotform_pose_model::{AnchorOutcome, Keyframe};

    fn set(entries: &[(KeyframeName, usize)]) -> KeyframeSet {
        let keyframes = entries
            .iter()
            .map(|(name, index)| Keyframe {
                name: *name,
                index: *index,
                frame_number: *index as u64,
                timestamp: *index as f64 / 10.0,
                description: String::new(),
            })
            .collect();
        KeyframeSet::new(keyframes, AnchorOutcome::Detected, vec![])
    }

    #[test]
    fn test_phases_between_adjacent_keyframes() {
        let keyframes = set(&[
            (KeyframeName::BallLowest, 10),
            (KeyframeName::SquatDeepest, 15),
            (KeyframeName::Release, 25),
            (KeyframeName::FollowThrough, 30),
        ]);
        let rhythm = analyze_rhythm(&keyframes, FrameClock::new(10.0));

        assert_eq!(rhythm.phase_count, 3);
        assert_eq!(rhythm.phase_durations[1].name(), "squat_deepest_to_release");
        assert_eq!(rhythm.phase_durations[1].frames, 10);
        assert!((rhythm.total_duration - 2.0).abs() < 1e-9);
        assert!((rhythm.shooting_duration - 2.0).abs() < 1e-9);
        assert_eq!(rhythm.key_phases.preparation, Some(0.5));
        assert_eq!(rhythm.key_phases.power_phase, Some(1.0));
        assert_eq!(rhythm.key_phases.follow_through, Some(0.5));

        // Intervals 0.5, 1.0, 0.5: mean 2/3, population std sqrt(1/18).
        let expected = (1.0f64 / 18.0).sqrt() / (2.0 / 3.0 + 1e-6);
        assert!((rhythm.rhythm_consistency - expected).abs() < 1e-9);
    }

    #[test]
    fn test_single_phase_has_zero_consistency() {
        let keyframes = set(&[(KeyframeName::BallLowest, 0), (KeyframeName::Release, 6)]);
        let rhythm = analyze_rhythm(&keyframes, FrameClock::new(30.0));
        assert_eq!(rhythm.rhythm_consistency, 0.0);
        assert_eq!(rhythm.key_phases.power_phase, None);
        assert!((rhythm.avg_phase_duration - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_empty_set() {
        let rhythm = analyze_rhythm(&set(&[]), FrameClock::new(30.0));
        assert_eq!(rhythm, RhythmAnalysis::default());
    }
}
