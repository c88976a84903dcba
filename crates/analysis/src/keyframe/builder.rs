//! Accumulates detections in window-relative indices and produces the
//! immutable [`KeyframeSet`].

use shotform_pose_model::{AnchorOutcome, FrameRecord, Keyframe, KeyframeName, KeyframeSet, OrderWarning};

/// Pairs `(a, b)` where `a` is expected no later than `b`.
const EXPECTED_ORDER: [(KeyframeName, KeyframeName); 4] = [
    (KeyframeName::BallLowest, KeyframeName::LiftStart),
    (KeyframeName::Release, KeyframeName::FollowThrough),
    (KeyframeName::LegPowerStart, KeyframeName::Release),
    (KeyframeName::BallAtChest, KeyframeName::BallAtShoulder),
];

/// Absolute index of a window-relative index.
pub fn rebase(window_index: usize, anchor: usize) -> usize {
    anchor + window_index
}

/// Window-relative index of an absolute index, if it lies in the window.
pub fn to_window(index: usize, anchor: usize) -> Option<usize> {
    index.checked_sub(anchor)
}

#[derive(Debug, Clone)]
struct Entry {
    name: KeyframeName,
    window_index: usize,
    description: String,
}

/// Mutable state of one detection run.
///
/// The anchor is always the first entry at window index 0. `finalize`
/// consumes the builder, so a set is produced exactly once.
#[derive(Debug)]
pub struct KeyframeBuilder<'a> {
    frames: &'a [FrameRecord],
    anchor: usize,
    outcome: AnchorOutcome,
    entries: Vec<Entry>,
}

impl<'a> KeyframeBuilder<'a> {
    /// Start a run anchored at `anchor`, which must be a valid frame index.
    pub fn new(
        frames: &'a [FrameRecord],
        anchor: usize,
        outcome: AnchorOutcome,
        description: impl Into<String>,
    ) -> Self {
        Self {
            frames,
            anchor,
            outcome,
            entries: vec![Entry {
                name: KeyframeName::BallLowest,
                window_index: 0,
                description: description.into(),
            }],
        }
    }

    /// Frames from the anchor to the end of the sequence.
    pub fn window(&self) -> &'a [FrameRecord] {
        self.frames.get(self.anchor..).unwrap_or(&[])
    }

    pub fn anchor(&self) -> usize {
        self.anchor
    }

    /// Record a detection. A second detection under the same name replaces
    /// the first.
    pub fn insert(&mut self, name: KeyframeName, window_index: usize, description: impl Into<String>) {
        let description = description.into();
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => {
                entry.window_index = window_index;
                entry.description = description;
            }
            None => self.entries.push(Entry {
                name,
                window_index,
                description,
            }),
        }
    }

    /// Window-relative index of a detected keyframe.
    pub fn window_index(&self, name: KeyframeName) -> Option<usize> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.window_index)
    }

    pub fn contains(&self, name: KeyframeName) -> bool {
        self.window_index(name).is_some()
    }

    /// Re-base, sort, and validate.
    pub fn finalize(self) -> KeyframeSet {
        let keyframes: Vec<Keyframe> = self
            .entries
            .into_iter()
            .filter_map(|entry| {
                let index = rebase(entry.window_index, self.anchor);
                let frame = self.frames.get(index)?;
                Some(Keyframe {
                    name: entry.name,
                    index,
                    frame_number: frame.frame_number,
                    timestamp: frame.timestamp,
                    description: entry.description,
                })
            })
            .collect();

        let warnings = validate_order(&keyframes, self.anchor);
        for warning in &warnings {
            tracing::warn!(%warning, "Keyframe order anomaly");
        }

        KeyframeSet::new(keyframes, self.outcome, warnings)
    }
}

/// Flag ordering anomalies without changing anything.
pub fn validate_order(keyframes: &[Keyframe], anchor: usize) -> Vec<OrderWarning> {
    let index_of = |name: KeyframeName| keyframes.iter().find(|kf| kf.name == name).map(|kf| kf.index);

    let mut warnings: Vec<OrderWarning> = keyframes
        .iter()
        .filter(|kf| kf.name != KeyframeName::BallLowest && kf.index < anchor)
        .map(|kf| OrderWarning::BeforeAnchor {
            name: kf.name,
            index: kf.index,
            anchor,
        })
        .collect();

    for (earlier, later) in EXPECTED_ORDER {
        if let (Some(earlier_index), Some(later_index)) = (index_of(earlier), index_of(later)) {
            if earlier_index > later_index {
                warnings.push(OrderWarning::OutOfOrder {
                    earlier,
                    earlier_index,
                    later,
                    later_index,
                });
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use shotform_pose_model::PoseFrame;

    fn frames(count: usize) -> Vec<FrameRecord> {
        (0..count)
            .map(|i| {
                FrameRecord::from(PoseFrame {
                    frame_number: i as u64 * 2,
                    timestamp: i as f64 / 30.0,
                    landmarks: None,
                })
            })
            .collect()
    }

    fn keyframe(name: KeyframeName, index: usize) -> Keyframe {
        Keyframe {
            name,
            index,
            frame_number: index as u64,
            timestamp: 0.0,
            description: String::new(),
        }
    }

    #[test]
    fn test_finalize_rebases_and_sorts() {
        let frames = frames(20);
        let mut builder = KeyframeBuilder::new(&frames, 5, AnchorOutcome::Detected, "lowest");
        builder.insert(KeyframeName::Release, 9, "release");
        builder.insert(KeyframeName::LiftStart, 0, "lift");
        builder.insert(KeyframeName::SquatDeepest, 3, "squat");
        assert_eq!(builder.window().len(), 15);

        let set = builder.finalize();
        let order: Vec<_> = set.iter().map(|kf| (kf.name, kf.index)).collect();
        assert_eq!(
            order,
            vec![
                (KeyframeName::BallLowest, 5),
                (KeyframeName::LiftStart, 5),
                (KeyframeName::SquatDeepest, 8),
                (KeyframeName::Release, 14),
            ]
        );
        assert_eq!(set.get(KeyframeName::Release).unwrap().frame_number, 28);
        assert!(set.warnings().is_empty());
    }

    #[test]
    fn test_insert_replaces_existing_entry() {
        let frames = frames(10);
        let mut builder = KeyframeBuilder::new(&frames, 0, AnchorOutcome::Fallback, "lowest");
        builder.insert(KeyframeName::Release, 4, "first");
        builder.insert(KeyframeName::Release, 6, "second");
        assert_eq!(builder.window_index(KeyframeName::Release), Some(6));

        let set = builder.finalize();
        assert_eq!(set.len(), 2);
        assert_eq!(set.anchor_outcome(), AnchorOutcome::Fallback);
    }

    #[test]
    fn test_validate_flags_out_of_order_pairs() {
        let keyframes = vec![
            keyframe(KeyframeName::BallLowest, 10),
            keyframe(KeyframeName::LiftStart, 8),
            keyframe(KeyframeName::FollowThrough, 20),
            keyframe(KeyframeName::Release, 25),
            keyframe(KeyframeName::BallAtChest, 15),
            keyframe(KeyframeName::BallAtShoulder, 14),
        ];
        let warnings = validate_order(&keyframes, 10);

        assert!(warnings.contains(&OrderWarning::BeforeAnchor {
            name: KeyframeName::LiftStart,
            index: 8,
            anchor: 10,
        }));
        assert!(warnings.contains(&OrderWarning::OutOfOrder {
            earlier: KeyframeName::Release,
            earlier_index: 25,
            later: KeyframeName::FollowThrough,
            later_index: 20,
        }));
        assert!(warnings.contains(&OrderWarning::OutOfOrder {
            earlier: KeyframeName::BallAtChest,
            earlier_index: 15,
            later: KeyframeName::BallAtShoulder,
            later_index: 14,
        }));
        assert_eq!(warnings.len(), 4);
    }

    proptest! {
        #[test]
        fn prop_rebase_round_trip(window_index in 0usize..100_000, anchor in 0usize..100_000) {
            let absolute = rebase(window_index, anchor);
            prop_assert!(absolute >= anchor);
            prop_assert_eq!(to_window(absolute, anchor), Some(window_index));
        }
    }
}
