//! Keyframe detection.
//!
//! # Algorithm
//!
//! 1. **Anchor**: the frame where the visible right wrist is lowest
//!    (`ball_lowest`), searched over the full sequence.
//! 2. **Window**: every other stage only sees frames from the anchor on.
//! 3. **Stages**: run in dependency order; see [`stages::STAGES`].
//! 4. **Finalize**: indices are re-based to absolute positions, sorted and
//!    checked for ordering anomalies.

pub mod builder;
pub mod stages;

use shotform_common::{ShotformError, ShotformResult};
use shotform_pose_model::{AnchorOutcome, FrameRecord, Joint, KeyframeSet};

use crate::config::{AnalysisConfig, AnchorPolicy};
use crate::metrics::argmax_by;
use builder::KeyframeBuilder;
use stages::{StageContext, STAGES};

/// Detects the keyframes of one shot.
pub struct KeyframeDetector<'c> {
    config: &'c AnalysisConfig,
}

impl<'c> KeyframeDetector<'c> {
    pub fn new(config: &'c AnalysisConfig) -> Self {
        Self { config }
    }

    /// Frame with the lowest visible right wrist; the first one on ties.
    pub fn locate_anchor(&self, frames: &[FrameRecord]) -> Option<usize> {
        let min_visibility = self.config.min_wrist_visibility;
        argmax_by(frames.iter().enumerate().filter_map(|(i, frame)| {
            frame
                .landmark(Joint::RightWrist)
                .filter(|lm| lm.is_visible(min_visibility))
                .map(|lm| (i, lm.y))
        }))
    }

    /// Detect every keyframe the frames support.
    pub fn detect(&self, frames: &[FrameRecord]) -> ShotformResult<KeyframeSet> {
        if frames.is_empty() {
            return Err(ShotformError::keyframe_detection("no frames to analyze"));
        }

        let mut builder = match self.locate_anchor(frames) {
            Some(anchor) => {
                tracing::debug!(anchor, "Located ball_lowest");
                KeyframeBuilder::new(frames, anchor, AnchorOutcome::Detected, "Ball lowest point")
            }
            None => match self.config.anchor_policy {
                AnchorPolicy::Fail => return Err(ShotformError::AnchorNotFound),
                AnchorPolicy::Fallback => {
                    tracing::warn!("Right wrist never visible; using frame 0 as ball_lowest");
                    KeyframeBuilder::new(
                        frames,
                        0,
                        AnchorOutcome::Fallback,
                        "Default start (ball lowest point not detected)",
                    )
                }
            },
        };

        tracing::debug!(
            anchor = builder.anchor(),
            window = builder.window().len(),
            total = frames.len(),
            "Analysis window"
        );

        for stage in STAGES {
            if !stage.requires.iter().all(|name| builder.contains(*name)) {
                continue;
            }
            let start = stage
                .search_from
                .and_then(|name| builder.window_index(name))
                .unwrap_or(0);

            let detection = {
                let ctx = StageContext {
                    builder: &builder,
                    start,
                    thresholds: &self.config.keyframes,
                };
                (stage.detect)(&ctx)
            };

            if let Some(detection) = detection {
                tracing::debug!(
                    keyframe = %stage.name,
                    index = builder.anchor() + detection.index,
                    "Detected keyframe"
                );
                builder.insert(stage.name, detection.index, detection.description);
            }
        }

        Ok(builder.finalize())
    }
}
