//! End-to-end analysis of one shot.

use shotform_common::{FrameClock, ProgressSink, ProgressUpdate, ShotformError, ShotformResult};
use shotform_pose_model::{AnalysisResult, AnalysisWindow, FrameRecord, KeyframeName, PoseFrame};

use crate::annotate::annotate;
use crate::config::AnalysisConfig;
use crate::energy::analyze_energy_transfer;
use crate::force_sequence::analyze_force_sequence;
use crate::keyframe::KeyframeDetector;
use crate::rhythm::analyze_rhythm;

/// Runs every stage of the analysis in sequence.
pub struct ShotAnalyzer {
    config: AnalysisConfig,
}

impl ShotAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(AnalysisConfig::default())
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze a pose sequence sampled at `fps`.
    ///
    /// Any error aborts the run; no partial result is returned.
    pub fn analyze(
        &self,
        pose_frames: Vec<PoseFrame>,
        fps: f64,
        progress: &dyn ProgressSink,
    ) -> ShotformResult<AnalysisResult> {
        self.config.validate()?;
        let clock = FrameClock::new(fps);
        if !clock.is_valid() {
            return Err(ShotformError::invalid_input(format!(
                "frame rate must be positive, got {fps}"
            )));
        }

        progress.report(ProgressUpdate::new(5, "Checking pose frames"));
        let mut frames: Vec<FrameRecord> = pose_frames.into_iter().map(FrameRecord::from).collect();
        let detected = frames.iter().filter(|f| f.pose_detected).count();
        if detected == 0 && !frames.is_empty() {
            return Err(ShotformError::pose_detection(format!(
                "none of {} frames contains a pose",
                frames.len()
            )));
        }
        if detected < self.config.min_valid_frames {
            return Err(ShotformError::InsufficientFrames {
                detected,
                required: self.config.min_valid_frames,
            });
        }
        tracing::info!(frames = frames.len(), detected, fps, "Starting shot analysis");

        progress.report(ProgressUpdate::new(20, "Computing joint kinematics"));
        annotate(&mut frames, fps, &self.config);

        progress.report(ProgressUpdate::new(45, "Detecting keyframes"));
        let keyframes = KeyframeDetector::new(&self.config).detect(&frames)?;

        progress.report(ProgressUpdate::new(65, "Analyzing rhythm"));
        let rhythm = analyze_rhythm(&keyframes, clock);

        progress.report(ProgressUpdate::new(75, "Analyzing force sequence"));
        let force_sequence = analyze_force_sequence(&frames, &keyframes, clock, &self.config.force);

        progress.report(ProgressUpdate::new(85, "Analyzing energy transfer"));
        let energy_transfer = analyze_energy_transfer(&frames, &keyframes, &self.config.energy);

        let window = AnalysisWindow {
            start_frame: keyframes.index_of(KeyframeName::BallLowest).unwrap_or(0),
            end_frame: keyframes
                .index_of(KeyframeName::Release)
                .unwrap_or(frames.len().saturating_sub(1)),
        };

        tracing::info!(
            keyframes = keyframes.len(),
            warnings = keyframes.warnings().len(),
            window_start = window.start_frame,
            window_end = window.end_frame,
            "Shot analysis complete"
        );
        progress.report(ProgressUpdate::new(100, "Analysis complete"));

        Ok(AnalysisResult::new(
            frames,
            keyframes,
            rhythm,
            force_sequence,
            energy_transfer,
            fps,
            window,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shotform_common::NoopProgress;
    use std::sync::Mutex;

    fn empty_frames(count: usize) -> Vec<PoseFrame> {
        (0..count)
            .map(|i| PoseFrame {
                frame_number: i as u64,
                timestamp: i as f64 / 30.0,
                landmarks: None,
            })
            .collect()
    }

    #[test]
    fn test_rejects_non_positive_fps() {
        let err = ShotAnalyzer::with_defaults()
            .analyze(empty_frames(20), 0.0, &NoopProgress)
            .unwrap_err();
        assert!(matches!(err, ShotformError::InvalidInput { .. }));
    }

    #[test]
    fn test_no_pose_at_all_is_a_pose_detection_error() {
        let updates = Mutex::new(Vec::new());
        let sink = |update: ProgressUpdate| updates.lock().unwrap().push(update.percent);
        let err = ShotAnalyzer::with_defaults()
            .analyze(empty_frames(40), 30.0, &sink)
            .unwrap_err();

        assert!(matches!(err, ShotformError::PoseDetection { .. }));
        assert!(err.is_domain_error());
        assert_eq!(*updates.lock().unwrap(), vec![5]);
    }

    #[test]
    fn test_empty_sequence_is_insufficient() {
        let err = ShotAnalyzer::with_defaults()
            .analyze(vec![], 30.0, &NoopProgress)
            .unwrap_err();
        assert!(matches!(
            err,
            ShotformError::InsufficientFrames {
                detected: 0,
                required: 10
            }
        ));
    }

    #[test]
    fn test_invalid_config_is_rejected_before_running() {
        let mut config = AnalysisConfig::default();
        config.min_wrist_visibility = -0.1;
        let err = ShotAnalyzer::new(config)
            .analyze(empty_frames(20), 30.0, &NoopProgress)
            .unwrap_err();
        assert!(matches!(err, ShotformError::Config { .. }));
    }
}
