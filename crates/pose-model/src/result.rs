//! The aggregate analysis result and its on-disk form.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::{EnergyTransferAnalysis, ForceSequenceAnalysis, RhythmAnalysis};
use crate::error::ModelError;
use crate::frame::FrameRecord;
use crate::keyframe::{KeyframeName, KeyframeSet};

/// Frame range from the anchor to the release (or the last frame).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisWindow {
    pub start_frame: usize,
    pub end_frame: usize,
}

impl AnalysisWindow {
    /// Number of frames in the window (inclusive bounds).
    pub fn len(&self) -> usize {
        self.end_frame.saturating_sub(self.start_frame) + 1
    }

    pub fn is_empty(&self) -> bool {
        self.end_frame < self.start_frame
    }
}

/// Everything one analysis run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub frames: Vec<FrameRecord>,
    pub keyframes: KeyframeSet,
    pub rhythm: RhythmAnalysis,
    pub force_sequence: ForceSequenceAnalysis,
    pub energy_transfer: EnergyTransferAnalysis,
    pub fps: f64,
    pub window: AnalysisWindow,
    /// Completion time (RFC 3339).
    pub analyzed_at: String,
}

impl AnalysisResult {
    /// Assemble a result stamped with the current time.
    pub fn new(
        frames: Vec<FrameRecord>,
        keyframes: KeyframeSet,
        rhythm: RhythmAnalysis,
        force_sequence: ForceSequenceAnalysis,
        energy_transfer: EnergyTransferAnalysis,
        fps: f64,
        window: AnalysisWindow,
    ) -> Self {
        Self {
            frames,
            keyframes,
            rhythm,
            force_sequence,
            energy_transfer,
            fps,
            window,
            analyzed_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// The frame a keyframe points at.
    pub fn frame_for(&self, name: KeyframeName) -> Option<&FrameRecord> {
        let index = self.keyframes.index_of(name)?;
        self.frames.get(index)
    }

    /// Load a result previously written with [`AnalysisResult::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| ModelError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&json).map_err(|e| ModelError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Write the result as pretty-printed JSON, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ModelError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ModelError::IoError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| ModelError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
        std::fs::write(path, json).map_err(|e| ModelError::IoError {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_len_is_inclusive() {
        let window = AnalysisWindow {
            start_frame: 4,
            end_frame: 10,
        };
        assert_eq!(window.len(), 7);
        assert!(!window.is_empty());
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let path = std::env::temp_dir().join("shotform_missing_result.json");
        let _ = std::fs::remove_file(&path);
        let err = AnalysisResult::load(&path).unwrap_err();
        assert!(err.to_string().contains("shotform_missing_result.json"));
    }
}
