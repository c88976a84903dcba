//! Capture files: the pose collaborator's per-frame output.
//!
//! A capture is JSONL: an optional header line `# {...}` followed by one
//! [`PoseFrame`] object per line. A `#` line before the first frame must be
//! a valid header; blank lines and later `#` lines are ignored.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::frame::PoseFrame;
use crate::landmark::Joint;

/// Metadata written on the first line of a capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureHeader {
    /// Schema version for forward compatibility.
    pub schema_version: String,

    /// Frame rate of the sampled frames.
    pub fps: f64,

    /// Source frame dimensions in pixels.
    pub frame_width: u32,
    pub frame_height: u32,

    /// Source video name, if known.
    #[serde(default)]
    pub source: Option<String>,
}

/// A parsed capture.
#[derive(Debug, Clone, PartialEq)]
pub struct Capture {
    pub header: Option<CaptureHeader>,
    pub frames: Vec<PoseFrame>,
}

impl Capture {
    /// Read and parse a capture file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ModelError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        parse_capture(&content)
    }

    /// Declared frame rate, if the header has a usable one.
    pub fn fps(&self) -> Option<f64> {
        self.header
            .as_ref()
            .map(|h| h.fps)
            .filter(|fps| fps.is_finite() && *fps > 0.0)
    }

    /// Number of frames with any landmarks.
    pub fn frames_with_pose(&self) -> usize {
        self.frames
            .iter()
            .filter(|f| f.landmarks.as_ref().is_some_and(|l| !l.is_empty()))
            .count()
    }

    /// Required joints that never appear in any frame.
    pub fn missing_joints(&self) -> Vec<Joint> {
        Joint::REQUIRED
            .into_iter()
            .filter(|joint| {
                !self.frames.iter().any(|f| {
                    f.landmarks
                        .as_ref()
                        .is_some_and(|l| l.contains_key(joint.name()))
                })
            })
            .collect()
    }

    /// Describe problems that would degrade an analysis.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = vec![];

        if self.header.is_none() {
            issues.push("Header line missing; frame rate must be supplied separately".to_string());
        } else if self.fps().is_none() {
            issues.push("Header frame rate is not a positive number".to_string());
        }

        if self.frames.is_empty() {
            issues.push("Capture contains no frames".to_string());
            return issues;
        }

        if self.frames_with_pose() == 0 {
            issues.push("No frame contains a detected pose".to_string());
        }

        for joint in self.missing_joints() {
            issues.push(format!("Required joint never detected: {joint}"));
        }

        let backwards = self
            .frames
            .windows(2)
            .filter(|w| w[1].timestamp < w[0].timestamp)
            .count();
        if backwards > 0 {
            issues.push(format!("{backwards} frame(s) have decreasing timestamps"));
        }

        issues
    }
}

/// Parse capture content.
pub fn parse_capture(content: &str) -> Result<Capture, ModelError> {
    let mut header = None;
    let mut frames = vec![];

    for (i, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(rest) = line.strip_prefix('#') {
            if header.is_none() && frames.is_empty() {
                let parsed = serde_json::from_str::<CaptureHeader>(rest.trim())
                    .map_err(|e| ModelError::LineError { line: i + 1, source: e })?;
                header = Some(parsed);
            }
            continue;
        }
        let frame = serde_json::from_str::<PoseFrame>(line)
            .map_err(|e| ModelError::LineError { line: i + 1, source: e })?;
        frames.push(frame);
    }

    Ok(Capture { header, frames })
}

/// Serialize a capture to JSONL.
pub fn serialize_capture(capture: &Capture) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    if let Some(header) = &capture.header {
        output.push_str("# ");
        output.push_str(&serde_json::to_string(header)?);
        output.push('\n');
    }
    for frame in &capture.frames {
        output.push_str(&serde_json::to_string(frame)?);
        output.push('\n');
    }
    Ok(output)
}
