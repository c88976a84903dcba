//! Error types shared across Shotform crates.

use std::path::PathBuf;

/// Top-level error type for Shotform operations.
///
/// `Display` carries the technical message meant for logs; [`user_message`]
/// carries the remediation-oriented text meant for whoever submitted the
/// capture.
///
/// [`user_message`]: ShotformError::user_message
#[derive(Debug, thiserror::Error)]
pub enum ShotformError {
    #[error("Insufficient frames: {detected} frames with a detected pose, {required} required")]
    InsufficientFrames { detected: usize, required: usize },

    #[error("Anchor not found: right wrist is never visible")]
    AnchorNotFound,

    #[error("Pose detection error: {message}")]
    PoseDetection { message: String },

    #[error("Keyframe detection error: {message}")]
    KeyframeDetection { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using ShotformError.
pub type ShotformResult<T> = Result<T, ShotformError>;

impl ShotformError {
    pub fn pose_detection(msg: impl Into<String>) -> Self {
        Self::PoseDetection {
            message: msg.into(),
        }
    }

    pub fn keyframe_detection(msg: impl Into<String>) -> Self {
        Self::KeyframeDetection {
            message: msg.into(),
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether this is one of the shot-analysis failure kinds, as opposed to
    /// a generic I/O, parse, or internal failure.
    pub fn is_domain_error(&self) -> bool {
        matches!(
            self,
            Self::InsufficientFrames { .. }
                | Self::AnchorNotFound
                | Self::PoseDetection { .. }
                | Self::KeyframeDetection { .. }
        )
    }

    /// Message suitable for showing to the person who recorded the shot.
    pub fn user_message(&self) -> String {
        match self {
            Self::InsufficientFrames { detected, .. } => format!(
                "Analysis failed: only {detected} frames contained a usable pose. \
                 Make sure the clip is at least 3 seconds long, shows the complete \
                 shooting motion, and is well lit and in focus."
            ),
            Self::AnchorNotFound => "Analysis failed: the shooting hand could not be tracked. \
                 Make sure the shooting arm stays in view for the whole motion."
                .to_string(),
            Self::PoseDetection { .. } => "Analysis failed: no body pose was detected. \
                 Make sure the shooter is clearly visible, not occluded, and the clip is well lit."
                .to_string(),
            Self::KeyframeDetection { .. } => {
                "Analysis failed: the key moments of the shot could not be identified. \
                 Make sure the clip contains the complete shot filmed from the side or at an angle."
                    .to_string()
            }
            Self::FileNotFound { path } => {
                format!("Analysis failed: {} does not exist.", path.display())
            }
            Self::Config { message } => format!("Analysis settings are invalid: {message}."),
            _ => "Analysis failed due to an internal error. Please try again.".to_string(),
        }
    }
}
