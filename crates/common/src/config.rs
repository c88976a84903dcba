//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory where analysis results are written.
    pub output_dir: PathBuf,

    /// Default analysis settings.
    #[serde(default)]
    pub analysis: AnalysisDefaults,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Default analysis parameters exposed to users.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisDefaults {
    /// Minimum number of frames with a detected pose for a run to proceed.
    pub min_valid_frames: usize,

    /// Moving-average window applied to joint velocities.
    pub smoothing_window: usize,

    /// Minimum wrist visibility score for the anchor search. Stricter than a
    /// presence check; 0 accepts any wrist landmark that exists.
    pub min_wrist_visibility: f64,

    /// Fail the run instead of falling back to frame 0 when no anchor is found.
    pub strict_anchor: bool,

    /// Frame rate assumed when a capture does not declare one.
    pub default_fps: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "shotform_analysis=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: dirs_default_output(),
            analysis: AnalysisDefaults::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for AnalysisDefaults {
    fn default() -> Self {
        Self {
            min_valid_frames: 10,
            smoothing_window: 3,
            min_wrist_visibility: 0.5,
            strict_anchor: false,
            default_fps: 30.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("shotform").join("config.json")
}

/// Default output directory.
fn dirs_default_output() -> PathBuf {
    let base = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".local").join("share")
        });
    base.join("shotform").join("analyses")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let raw = r#"{ "output_dir": "/tmp/shots", "analysis": { "min_valid_frames": 4 } }"#;
        let config: AppConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.analysis.min_valid_frames, 4);
        assert_eq!(config.analysis.smoothing_window, 3);
        assert!(!config.analysis.strict_anchor);
        assert_eq!(config.logging.level, "info");
    }
}
