pub mod analyze;
pub mod batch;
pub mod compare;
pub mod info;
pub mod validate;

use std::path::{Path, PathBuf};

use shotform_common::config::AnalysisDefaults;
use shotform_pose_model::Capture;

/// Default result location for a capture: `<dir>/<stem>.analysis.json`.
pub fn result_path(dir: &Path, capture: &Path) -> PathBuf {
    let stem = capture
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "capture".to_string());
    dir.join(format!("{stem}.analysis.json"))
}

/// Frame rate from the capture header, then the command line, then the config.
pub fn resolve_fps(capture: &Capture, cli_fps: Option<f64>, defaults: &AnalysisDefaults) -> f64 {
    capture.fps().or(cli_fps).unwrap_or(defaults.default_fps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shotform_pose_model::CaptureHeader;

    #[test]
    fn test_result_path_uses_capture_stem() {
        let path = result_path(Path::new("/out"), Path::new("/shots/free-throw-01.jsonl"));
        assert_eq!(path, PathBuf::from("/out/free-throw-01.analysis.json"));
    }

    #[test]
    fn test_fps_prefers_header() {
        let defaults = AnalysisDefaults::default();
        let mut capture = Capture {
            header: None,
            frames: vec![],
        };
        assert_eq!(resolve_fps(&capture, None, &defaults), 30.0);
        assert_eq!(resolve_fps(&capture, Some(24.0), &defaults), 24.0);

        capture.header = Some(CaptureHeader {
            schema_version: "1.0".into(),
            fps: 60.0,
            frame_width: 1920,
            frame_height: 1080,
            source: None,
        });
        assert_eq!(resolve_fps(&capture, Some(24.0), &defaults), 60.0);
    }
}
