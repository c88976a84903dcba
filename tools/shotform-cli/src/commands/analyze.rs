//! Analyze a single pose capture.

use std::io::Write;
use std::path::{Path, PathBuf};

use shotform_analysis::{AnalysisConfig, ShotAnalyzer};
use shotform_common::config::AnalysisDefaults;
use shotform_common::{ProgressSink, ProgressUpdate, ShotformError};
use shotform_pose_model::{AnalysisResult, AnchorOutcome, Capture};

use super::resolve_fps;

/// Load, analyze and save one capture. Shared with `batch`.
pub fn analyze_file(
    capture_path: &Path,
    output: &Path,
    cli_fps: Option<f64>,
    defaults: &AnalysisDefaults,
    progress: &dyn ProgressSink,
) -> anyhow::Result<AnalysisResult> {
    if !capture_path.exists() {
        return Err(failure(ShotformError::FileNotFound {
            path: capture_path.to_path_buf(),
        }));
    }
    let capture = Capture::load(capture_path)
        .map_err(|e| anyhow::anyhow!("Failed to load capture: {e}"))?;
    let fps = resolve_fps(&capture, cli_fps, defaults);
    tracing::debug!(
        capture = %capture_path.display(),
        frames = capture.frames.len(),
        fps,
        "Loaded capture"
    );

    let analyzer = ShotAnalyzer::new(AnalysisConfig::from_defaults(defaults));
    let result = analyzer
        .analyze(capture.frames, fps, progress)
        .map_err(failure)?;

    result
        .save(output)
        .map_err(|e| anyhow::anyhow!("Failed to save analysis: {e}"))?;
    Ok(result)
}

/// Wrap an analysis error so the user-facing message leads and the
/// technical cause stays in the chain.
fn failure(e: ShotformError) -> anyhow::Error {
    tracing::warn!(error = %e, domain = e.is_domain_error(), "Analysis failed");
    let message = e.user_message();
    anyhow::Error::new(e).context(message)
}

pub fn run(
    capture: PathBuf,
    output: PathBuf,
    fps: Option<f64>,
    defaults: AnalysisDefaults,
) -> anyhow::Result<()> {
    println!("Analyzing capture: {}", capture.display());

    let progress = |update: ProgressUpdate| {
        print!("\r  Progress: {:>3}% {:<40}", update.percent, update.message);
        let _ = std::io::stdout().flush();
    };
    let result = analyze_file(&capture, &output, fps, &defaults, &progress)?;
    println!();

    println!("  Frames: {} @ {}fps", result.frames.len(), result.fps);
    if result.keyframes.anchor_outcome() == AnchorOutcome::Fallback {
        println!("  Anchor: wrist never visible, using frame 0");
    }
    println!("  Keyframes: {}", result.keyframes.len());
    for kf in result.keyframes.iter() {
        println!(
            "    {:<20} frame {:>4}  {:>6.2}s  {}",
            kf.name.as_str(),
            kf.index,
            kf.timestamp,
            kf.description
        );
    }
    for warning in result.keyframes.warnings() {
        println!("  Warning: {warning}");
    }
    println!(
        "  Pattern: {}",
        result.force_sequence.pattern.pattern_type.description()
    );
    println!("  Result saved to: {}", output.display());
    println!("\nAnalysis complete.");

    Ok(())
}
