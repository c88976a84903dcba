//! Validate a pose capture.

use std::path::PathBuf;

use shotform_pose_model::Capture;

pub fn run(capture: PathBuf) -> anyhow::Result<()> {
    println!("Validating capture: {}", capture.display());

    let loaded = Capture::load(&capture)
        .map_err(|e| anyhow::anyhow!("Failed to load capture: {e}"))?;

    if let Some(header) = &loaded.header {
        println!("  Schema: {}", header.schema_version);
        println!(
            "  Resolution: {}x{} @ {}fps",
            header.frame_width, header.frame_height, header.fps
        );
        if let Some(source) = &header.source {
            println!("  Source: {source}");
        }
    }
    println!("  Frames: {}", loaded.frames.len());
    println!("  Frames with pose: {}", loaded.frames_with_pose());

    let issues = loaded.validate();
    if issues.is_empty() {
        println!("\nCapture is valid.");
    } else {
        println!("\nValidation issues:");
        for issue in &issues {
            println!("  - {issue}");
        }
        println!(
            "\n{} issue(s) found. Analysis may be degraded.",
            issues.len()
        );
    }

    Ok(())
}
