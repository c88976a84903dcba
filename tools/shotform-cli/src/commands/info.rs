//! Show an analysis result.

use std::path::PathBuf;

use shotform_pose_model::{AnalysisResult, AnchorOutcome};

fn seconds(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |s| format!("{s:.2}s"))
}

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let result = AnalysisResult::load(&path)
        .map_err(|e| anyhow::anyhow!("Failed to load analysis: {e}"))?;

    println!("Analysis: {}", path.display());
    println!("  Analyzed: {}", result.analyzed_at);
    println!(
        "  Frames: {} @ {}fps ({} with pose)",
        result.frames.len(),
        result.fps,
        result.frames.iter().filter(|f| f.pose_detected).count()
    );
    println!(
        "  Window: frames {}..={}",
        result.window.start_frame, result.window.end_frame
    );
    println!();

    println!("Keyframes:");
    if result.keyframes.anchor_outcome() == AnchorOutcome::Fallback {
        println!("  (anchor fell back to frame 0)");
    }
    for kf in result.keyframes.iter() {
        println!(
            "  {:<22} frame {:>4}  {:>6.2}s",
            kf.name.label(),
            kf.index,
            kf.timestamp
        );
    }
    for warning in result.keyframes.warnings() {
        println!("  Warning: {warning}");
    }
    println!();

    let rhythm = &result.rhythm;
    println!("Rhythm:");
    println!("  Phases: {}", rhythm.phase_count);
    println!("  Total: {:.2}s", rhythm.total_duration);
    println!("  Shooting: {:.2}s", rhythm.shooting_duration);
    println!("  Consistency: {:.3}", rhythm.rhythm_consistency);
    println!(
        "  Preparation / power / follow-through: {} / {} / {}",
        seconds(rhythm.key_phases.preparation),
        seconds(rhythm.key_phases.power_phase),
        seconds(rhythm.key_phases.follow_through)
    );
    println!();

    let force = &result.force_sequence;
    println!("Force sequence:");
    println!("  Pattern: {}", force.pattern.pattern_type.description());
    let order: Vec<&str> = force.actual_sequence.iter().map(|j| j.name()).collect();
    println!("  Initiation order: {}", order.join(" -> "));
    for line in force.pairs_summary.lines() {
        println!("  {line}");
    }
    println!();

    let energy = &result.energy_transfer;
    println!("Energy transfer:");
    println!("  Timing: {:?}", energy.transfer_timing);
    println!(
        "  Peaks: lower {:.1} px/s @ {}, upper {:.1} px/s @ {}",
        energy.lower_body_peak_velocity,
        energy.lower_peak_frame,
        energy.upper_body_peak_velocity,
        energy.upper_peak_frame
    );
    println!("  Ratio: {:.2}", energy.velocity_ratio);

    Ok(())
}
