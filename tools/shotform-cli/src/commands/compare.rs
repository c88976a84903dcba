//! Compare two analysis results.

use std::path::PathBuf;

use shotform_analysis::compare_results;
use shotform_pose_model::AnalysisResult;

pub fn run(
    a: PathBuf,
    b: PathBuf,
    label_a: String,
    label_b: String,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let first = AnalysisResult::load(&a)
        .map_err(|e| anyhow::anyhow!("Failed to load analysis {}: {e}", a.display()))?;
    let second = AnalysisResult::load(&b)
        .map_err(|e| anyhow::anyhow!("Failed to load analysis {}: {e}", b.display()))?;

    let comparison = compare_results(&first, &second, label_a, label_b);
    println!("{}", comparison.summary());

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&comparison)?;
        std::fs::write(&path, json)
            .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", path.display()))?;
        println!("\nComparison saved to: {}", path.display());
    }

    Ok(())
}
