//! Analyze several captures concurrently.
//!
//! Every capture runs on Tokio's blocking pool with its own analyzer. Progress
//! flows through one `watch` channel per capture, so a slow terminal only ever
//! sees the latest update.

use std::path::PathBuf;

use shotform_common::config::AnalysisDefaults;
use shotform_common::ProgressUpdate;
use tokio::sync::watch;

use super::analyze::analyze_file;
use super::result_path;

struct Job {
    capture: PathBuf,
    output: PathBuf,
    handle: tokio::task::JoinHandle<anyhow::Result<usize>>,
    reporter: tokio::task::JoinHandle<()>,
}

fn spawn_job(
    capture: PathBuf,
    output: PathBuf,
    fps: Option<f64>,
    defaults: AnalysisDefaults,
) -> Job {
    let (tx, mut rx) = watch::channel(ProgressUpdate::new(0, "Queued"));
    let name = capture.display().to_string();

    let reporter = tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let update = rx.borrow_and_update().clone();
            tracing::debug!(capture = %name, percent = update.percent, "{}", update.message);
        }
    });

    let job_capture = capture.clone();
    let job_output = output.clone();
    let handle = tokio::task::spawn_blocking(move || {
        let sink = move |update: ProgressUpdate| {
            let _ = tx.send(update);
        };
        let result = analyze_file(&job_capture, &job_output, fps, &defaults, &sink)?;
        Ok(result.keyframes.len())
    });

    Job {
        capture,
        output,
        handle,
        reporter,
    }
}

pub async fn run(
    captures: Vec<PathBuf>,
    output_dir: PathBuf,
    fps: Option<f64>,
    defaults: AnalysisDefaults,
) -> anyhow::Result<()> {
    println!(
        "Analyzing {} capture(s) into: {}",
        captures.len(),
        output_dir.display()
    );

    let jobs: Vec<Job> = captures
        .into_iter()
        .map(|capture| {
            let output = result_path(&output_dir, &capture);
            spawn_job(capture, output, fps, defaults.clone())
        })
        .collect();

    let total = jobs.len();
    let mut failed = 0;
    for job in jobs {
        let outcome = job
            .handle
            .await
            .map_err(|e| anyhow::anyhow!("Analysis task failed: {e}"))
            .and_then(|r| r);
        let _ = job.reporter.await;

        match outcome {
            Ok(keyframes) => println!(
                "  OK   {} ({keyframes} keyframes) -> {}",
                job.capture.display(),
                job.output.display()
            ),
            Err(e) => {
                failed += 1;
                tracing::warn!(capture = %job.capture.display(), error = %e, "Capture failed");
                println!("  FAIL {}: {e}", job.capture.display());
            }
        }
    }

    println!("\n{} of {total} capture(s) analyzed.", total - failed);
    if failed > 0 {
        anyhow::bail!("{failed} capture(s) failed");
    }
    Ok(())
}
