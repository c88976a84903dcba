//! Shotform CLI: command-line interface for basketball shot analysis.
//!
//! Usage:
//!   shotform analyze <CAPTURE>       Analyze one pose capture
//!   shotform batch <CAPTURES>...     Analyze several captures concurrently
//!   shotform validate <CAPTURE>      Check a capture before analyzing it
//!   shotform info <RESULT>           Show an analysis result
//!   shotform compare <A> <B>         Compare two analysis results

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "shotform",
    about = "Keyframe and kinematics analysis of basketball jump shots",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit structured JSON logs
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a single pose capture
    Analyze {
        /// Path to the capture file (JSONL)
        capture: PathBuf,

        /// Output file for the analysis result
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Frame rate, when the capture header does not declare one
        #[arg(long)]
        fps: Option<f64>,

        /// Minimum number of frames with a detected pose
        #[arg(long)]
        min_frames: Option<usize>,

        /// Fail instead of falling back to frame 0 when the wrist is never visible
        #[arg(long)]
        strict_anchor: bool,

        /// Moving-average window for joint speeds
        #[arg(long)]
        smoothing_window: Option<usize>,
    },

    /// Analyze several captures concurrently
    Batch {
        /// Capture files (JSONL)
        #[arg(required = true)]
        captures: Vec<PathBuf>,

        /// Directory for the analysis results
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Frame rate for captures without a header
        #[arg(long)]
        fps: Option<f64>,
    },

    /// Validate a pose capture
    Validate {
        /// Path to the capture file (JSONL)
        capture: PathBuf,
    },

    /// Show an analysis result
    Info {
        /// Path to the analysis result (JSON)
        result: PathBuf,
    },

    /// Compare the keyframes of two analysis results
    Compare {
        /// First analysis result
        a: PathBuf,

        /// Second analysis result
        b: PathBuf,

        /// Label for the first shot
        #[arg(long, default_value = "A")]
        label_a: String,

        /// Label for the second shot
        #[arg(long, default_value = "B")]
        label_b: String,

        /// Write the comparison as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let app_config = shotform_common::config::AppConfig::load();

    // Initialize logging
    let level = if cli.verbose {
        "debug".to_string()
    } else {
        app_config.logging.level.clone()
    };
    shotform_common::logging::init_logging(&shotform_common::config::LoggingConfig {
        level,
        json: cli.json_logs || app_config.logging.json,
        file: app_config.logging.file.clone(),
    });

    match cli.command {
        Commands::Analyze {
            capture,
            output,
            fps,
            min_frames,
            strict_anchor,
            smoothing_window,
        } => {
            let mut defaults = app_config.analysis.clone();
            if let Some(min_frames) = min_frames {
                defaults.min_valid_frames = min_frames;
            }
            if let Some(window) = smoothing_window {
                defaults.smoothing_window = window;
            }
            defaults.strict_anchor |= strict_anchor;
            let output = output.unwrap_or_else(|| {
                commands::result_path(&app_config.output_dir, &capture)
            });
            commands::analyze::run(capture, output, fps, defaults)
        }
        Commands::Batch {
            captures,
            output_dir,
            fps,
        } => {
            let output_dir = output_dir.unwrap_or_else(|| app_config.output_dir.clone());
            commands::batch::run(captures, output_dir, fps, app_config.analysis.clone()).await
        }
        Commands::Validate { capture } => commands::validate::run(capture),
        Commands::Info { result } => commands::info::run(result),
        Commands::Compare {
            a,
            b,
            label_a,
            label_b,
            output,
        } => commands::compare::run(a, b, label_a, label_b, output),
    }
}
