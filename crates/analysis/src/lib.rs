//! Shotform Analysis
//!
//! Turns a pose sequence into a shot analysis:
//! - **Metrics:** joint angles, speeds, accelerations, center of mass
//! - **Keyframes:** 15 named instants anchored at the ball's lowest point
//! - **Force sequence:** which joints start moving first
//! - **Rhythm & energy transfer:** phase timing and lower-to-upper body peaks
//! - **Comparison:** keyframe-by-keyframe differences between two shots
//!
//! All algorithms are deterministic and operate on one run's frames only.

pub mod analyzer;
pub mod annotate;
pub mod comparison;
pub mod config;
pub mod energy;
pub mod force_sequence;
pub mod keyframe;
pub mod metrics;
pub mod rhythm;

pub use analyzer::ShotAnalyzer;
pub use comparison::{compare_results, ShotComparison};
pub use config::{AnalysisConfig, AnchorPolicy};
pub use keyframe::KeyframeDetector;
