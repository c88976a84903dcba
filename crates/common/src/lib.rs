//! Shotform Common Utilities
//!
//! Shared infrastructure for all Shotform crates:
//! - Error types and result aliases
//! - Frame clock for index/seconds conversion
//! - Best-effort progress reporting
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod progress;

pub use clock::*;
pub use config::*;
pub use error::*;
pub use progress::*;
