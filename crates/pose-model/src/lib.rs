//! Shotform Pose Model
//!
//! Defines the core data contracts for shot analysis:
//! - **Landmarks:** Named joints with normalized and pixel coordinates
//! - **Frames:** Per-frame pose input and its derived kinematics
//! - **Keyframes:** The named critical instants of a shooting motion
//! - **Results:** Rhythm, force-sequence, and energy-transfer analyses
//!
//! Normalized coordinates are in `[0.0, 1.0]` relative to the source frame,
//! with y growing downward.

pub mod analysis;
pub mod capture;
pub mod error;
pub mod frame;
pub mod keyframe;
pub mod landmark;
pub mod result;

pub use analysis::*;
pub use capture::*;
pub use error::*;
pub use frame::*;
pub use keyframe::*;
pub use landmark::*;
pub use result::*;
