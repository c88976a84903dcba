//! Frame timing utilities.
//!
//! Shot captures are sampled at a fixed frame rate. Every analysis stage
//! works in frame indices; this module converts between frame indices,
//! frame gaps, and seconds.

/// Converts between frame indices and seconds for a fixed frame rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    fps: f64,
}

impl FrameClock {
    /// Create a clock for the given frame rate.
    pub fn new(fps: f64) -> Self {
        Self { fps }
    }

    /// Frames per second.
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Whether the frame rate is positive and finite.
    pub fn is_valid(&self) -> bool {
        self.fps.is_finite() && self.fps > 0.0
    }

    /// Seconds represented by a (possibly negative) gap of frames.
    ///
    /// Returns 0.0 for a clock without a usable frame rate.
    pub fn frames_to_secs(&self, frames: i64) -> f64 {
        if !self.is_valid() {
            return 0.0;
        }
        frames as f64 / self.fps
    }

    /// Seconds at which frame `index` starts, relative to frame 0.
    pub fn index_to_secs(&self, index: usize) -> f64 {
        self.frames_to_secs(index as i64)
    }

    /// Signed frame gap `to - from`.
    pub fn frame_gap(from: usize, to: usize) -> i64 {
        to as i64 - from as i64
    }
}
