//! Best-effort progress reporting.
//!
//! The analysis pipeline pushes `(percent, message)` updates to a sink and
//! never waits on whoever reads them. Sinks are overwrite-based: a consumer
//! only cares about the most recent update.

use serde::{Deserialize, Serialize};

/// A single progress notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Completion percentage in `[0, 100]`.
    pub percent: u8,
    /// Human-readable description of the current stage.
    pub message: String,
}

impl ProgressUpdate {
    pub fn new(percent: u8, message: impl Into<String>) -> Self {
        Self {
            percent: percent.min(100),
            message: message.into(),
        }
    }
}

/// Receiver of progress updates.
///
/// Implementations must not block; a slow or absent consumer must never
/// stall the pipeline.
pub trait ProgressSink: Send + Sync {
    fn report(&self, update: ProgressUpdate);
}

/// Sink that discards every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn report(&self, _update: ProgressUpdate) {}
}

impl<F> ProgressSink for F
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        self(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_percent_is_clamped() {
        assert_eq!(ProgressUpdate::new(250, "done").percent, 100);
    }

    #[test]
    fn test_closure_sink_keeps_last_update() {
        let latest = Mutex::new(None);
        let sink = |update: ProgressUpdate| {
            *latest.lock().unwrap() = Some(update);
        };
        sink.report(ProgressUpdate::new(10, "metrics"));
        sink.report(ProgressUpdate::new(40, "keyframes"));
        let last = latest.lock().unwrap().clone().unwrap();
        assert_eq!(last.percent, 40);
        assert_eq!(last.message, "keyframes");
    }
}
