//! The single metrics pass over a frame sequence.

use shotform_pose_model::{FrameRecord, Joint};

use crate::config::AnalysisConfig;
use crate::metrics;

/// Fill angles, center of mass, shooting arc, speeds and accelerations on
/// every frame.
///
/// Frames without a pose get no angles; their speed samples count as
/// missing.
pub fn annotate(frames: &mut [FrameRecord], fps: f64, config: &AnalysisConfig) {
    for frame in frames.iter_mut() {
        let Some(landmarks) = frame.landmarks.as_ref() else {
            continue;
        };

        for metric in &config.angles {
            let [a, b, c] = metric.joints();
            let value = metrics::angle(
                landmarks.get(a.name()),
                landmarks.get(b.name()),
                landmarks.get(c.name()),
            );
            if let Some(value) = value {
                frame.angles.insert(metric.key().to_string(), value);
            }
        }

        frame.center_of_mass = metrics::center_of_mass(landmarks);
        frame.shooting_arc = metrics::shooting_arc(
            landmarks.get(Joint::RightShoulder.name()),
            landmarks.get(Joint::RightElbow.name()),
            landmarks.get(Joint::RightWrist.name()),
        );
    }

    for &joint in &config.joints_of_interest {
        let speeds = {
            let positions: Vec<_> = frames.iter().map(|f| f.landmark(joint)).collect();
            metrics::velocity(&positions, fps, config.smoothing_window)
        };
        let accelerations = metrics::acceleration(&speeds, fps);

        for ((frame, speed), accel) in frames.iter_mut().zip(speeds).zip(accelerations) {
            frame.velocities.insert(joint.name().to_string(), speed);
            frame.accelerations.insert(joint.name().to_string(), accel);
        }
    }

    tracing::debug!(
        frames = frames.len(),
        joints = config.joints_of_interest.len(),
        "Annotated frame metrics"
    );
}
