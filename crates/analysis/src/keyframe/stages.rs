//! Stage descriptors and the per-keyframe detectors.
//!
//! Every detector sees the window (frames from the anchor on) and returns a
//! window-relative index. Stages run in declaration order, so a stage can
//! depend on anything declared above it.

use shotform_pose_model::{FrameRecord, Joint, JointAngle, KeyframeName};

use super::builder::KeyframeBuilder;
use crate::config::KeyframeThresholds;
use crate::metrics::{argmax_by, argmin_by};

/// Wrist height used when the wrist is missing (bottom of the frame).
const MISSING_HEIGHT: f64 = 1.0;

/// A detector's pick.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub index: usize,
    pub description: String,
}

impl Detection {
    fn new(index: usize, description: impl Into<String>) -> Self {
        Self {
            index,
            description: description.into(),
        }
    }
}

/// What a detector can see.
pub struct StageContext<'a> {
    pub builder: &'a KeyframeBuilder<'a>,
    /// First window index the detector may pick.
    pub start: usize,
    pub thresholds: &'a KeyframeThresholds,
}

impl<'a> StageContext<'a> {
    pub fn window(&self) -> &'a [FrameRecord] {
        self.builder.window()
    }

    /// Window-relative index of an earlier keyframe.
    pub fn index(&self, name: KeyframeName) -> Option<usize> {
        self.builder.window_index(name)
    }
}

pub type DetectFn = fn(&StageContext<'_>) -> Option<Detection>;

/// One step of the pipeline.
pub struct Stage {
    pub name: KeyframeName,
    /// Keyframes that must already exist for the stage to run.
    pub requires: &'static [KeyframeName],
    /// Keyframe whose index bounds the search from below; window start if
    /// absent.
    pub search_from: Option<KeyframeName>,
    pub detect: DetectFn,
}

/// The pipeline, in dependency order.
pub const STAGES: &[Stage] = &[
    Stage {
        name: KeyframeName::SquatDeepest,
        requires: &[],
        search_from: None,
        detect: squat_deepest,
    },
    Stage {
        name: KeyframeName::LiftStart,
        requires: &[],
        search_from: None,
        detect: lift_start,
    },
    Stage {
        name: KeyframeName::BallAtChest,
        requires: &[],
        search_from: Some(KeyframeName::LiftStart),
        detect: ball_at_chest,
    },
    Stage {
        name: KeyframeName::BallRisingMid,
        requires: &[KeyframeName::LiftStart, KeyframeName::BallAtChest],
        search_from: None,
        detect: ball_rising_mid,
    },
    Stage {
        name: KeyframeName::BallAtShoulder,
        requires: &[],
        search_from: Some(KeyframeName::BallAtChest),
        detect: ball_at_shoulder,
    },
    Stage {
        name: KeyframeName::ElbowMaxBend,
        requires: &[],
        search_from: None,
        detect: elbow_max_bend,
    },
    Stage {
        name: KeyframeName::ElbowExtensionMax,
        requires: &[],
        search_from: None,
        detect: elbow_extension_max,
    },
    Stage {
        name: KeyframeName::WristSnap,
        requires: &[],
        search_from: None,
        detect: wrist_snap,
    },
    Stage {
        name: KeyframeName::ArmFullExtension,
        requires: &[],
        search_from: None,
        detect: arm_full_extension,
    },
    Stage {
        name: KeyframeName::LegPowerStart,
        requires: &[],
        search_from: None,
        detect: leg_power_start,
    },
    Stage {
        name: KeyframeName::PowerTransfer,
        requires: &[KeyframeName::LegPowerStart, KeyframeName::ElbowMaxBend],
        search_from: None,
        detect: power_transfer,
    },
    Stage {
        name: KeyframeName::Release,
        requires: &[],
        search_from: Some(KeyframeName::LiftStart),
        detect: release,
    },
    Stage {
        name: KeyframeName::ReleasePrepare,
        requires: &[KeyframeName::WristSnap, KeyframeName::Release],
        search_from: None,
        detect: release_prepare,
    },
    Stage {
        name: KeyframeName::FollowThrough,
        requires: &[],
        search_from: None,
        detect: follow_through,
    },
];

fn wrist_y(frame: &FrameRecord) -> Option<f64> {
    frame.joint_y(Joint::RightWrist)
}

fn elbow_angle(frame: &FrameRecord) -> Option<f64> {
    frame.angle(JointAngle::Elbow)
}

/// `[0, a[1]-a[0], ...]`; a delta touching a missing sample is 0.
fn angle_deltas(frames: &[FrameRecord], angle: JointAngle) -> Vec<f64> {
    let mut deltas = Vec::with_capacity(frames.len());
    if frames.is_empty() {
        return deltas;
    }
    deltas.push(0.0);
    deltas.extend(frames.windows(2).map(|w| {
        match (w[0].angle(angle), w[1].angle(angle)) {
            (Some(prev), Some(curr)) => curr - prev,
            _ => 0.0,
        }
    }));
    deltas
}

/// `floor((a + b) / 2)`; absent unless `a < b`.
pub fn midpoint(a: usize, b: usize) -> Option<usize> {
    (a < b).then(|| a + (b - a) / 2)
}

fn squat_deepest(ctx: &StageContext<'_>) -> Option<Detection> {
    let heights: Vec<f64> = ctx
        .window()
        .iter()
        .map(|f| f.center_of_mass.map(|c| c.y).unwrap_or(0.0))
        .collect();
    let idx = argmax_by(heights.iter().copied().enumerate())?;
    (heights[idx] > 0.0).then(|| Detection::new(idx, "Center of mass lowest (deepest squat)"))
}

fn lift_start(ctx: &StageContext<'_>) -> Option<Detection> {
    let h: Vec<f64> = ctx
        .window()
        .iter()
        .map(|f| wrist_y(f).unwrap_or(MISSING_HEIGHT))
        .collect();

    (ctx.start..h.len().saturating_sub(3))
        .find(|&i| {
            h[i] > h[i + 1]
                && h[i + 1] > h[i + 2]
                && h[i + 2] > h[i + 3]
                && h[i] - h[i + 3] > ctx.thresholds.lift_min_rise
        })
        .map(|i| Detection::new(i, "Ball starts rising steadily"))
}

/// Frame from `ctx.start` whose wrist is closest to `target(frame)`.
fn closest_to_height(
    ctx: &StageContext<'_>,
    target: impl Fn(&FrameRecord) -> Option<f64>,
) -> Option<usize> {
    let window = ctx.window();
    let distances = (ctx.start..window.len()).filter_map(|i| {
        let frame = &window[i];
        let wrist = wrist_y(frame)?;
        Some((i, (wrist - target(frame)?).abs()))
    });
    argmin_by(distances)
}

/// Mean shoulder and hip heights; requires all four landmarks.
fn torso_heights(frame: &FrameRecord) -> Option<(f64, f64)> {
    let shoulder = (frame.joint_y(Joint::LeftShoulder)? + frame.joint_y(Joint::RightShoulder)?) / 2.0;
    let hip = (frame.joint_y(Joint::LeftHip)? + frame.joint_y(Joint::RightHip)?) / 2.0;
    Some((shoulder, hip))
}

fn ball_at_chest(ctx: &StageContext<'_>) -> Option<Detection> {
    let fraction = ctx.thresholds.chest_fraction;
    closest_to_height(ctx, |frame| {
        let (shoulder, hip) = torso_heights(frame)?;
        Some(shoulder + fraction * (hip - shoulder))
    })
    .map(|i| Detection::new(i, "Ball at chest height"))
}

fn ball_at_shoulder(ctx: &StageContext<'_>) -> Option<Detection> {
    closest_to_height(ctx, |frame| {
        torso_heights(frame)?;
        frame.joint_y(Joint::RightShoulder)
    })
    .map(|i| Detection::new(i, "Ball at shoulder height"))
}

fn midpoint_between(
    ctx: &StageContext<'_>,
    first: KeyframeName,
    second: KeyframeName,
    description: &str,
) -> Option<Detection> {
    let mid = midpoint(ctx.index(first)?, ctx.index(second)?)?;
    Some(Detection::new(mid, description))
}

fn ball_rising_mid(ctx: &StageContext<'_>) -> Option<Detection> {
    midpoint_between(
        ctx,
        KeyframeName::LiftStart,
        KeyframeName::BallAtChest,
        "Ball rising midpoint",
    )
}

fn power_transfer(ctx: &StageContext<'_>) -> Option<Detection> {
    midpoint_between(
        ctx,
        KeyframeName::LegPowerStart,
        KeyframeName::ElbowMaxBend,
        "Power transfer from legs to arm",
    )
}

fn release_prepare(ctx: &StageContext<'_>) -> Option<Detection> {
    midpoint_between(
        ctx,
        KeyframeName::WristSnap,
        KeyframeName::Release,
        "Release preparation",
    )
}

fn elbow_max_bend(ctx: &StageContext<'_>) -> Option<Detection> {
    let window = ctx.window();
    let idx = argmin_by(
        window
            .iter()
            .enumerate()
            .filter_map(|(i, f)| elbow_angle(f).map(|a| (i, a))),
    )?;
    let angle = elbow_angle(&window[idx])?;
    (angle < ctx.thresholds.straight_angle)
        .then(|| Detection::new(idx, format!("Maximum elbow bend ({angle:.1}°)")))
}

fn elbow_extension_max(ctx: &StageContext<'_>) -> Option<Detection> {
    let extension: Vec<f64> = angle_deltas(ctx.window(), JointAngle::Elbow)
        .into_iter()
        .map(|d| d.max(0.0))
        .collect();
    let idx = argmax_by(extension.iter().copied().enumerate())?;
    let speed = extension[idx];
    (speed > 0.0).then(|| {
        Detection::new(idx, format!("Fastest elbow extension ({speed:.1}°/frame)"))
    })
}

fn wrist_snap(ctx: &StageContext<'_>) -> Option<Detection> {
    let diffs: Vec<f64> = ctx
        .window()
        .iter()
        .map(|f| match (wrist_y(f), f.joint_y(Joint::RightElbow)) {
            (Some(wrist), Some(elbow)) => wrist - elbow,
            _ => -1.0,
        })
        .collect();

    // The wrist must drop below the elbow somewhere in the window; the pick
    // itself comes from the second half whatever its sign.
    if !diffs.iter().any(|d| *d > 0.0) {
        return None;
    }
    let half = diffs.len() / 2;
    let idx = argmax_by(diffs.iter().copied().enumerate().skip(half))?;
    Some(Detection::new(idx, "Wrist snap"))
}

fn arm_full_extension(ctx: &StageContext<'_>) -> Option<Detection> {
    let angles: Vec<(usize, f64)> = ctx
        .window()
        .iter()
        .enumerate()
        .filter_map(|(i, f)| elbow_angle(f).map(|a| (i, a)))
        .collect();

    if let Some(&(i, angle)) = angles
        .iter()
        .find(|(_, a)| *a >= ctx.thresholds.full_extension_angle)
    {
        return Some(Detection::new(i, format!("Arm fully extended ({angle:.1}°)")));
    }

    let idx = argmax_by(angles.iter().copied())?;
    let angle = angles.iter().find(|(i, _)| *i == idx).map(|(_, a)| *a)?;
    (angle > ctx.thresholds.near_extension_angle)
        .then(|| Detection::new(idx, format!("Arm nearly extended ({angle:.1}°)")))
}

fn leg_power_start(ctx: &StageContext<'_>) -> Option<Detection> {
    let v = angle_deltas(ctx.window(), JointAngle::Knee);

    let turn = (1..v.len().saturating_sub(1)).find(|&i| v[i - 1] < 0.0 && v[i] >= 0.0 && v[i + 1] >= 0.0);
    if let Some(i) = turn {
        return Some(Detection::new(i, "Legs start driving (knee extension)"));
    }

    let extension: Vec<f64> = v.iter().map(|d| d.max(0.0)).collect();
    let idx = argmax_by(extension.iter().copied().enumerate())?;
    let speed = extension[idx];
    (speed > 0.0).then(|| {
        Detection::new(idx, format!("Fastest knee extension ({speed:.1}°/frame)"))
    })
}

fn release(ctx: &StageContext<'_>) -> Option<Detection> {
    let window = ctx.window();
    let t = ctx.thresholds;
    let elbow = angle_deltas(window, JointAngle::Elbow);

    let scores = (ctx.start..window.len()).map(|i| {
        let frame = &window[i];
        let height = wrist_y(frame).unwrap_or(MISSING_HEIGHT);

        let mut score = t.release_height_weight * (1.0 - height);
        score += (elbow[i] * t.release_extension_gain)
            .max(0.0)
            .min(t.release_extension_cap);

        let rising = i > 0
            && matches!(
                (wrist_y(&window[i - 1]), wrist_y(frame)),
                (Some(prev), Some(curr)) if curr < prev
            );
        if rising {
            let speed = frame.velocity(Joint::RightWrist).unwrap_or(0.0).abs();
            score += (speed * t.release_velocity_gain).min(t.release_velocity_cap);
        }

        (i, score)
    });

    let scores: Vec<(usize, f64)> = scores.collect();
    let idx = argmax_by(scores.iter().copied())?;
    let best = scores.iter().find(|(i, _)| *i == idx).map(|(_, s)| *s)?;
    (best > 0.0).then(|| Detection::new(idx, "Release"))
}

fn follow_through(ctx: &StageContext<'_>) -> Option<Detection> {
    let heights = ctx
        .window()
        .iter()
        .enumerate()
        .filter_map(|(i, f)| wrist_y(f).map(|y| (i, y)));
    argmin_by(heights).map(|i| Detection::new(i, "Follow-through complete (wrist highest)"))
}
