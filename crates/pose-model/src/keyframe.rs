//! Keyframes: the named critical instants of a shooting motion.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical keyframe names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyframeName {
    BallLowest,
    SquatDeepest,
    LiftStart,
    BallRisingMid,
    BallAtChest,
    BallAtShoulder,
    ElbowMaxBend,
    ElbowExtensionMax,
    WristSnap,
    ReleasePrepare,
    ArmFullExtension,
    LegPowerStart,
    PowerTransfer,
    Release,
    FollowThrough,
}

impl KeyframeName {
    pub const ALL: [KeyframeName; 15] = [
        KeyframeName::BallLowest,
        KeyframeName::SquatDeepest,
        KeyframeName::LiftStart,
        KeyframeName::BallRisingMid,
        KeyframeName::BallAtChest,
        KeyframeName::BallAtShoulder,
        KeyframeName::ElbowMaxBend,
        KeyframeName::ElbowExtensionMax,
        KeyframeName::WristSnap,
        KeyframeName::ReleasePrepare,
        KeyframeName::ArmFullExtension,
        KeyframeName::LegPowerStart,
        KeyframeName::PowerTransfer,
        KeyframeName::Release,
        KeyframeName::FollowThrough,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            KeyframeName::BallLowest => "ball_lowest",
            KeyframeName::SquatDeepest => "squat_deepest",
            KeyframeName::LiftStart => "lift_start",
            KeyframeName::BallRisingMid => "ball_rising_mid",
            KeyframeName::BallAtChest => "ball_at_chest",
            KeyframeName::BallAtShoulder => "ball_at_shoulder",
            KeyframeName::ElbowMaxBend => "elbow_max_bend",
            KeyframeName::ElbowExtensionMax => "elbow_extension_max",
            KeyframeName::WristSnap => "wrist_snap",
            KeyframeName::ReleasePrepare => "release_prepare",
            KeyframeName::ArmFullExtension => "arm_full_extension",
            KeyframeName::LegPowerStart => "leg_power_start",
            KeyframeName::PowerTransfer => "power_transfer",
            KeyframeName::Release => "release",
            KeyframeName::FollowThrough => "follow_through",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            KeyframeName::BallLowest => "Ball lowest point",
            KeyframeName::SquatDeepest => "Deepest squat",
            KeyframeName::LiftStart => "Lift start",
            KeyframeName::BallRisingMid => "Ball rising midpoint",
            KeyframeName::BallAtChest => "Ball at chest height",
            KeyframeName::BallAtShoulder => "Ball at shoulder height",
            KeyframeName::ElbowMaxBend => "Maximum elbow bend",
            KeyframeName::ElbowExtensionMax => "Fastest elbow extension",
            KeyframeName::WristSnap => "Wrist snap",
            KeyframeName::ReleasePrepare => "Release preparation",
            KeyframeName::ArmFullExtension => "Arm full extension",
            KeyframeName::LegPowerStart => "Leg drive start",
            KeyframeName::PowerTransfer => "Power transfer",
            KeyframeName::Release => "Release",
            KeyframeName::FollowThrough => "Follow-through",
        }
    }
}

impl fmt::Display for KeyframeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A detected keyframe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub name: KeyframeName,
    /// Absolute position in the analyzed frame sequence.
    pub index: usize,
    /// Frame number in the source video.
    pub frame_number: u64,
    /// Seconds since the start of the video.
    pub timestamp: f64,
    pub description: String,
}

/// How the anchor keyframe was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorOutcome {
    /// The wrist was visible and its lowest position was found.
    Detected,
    /// No visible wrist; frame 0 stands in for the anchor.
    Fallback,
}

/// Non-fatal keyframe ordering anomaly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OrderWarning {
    /// A keyframe precedes the anchor.
    BeforeAnchor {
        name: KeyframeName,
        index: usize,
        anchor: usize,
    },
    /// `earlier` was expected no later than `later`.
    OutOfOrder {
        earlier: KeyframeName,
        earlier_index: usize,
        later: KeyframeName,
        later_index: usize,
    },
}

impl fmt::Display for OrderWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderWarning::BeforeAnchor {
                name,
                index,
                anchor,
            } => write!(
                f,
                "{name} (frame {index}) precedes ball_lowest (frame {anchor})"
            ),
            OrderWarning::OutOfOrder {
                earlier,
                earlier_index,
                later,
                later_index,
            } => write!(
                f,
                "{earlier} (frame {earlier_index}) is later than {later} (frame {later_index})"
            ),
        }
    }
}

/// Detected keyframes in ascending frame order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyframeSet {
    keyframes: Vec<Keyframe>,
    anchor: AnchorOutcome,
    #[serde(default)]
    warnings: Vec<OrderWarning>,
}

impl KeyframeSet {
    /// Build a set; entries are stably sorted by index so that, on equal
    /// indices, insertion order is kept.
    pub fn new(
        mut keyframes: Vec<Keyframe>,
        anchor: AnchorOutcome,
        warnings: Vec<OrderWarning>,
    ) -> Self {
        keyframes.sort_by_key(|kf| kf.index);
        Self {
            keyframes,
            anchor,
            warnings,
        }
    }

    pub fn get(&self, name: KeyframeName) -> Option<&Keyframe> {
        self.keyframes.iter().find(|kf| kf.name == name)
    }

    /// Index of a keyframe, if present.
    pub fn index_of(&self, name: KeyframeName) -> Option<usize> {
        self.get(name).map(|kf| kf.index)
    }

    pub fn contains(&self, name: KeyframeName) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Keyframe> {
        self.keyframes.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = KeyframeName> + '_ {
        self.keyframes.iter().map(|kf| kf.name)
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    pub fn first(&self) -> Option<&Keyframe> {
        self.keyframes.first()
    }

    pub fn last(&self) -> Option<&Keyframe> {
        self.keyframes.last()
    }

    pub fn anchor_outcome(&self) -> AnchorOutcome {
        self.anchor
    }

    pub fn warnings(&self) -> &[OrderWarning] {
        &self.warnings
    }
}
