//! The 21 named hand joints reported by the pose estimator

use serde::{Deserialize, Serialize};

/// Total number of named joints per hand
pub const JOINT_COUNT: usize = 21;

/// Named hand joints: the wrist plus four joints for each of the five fingers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandJoint {
    Wrist,
    ThumbCmc,
    ThumbMp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    LittleMcp,
    LittlePip,
    LittleDip,
    LittleTip,
}

impl HandJoint {
    /// Every joint, in estimator order
    pub const ALL: [HandJoint; JOINT_COUNT] = [
        Self::Wrist,
        Self::ThumbCmc,
        Self::ThumbMp,
        Self::ThumbIp,
        Self::ThumbTip,
        Self::IndexMcp,
        Self::IndexPip,
        Self::IndexDip,
        Self::IndexTip,
        Self::MiddleMcp,
        Self::MiddlePip,
        Self::MiddleDip,
        Self::MiddleTip,
        Self::RingMcp,
        Self::RingPip,
        Self::RingDip,
        Self::RingTip,
        Self::LittleMcp,
        Self::LittlePip,
        Self::LittleDip,
        Self::LittleTip,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wrist => "wrist",
            Self::ThumbCmc => "thumb_cmc",
            Self::ThumbMp => "thumb_mp",
            Self::ThumbIp => "thumb_ip",
            Self::ThumbTip => "thumb_tip",
            Self::IndexMcp => "index_mcp",
            Self::IndexPip => "index_pip",
            Self::IndexDip => "index_dip",
            Self::IndexTip => "index_tip",
            Self::MiddleMcp => "middle_mcp",
            Self::MiddlePip => "middle_pip",
            Self::MiddleDip => "middle_dip",
            Self::MiddleTip => "middle_tip",
            Self::RingMcp => "ring_mcp",
            Self::RingPip => "ring_pip",
            Self::RingDip => "ring_dip",
            Self::RingTip => "ring_tip",
            Self::LittleMcp => "little_mcp",
            Self::LittlePip => "little_pip",
            Self::LittleDip => "little_dip",
            Self::LittleTip => "little_tip",
        }
    }
}

impl std::fmt::Display for HandJoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The five fingers of a hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Little,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Self::Thumb,
        Self::Index,
        Self::Middle,
        Self::Ring,
        Self::Little,
    ];

    /// The finger's four joints ordered base to tip
    pub fn joints(&self) -> [HandJoint; 4] {
        use HandJoint::*;
        match self {
            Self::Thumb => [ThumbCmc, ThumbMp, ThumbIp, ThumbTip],
            Self::Index => [IndexMcp, IndexPip, IndexDip, IndexTip],
            Self::Middle => [MiddleMcp, MiddlePip, MiddleDip, MiddleTip],
            Self::Ring => [RingMcp, RingPip, RingDip, RingTip],
            Self::Little => [LittleMcp, LittlePip, LittleDip, LittleTip],
        }
    }
}
