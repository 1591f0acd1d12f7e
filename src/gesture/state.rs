//! Recognizer states

use serde::{Deserialize, Serialize};

/// The six states of the gesture recognizer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureState {
    /// No hand in view
    #[default]
    Idle,
    /// Hand in view, confirmation posture not held
    Detecting,
    /// Confirmation posture held, dwell timer running
    Hovering,
    /// Dwell confirmed, watching for a pointing direction
    Ready,
    /// A pointing direction was accepted
    Processing,
    /// Gesture emitted, waiting for the hand to leave the frame
    Completed,
}

impl GestureState {
    /// States in which posture is recomputed for every frame
    pub fn tracks_posture(&self) -> bool {
        matches!(self, Self::Idle | Self::Detecting | Self::Hovering)
    }

    /// States in which pointing direction is classified
    pub fn tracks_pointing(&self) -> bool {
        matches!(self, Self::Ready | Self::Processing)
    }
}

impl std::fmt::Display for GestureState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GestureState::Idle => write!(f, "Idle"),
            GestureState::Detecting => write!(f, "Detecting"),
            GestureState::Hovering => write!(f, "Hovering"),
            GestureState::Ready => write!(f, "Ready"),
            GestureState::Processing => write!(f, "Processing"),
            GestureState::Completed => write!(f, "Completed"),
        }
    }
}
