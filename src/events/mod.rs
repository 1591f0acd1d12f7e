//! Events module for recognizer output
//!
//! Everything the engine reports to its consumers flows through
//! [`GestureEvent`]: state transitions, palm and hover updates,
//! recognized gestures and failures.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::gesture::{GestureState, PalmState};
use crate::landmarks::{HandDetectionResult, Point};

/// Navigation command produced by a recognized gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    /// Index pointing down
    PreviousStep,
    /// Index pointing up
    NextStep,
}

impl std::fmt::Display for GestureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GestureKind::PreviousStep => write!(f, "previous_step"),
            GestureKind::NextStep => write!(f, "next_step"),
        }
    }
}

/// One recognized gesture
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureResult {
    pub kind: GestureKind,
    pub confidence: f32,
    /// Hand centroid at recognition time, normalized view space
    pub position: Point,
    /// Wall-clock time of recognition, milliseconds since the Unix epoch
    pub timestamp_ms: u64,
}

impl GestureResult {
    pub fn new(kind: GestureKind, confidence: f32, position: Point) -> Self {
        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self {
            kind,
            confidence,
            position,
            timestamp_ms,
        }
    }
}

/// Reasons a recognition attempt can fail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecognitionError {
    NoHandDetected,
    PostureNotHeld,
    HoverTimeout,
    MotionTooSlow,
    MotionTooFast,
    AmbiguousMotion,
    SystemError(String),
}

impl std::fmt::Display for RecognitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecognitionError::NoHandDetected => write!(f, "no hand detected"),
            RecognitionError::PostureNotHeld => write!(f, "confirmation posture not held"),
            RecognitionError::HoverTimeout => write!(f, "hover timed out"),
            RecognitionError::MotionTooSlow => write!(f, "motion too slow"),
            RecognitionError::MotionTooFast => write!(f, "motion too fast"),
            RecognitionError::AmbiguousMotion => write!(f, "ambiguous motion"),
            RecognitionError::SystemError(message) => write!(f, "system error: {}", message),
        }
    }
}

/// Events emitted by the recognizer and intake
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GestureEvent {
    /// The state machine moved to a new state
    StateChanged {
        state: GestureState,
        previous: GestureState,
    },

    /// Posture classification for the tracked hand
    PalmStateChanged { palm: PalmState },

    /// Hover dwell progress, 0.0 to 1.0
    HoverProgress { progress: f32 },

    /// A navigation gesture fired
    GestureRecognized { result: GestureResult },

    /// Recognition could not proceed
    RecognitionFailed { error: RecognitionError },

    /// Valid hands found in the latest frame (diagnostics)
    HandsDetected { hands: Vec<HandDetectionResult> },
}

impl std::fmt::Display for GestureEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GestureEvent::StateChanged { state, previous } => {
                write!(f, "STATE_CHANGED ({} -> {})", previous, state)
            }
            GestureEvent::PalmStateChanged { palm } => {
                write!(
                    f,
                    "PALM_STATE (held={}, confidence={:.2})",
                    palm.is_confirmation_posture, palm.confidence
                )
            }
            GestureEvent::HoverProgress { progress } => {
                write!(f, "HOVER_PROGRESS ({:.0}%)", progress * 100.0)
            }
            GestureEvent::GestureRecognized { result } => {
                write!(f, "GESTURE_RECOGNIZED ({}, {:.2})", result.kind, result.confidence)
            }
            GestureEvent::RecognitionFailed { error } => {
                write!(f, "RECOGNITION_FAILED ({})", error)
            }
            GestureEvent::HandsDetected { hands } => {
                write!(f, "HANDS_DETECTED ({})", hands.len())
            }
        }
    }
}
