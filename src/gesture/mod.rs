//! Gesture recognition module
//!
//! Turns a stream of per-frame hand detections into discrete navigation
//! commands through a timed, confidence-gated state machine:
//! - Idle: no hand in view
//! - Detecting: a hand is visible but not in the confirmation posture
//! - Hovering: posture held, dwell timer running
//! - Ready: dwell confirmed, waiting for a pointing direction
//! - Processing / Completed: a gesture fired, waiting for the hand to leave

mod hover;
mod machine;
mod motion;
mod pointing;
mod posture;
mod state;
mod timer;

#[cfg(test)]
pub(crate) mod fixtures;

pub use hover::{HoverSample, HoverState};
pub use machine::HandGestureRecognizer;
pub use motion::{MotionDirection, MotionTrackingState};
pub use pointing::{classify_pointing, PointingReading};
pub use posture::{analyze_finger, classify_posture, FingerAnalysis, FingerStates, PalmState};
pub use state::GestureState;
pub use timer::Ticker;
