//! cookstep-gestures: hand-gesture recognition for hands-free recipe
//! navigation
//!
//! Turns a stream of camera frames into "previous step" / "next step"
//! commands:
//! - `intake` runs the hand-pose estimator off the caller's thread and
//!   extracts normalized landmarks
//! - `gesture` classifies finger posture, confirms intent with a timed
//!   hover, reads the pointing direction and debounces the result
//! - `dispatch` republishes every change on a single consumer task
//! - `engine` is the control surface a camera session drives

pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod events;
pub mod gesture;
pub mod intake;
pub mod landmarks;
pub mod replay;

pub use config::GestureConfig;
pub use engine::GestureEngine;
pub use error::{ConfigError, EngineError, EstimationError};
pub use events::{GestureEvent, GestureKind, GestureResult, RecognitionError};
pub use gesture::{GestureState, HandGestureRecognizer};
