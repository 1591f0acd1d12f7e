//! Hand landmark data model
//!
//! Normalized 2D joint positions for a single detected hand, as produced
//! by frame intake and consumed by the gesture state machine.

mod detection;
mod joints;
mod point;

pub use detection::{BoundingBox, HandDetectionResult, Handedness, JointLandmark};
pub use joints::{Finger, HandJoint, JOINT_COUNT};
pub use point::Point;
