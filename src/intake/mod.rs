//! Frame intake module
//!
//! Bridges raw camera frames to validated hand detections:
//! - `PoseEstimator` is the seam to the external hand-pose service
//! - `FrameIntake` runs the estimator and extracts normalized landmarks
//! - `PerceptionWorker` owns intake and the recognizer on a dedicated thread

mod estimator;
mod extract;
mod throttle;
mod worker;

pub use estimator::{Frame, HandObservation, HandPoseRequest, PoseEstimator, RawJoint};
pub use extract::{extract_hand, FrameIntake};
pub use throttle::FrameThrottle;
pub use worker::{PerceptionWorker, WorkerCommand};
