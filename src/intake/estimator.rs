//! Interface to the external hand-pose estimation service

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::EstimationError;
use crate::landmarks::{HandJoint, Handedness};

/// One camera frame handed to the engine.
///
/// The engine takes ownership, so the caller cannot mutate the buffer
/// while it is being processed.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    /// Monotonic frame counter from the capture session
    pub sequence: u64,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Frame {
    pub fn new(sequence: u64, width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            sequence,
            width,
            height,
            pixels,
        }
    }

    /// A frame with no pixel data, for estimators that key off the sequence
    pub fn empty(sequence: u64) -> Self {
        Self {
            sequence,
            ..Self::default()
        }
    }
}

/// Per-frame request parameters. A fresh request is built for every frame
/// so overlapping estimations never share mutable request state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandPoseRequest {
    pub max_hands: usize,
    pub frame_sequence: u64,
}

impl HandPoseRequest {
    pub fn new(frame: &Frame, max_hands: usize) -> Self {
        Self {
            max_hands,
            frame_sequence: frame.sequence,
        }
    }
}

/// A joint as reported by the estimator: bottom-left origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawJoint {
    pub x: f32,
    pub y: f32,
    pub confidence: f32,
}

/// One hand as reported by the estimator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandObservation {
    #[serde(default)]
    pub chirality: Handedness,
    pub confidence: f32,
    #[serde(default)]
    pub joints: BTreeMap<HandJoint, RawJoint>,
}

impl HandObservation {
    pub fn joint(&self, joint: HandJoint) -> Option<RawJoint> {
        self.joints.get(&joint).copied()
    }
}

/// External hand-pose estimation service
pub trait PoseEstimator: Send {
    /// Estimate up to `request.max_hands` hands in `frame`
    fn estimate(
        &self,
        frame: &Frame,
        request: &HandPoseRequest,
    ) -> Result<Vec<HandObservation>, EstimationError>;
}

impl<F> PoseEstimator for F
where
    F: Fn(&Frame, &HandPoseRequest) -> Result<Vec<HandObservation>, EstimationError> + Send,
{
    fn estimate(
        &self,
        frame: &Frame,
        request: &HandPoseRequest,
    ) -> Result<Vec<HandObservation>, EstimationError> {
        self(frame, request)
    }
}
