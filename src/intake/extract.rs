//! Landmark extraction from estimator output

use tracing::{debug, trace};

use crate::config::GestureConfig;
use crate::error::EstimationError;
use crate::landmarks::{HandDetectionResult, HandJoint, JointLandmark};

use super::estimator::{Frame, HandObservation, HandPoseRequest, PoseEstimator};

/// Convert one estimator hand into a detection result.
///
/// Keeps joints whose confidence exceeds `confidence_floor` and flips y to
/// the top-left origin used by the UI. A hand with no qualifying joints
/// yields `None`.
pub fn extract_hand(observation: &HandObservation, confidence_floor: f32) -> Option<HandDetectionResult> {
    let landmarks: Vec<JointLandmark> = HandJoint::ALL
        .iter()
        .filter_map(|joint| {
            let raw = observation.joint(*joint)?;
            (raw.confidence > confidence_floor)
                .then(|| JointLandmark::new(*joint, raw.x, 1.0 - raw.y, raw.confidence))
        })
        .collect();

    HandDetectionResult::new(landmarks, observation.chirality, observation.confidence)
}

/// Runs the estimator for each frame and extracts valid hands
pub struct FrameIntake {
    estimator: Box<dyn PoseEstimator>,
    confidence_floor: f32,
    max_hands: usize,
}

impl FrameIntake {
    pub fn new(estimator: Box<dyn PoseEstimator>, config: &GestureConfig) -> Self {
        Self {
            estimator,
            confidence_floor: config.landmark_confidence_floor,
            max_hands: config.max_hands,
        }
    }

    /// Estimate and extract every valid hand in `frame`
    pub fn process_frame(&self, frame: &Frame) -> Result<Vec<HandDetectionResult>, EstimationError> {
        let request = HandPoseRequest::new(frame, self.max_hands);
        let observations = self.estimator.estimate(frame, &request)?;

        let hands: Vec<HandDetectionResult> = observations
            .iter()
            .take(self.max_hands)
            .filter_map(|obs| {
                let hand = extract_hand(obs, self.confidence_floor);
                if hand.is_none() {
                    trace!(sequence = frame.sequence, "dropping hand with no confident joints");
                }
                hand
            })
            .collect();

        debug!(
            sequence = frame.sequence,
            observed = observations.len(),
            valid = hands.len(),
            "frame processed"
        );

        Ok(hands)
    }
}
