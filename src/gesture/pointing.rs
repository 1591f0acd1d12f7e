//! Index-finger pointing direction

use tracing::trace;

use crate::config::GestureConfig;
use crate::events::GestureKind;
use crate::landmarks::{Finger, HandDetectionResult, HandJoint};

use super::posture::{analyze_finger, FingerStates};

/// Shortest index vector that still has a meaningful direction
const MIN_POINTER_LENGTH: f32 = 1e-3;

/// Direction reading for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointingReading {
    /// Angle of the index finger in degrees; -90 is straight up on screen
    pub angle_deg: f32,
    /// Navigation intent, `None` when the angle falls in neither range
    pub kind: Option<GestureKind>,
    /// Middle/ring/little fingers judged curled
    pub curled_fingers: usize,
    pub confidence: f32,
}

/// Classify the index finger's direction.
///
/// Returns `None` when the index tip or both of its lower joints are
/// missing, or the finger has collapsed to a point.
pub fn classify_pointing(
    hand: &HandDetectionResult,
    config: &GestureConfig,
) -> Option<PointingReading> {
    let tip = hand.landmark(HandJoint::IndexTip)?;
    let lower = hand
        .landmark(HandJoint::IndexMcp)
        .or_else(|| hand.landmark(HandJoint::IndexPip))?;

    let vector = tip.position.sub(&lower.position);
    if vector.length() < MIN_POINTER_LENGTH {
        return None;
    }
    let angle_deg = vector.y.atan2(vector.x).to_degrees();

    let kind = if in_range(angle_deg, config.next_step_angle_range) {
        Some(GestureKind::NextStep)
    } else if in_range(angle_deg, config.previous_step_angle_range) {
        Some(GestureKind::PreviousStep)
    } else {
        None
    };

    // A finger whose chain is incomplete is never counted as curled
    let mut extended = [true; 5];
    for (slot, finger) in extended.iter_mut().zip(Finger::ALL).skip(2) {
        if let Some(analysis) = analyze_finger(hand, finger, config) {
            *slot = analysis.extended;
        }
    }
    let curled_fingers = FingerStates::from_array(extended).curled_count();

    let confidence = hand.confidence * tip.confidence.min(lower.confidence);

    trace!(angle_deg, ?kind, curled_fingers, "pointing reading");

    Some(PointingReading {
        angle_deg,
        kind,
        curled_fingers,
        confidence,
    })
}

fn in_range(angle: f32, (lo, hi): (f32, f32)) -> bool {
    angle >= lo && angle <= hi
}
