//! Finger extension analysis and confirmation-posture classification
//!
//! The confirmation posture is thumb and index extended with the middle,
//! ring and little fingers curled. Thumb and index are judged with relaxed
//! thresholds, the other three with a tighter bending tolerance, so a noisy
//! reading still opens the gesture window but a half-open hand does not.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::GestureConfig;
use crate::landmarks::{Finger, HandDetectionResult, Point};

/// Extension pattern of the confirmation posture, thumb to little
const CONFIRMATION_PATTERN: [bool; 5] = [true, true, false, false, false];

/// Per-finger extension flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerStates {
    pub thumb: bool,
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub little: bool,
}

impl FingerStates {
    pub fn from_array(extended: [bool; 5]) -> Self {
        let [thumb, index, middle, ring, little] = extended;
        Self {
            thumb,
            index,
            middle,
            ring,
            little,
        }
    }

    pub fn as_array(&self) -> [bool; 5] {
        [self.thumb, self.index, self.middle, self.ring, self.little]
    }

    /// Number of middle/ring/little fingers not extended
    pub fn curled_count(&self) -> usize {
        [self.middle, self.ring, self.little]
            .iter()
            .filter(|extended| !**extended)
            .count()
    }
}

/// Posture classification for one hand in one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PalmState {
    /// All five fingers match the confirmation pattern
    pub is_confirmation_posture: bool,
    /// Pattern match score scaled by hand-level confidence
    pub confidence: f32,
    /// Mean landmark position
    pub centroid: Point,
    pub fingers: FingerStates,
}

impl PalmState {
    /// Classification used when a finger chain is incomplete
    pub fn neutral(centroid: Point) -> Self {
        Self {
            is_confirmation_posture: false,
            confidence: 0.0,
            centroid,
            fingers: FingerStates::default(),
        }
    }

    /// Posture matches and is confident enough to gate on
    pub fn is_held(&self, threshold: f32) -> bool {
        self.is_confirmation_posture && self.confidence >= threshold
    }
}

/// Geometry behind a single finger's extension decision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FingerAnalysis {
    pub finger: Finger,
    /// Tip-to-base distance
    pub tip_distance: f32,
    /// Shortest inter-joint segment; `None` for the thumb
    pub shortest_segment: Option<f32>,
    /// Normalized deviation of the middle joint from the tip-base line;
    /// `None` for the thumb
    pub bending_factor: Option<f32>,
    pub extended: bool,
}

struct Thresholds {
    min_distance: f32,
    min_segment: f32,
    max_bending: f32,
}

impl Thresholds {
    fn for_finger(finger: Finger, config: &GestureConfig) -> Self {
        match finger {
            Finger::Thumb | Finger::Index => Self {
                min_distance: config.min_extension_distance * config.relaxed_multiplier,
                min_segment: config.min_segment_length * config.relaxed_multiplier,
                max_bending: config.max_bending_factor,
            },
            Finger::Middle | Finger::Ring | Finger::Little => Self {
                min_distance: config.min_extension_distance,
                min_segment: config.min_segment_length,
                max_bending: config.max_bending_factor * config.strict_multiplier,
            },
        }
    }
}

/// Decide whether a finger is extended.
///
/// Returns `None` when a joint the decision needs was not retained.
pub fn analyze_finger(
    hand: &HandDetectionResult,
    finger: Finger,
    config: &GestureConfig,
) -> Option<FingerAnalysis> {
    let thresholds = Thresholds::for_finger(finger, config);
    let [base, pip, dip, tip] = finger.joints();

    let base = hand.position(base)?;
    let tip = hand.position(tip)?;
    let tip_distance = base.distance(&tip);

    // The thumb has no comparable four-joint chain
    if finger == Finger::Thumb {
        return Some(FingerAnalysis {
            finger,
            tip_distance,
            shortest_segment: None,
            bending_factor: None,
            extended: tip_distance > thresholds.min_distance,
        });
    }

    let pip = hand.position(pip)?;
    let dip = hand.position(dip)?;

    let shortest_segment = [base.distance(&pip), pip.distance(&dip), dip.distance(&tip)]
        .into_iter()
        .fold(f32::INFINITY, f32::min);
    let bending_factor = bending_factor(base, pip, tip);

    let extended = tip_distance > thresholds.min_distance
        && shortest_segment > thresholds.min_segment
        && bending_factor < thresholds.max_bending;

    Some(FingerAnalysis {
        finger,
        tip_distance,
        shortest_segment: Some(shortest_segment),
        bending_factor: Some(bending_factor),
        extended,
    })
}

/// Perpendicular distance of `middle` from the base-tip line, divided by
/// the line's length. A degenerate line counts as fully bent.
fn bending_factor(base: Point, middle: Point, tip: Point) -> f32 {
    let line = tip.sub(&base);
    let length = line.length();
    if length <= f32::EPSILON {
        return 1.0;
    }
    let offset = middle.sub(&base);
    let cross = line.x * offset.y - line.y * offset.x;
    cross.abs() / length / length
}

/// Classify the confirmation posture for a hand
pub fn classify_posture(hand: &HandDetectionResult, config: &GestureConfig) -> PalmState {
    let centroid = hand.centroid();

    let mut extended = [false; 5];
    for (slot, finger) in extended.iter_mut().zip(Finger::ALL) {
        match analyze_finger(hand, finger, config) {
            Some(analysis) => *slot = analysis.extended,
            None => {
                trace!(?finger, "finger chain incomplete, posture not recognized");
                return PalmState::neutral(centroid);
            }
        }
    }

    let matching = extended
        .iter()
        .zip(CONFIRMATION_PATTERN.iter())
        .filter(|(actual, expected)| actual == expected)
        .count();

    let is_confirmation_posture = matching == CONFIRMATION_PATTERN.len();
    let score = if is_confirmation_posture {
        config.exact_match_confidence
    } else {
        matching as f32 / CONFIRMATION_PATTERN.len() as f32 * config.partial_match_scale
    };

    PalmState {
        is_confirmation_posture,
        confidence: score * hand.confidence,
        centroid,
        fingers: FingerStates::from_array(extended),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::fixtures::{confirmation_posture, fist, open_hand, HandBuilder};
    use crate::landmarks::HandJoint;

    #[test]
    fn test_confirmation_posture_is_held() {
        let config = GestureConfig::default();
        let palm = classify_posture(&confirmation_posture().build(), &config);

        assert!(palm.is_confirmation_posture);
        assert_eq!(palm.fingers.as_array(), CONFIRMATION_PATTERN);
        assert!((palm.confidence - 0.81).abs() < 1e-4);
        assert!(palm.is_held(config.posture_confidence_threshold));
    }

    #[test]
    fn test_open_hand_is_not_held() {
        let config = GestureConfig::default();
        let palm = classify_posture(&open_hand().build(), &config);

        assert!(!palm.is_confirmation_posture);
        assert_eq!(palm.fingers.as_array(), [true; 5]);
        // two of five fingers match
        assert!((palm.confidence - 0.4 * 0.6 * 0.9).abs() < 1e-4);
        assert!(!palm.is_held(config.posture_confidence_threshold));
    }

    #[test]
    fn test_partial_match_never_reaches_threshold() {
        let config = GestureConfig::default();
        let hand = HandBuilder::new([true, false, false, false, false])
            .confidence(1.0)
            .build();
        let palm = classify_posture(&hand, &config);

        // four of five match (everything but the index)
        assert!(!palm.is_confirmation_posture);
        assert!((palm.confidence - 0.48).abs() < 1e-4);
        assert!(!palm.is_held(config.posture_confidence_threshold));
    }

    #[test]
    fn test_fist_scores_three_of_five() {
        let config = GestureConfig::default();
        let palm = classify_posture(&fist().confidence(1.0).build(), &config);
        assert_eq!(palm.fingers.as_array(), [false; 5]);
        assert!((palm.confidence - 0.36).abs() < 1e-4);
    }

    #[test]
    fn test_posture_survives_rotation() {
        let config = GestureConfig::default();
        let palm = classify_posture(&confirmation_posture().pointing(90.0).build(), &config);
        assert!(palm.is_confirmation_posture);
    }

    #[test]
    fn test_low_hand_confidence_drops_below_threshold() {
        let config = GestureConfig::default();
        let palm = classify_posture(&confirmation_posture().confidence(0.5).build(), &config);
        assert!(palm.is_confirmation_posture);
        assert!(!palm.is_held(config.posture_confidence_threshold));
    }

    #[test]
    fn test_missing_joint_gives_neutral_result() {
        let config = GestureConfig::default();
        let hand = confirmation_posture().without(HandJoint::RingDip).build();
        let palm = classify_posture(&hand, &config);
        assert_eq!(palm.confidence, 0.0);
        assert!(!palm.is_confirmation_posture);
    }

    #[test]
    fn test_straight_finger_has_no_bend() {
        let config = GestureConfig::default();
        let hand = open_hand().build();
        let analysis = analyze_finger(&hand, Finger::Middle, &config).unwrap();
        assert!(analysis.extended);
        assert!(analysis.bending_factor.unwrap() < 1e-4);
        assert!((analysis.tip_distance - 0.2).abs() < 1e-4);
    }

    #[test]
    fn test_bent_finger_fails_strict_tolerance() {
        let config = GestureConfig::default();
        // middle joint 0.03 off a 0.2 long line: factor 0.15, above the
        // strict tolerance (0.125) but below the relaxed one (0.25)
        let factor = bending_factor(
            Point::new(0.5, 0.5),
            Point::new(0.53, 0.42),
            Point::new(0.5, 0.3),
        );
        assert!((factor - 0.15).abs() < 1e-4);
        assert!(factor > config.max_bending_factor * config.strict_multiplier);
        assert!(factor < config.max_bending_factor);
    }

    #[test]
    fn test_thumb_uses_distance_only() {
        let config = GestureConfig::default();
        let hand = confirmation_posture().without(HandJoint::ThumbIp).build();
        let analysis = analyze_finger(&hand, Finger::Thumb, &config).unwrap();
        assert!(analysis.extended);
        assert!(analysis.bending_factor.is_none());
    }
}
