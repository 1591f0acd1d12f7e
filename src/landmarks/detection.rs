//! Per-hand detection results

use serde::{Deserialize, Serialize};

use super::joints::HandJoint;
use super::point::Point;

/// A single joint position with the estimator's confidence in it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointLandmark {
    pub joint: HandJoint,
    /// Normalized position, top-left origin
    pub position: Point,
    /// Estimator confidence, 0.0 to 1.0
    pub confidence: f32,
}

impl JointLandmark {
    pub fn new(joint: HandJoint, x: f32, y: f32, confidence: f32) -> Self {
        Self {
            joint,
            position: Point::new(x, y),
            confidence,
        }
    }
}

/// Which hand the estimator believes it saw
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Handedness {
    Left,
    Right,
    #[default]
    Unknown,
}

impl std::fmt::Display for Handedness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Handedness::Left => write!(f, "left"),
            Handedness::Right => write!(f, "right"),
            Handedness::Unknown => write!(f, "unknown"),
        }
    }
}

/// Axis-aligned extent of a hand's landmarks in normalized space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

impl BoundingBox {
    /// Min/max extent of the given points, `None` when empty
    pub fn enclosing<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut bbox = BoundingBox {
            min: first,
            max: first,
        };
        for p in iter {
            bbox.min.x = bbox.min.x.min(p.x);
            bbox.min.y = bbox.min.y.min(p.y);
            bbox.max.x = bbox.max.x.max(p.x);
            bbox.max.y = bbox.max.y.max(p.y);
        }
        Some(bbox)
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }
}

/// All retained landmarks for one detected hand in one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandDetectionResult {
    pub landmarks: Vec<JointLandmark>,
    pub bounding_box: BoundingBox,
    pub handedness: Handedness,
    /// Hand-level confidence reported by the estimator
    pub confidence: f32,
}

impl HandDetectionResult {
    /// Build a result from already-filtered landmarks.
    ///
    /// Returns `None` when there are no landmarks: a hand with nothing
    /// above the confidence floor is not a detection.
    pub fn new(
        landmarks: Vec<JointLandmark>,
        handedness: Handedness,
        confidence: f32,
    ) -> Option<Self> {
        let bounding_box = BoundingBox::enclosing(landmarks.iter().map(|l| &l.position))?;
        Some(Self {
            landmarks,
            bounding_box,
            handedness,
            confidence,
        })
    }

    /// Look up a joint, `None` if it was not retained
    pub fn landmark(&self, joint: HandJoint) -> Option<&JointLandmark> {
        self.landmarks.iter().find(|l| l.joint == joint)
    }

    pub fn position(&self, joint: HandJoint) -> Option<Point> {
        self.landmark(joint).map(|l| l.position)
    }

    /// Mean position of all retained landmarks
    pub fn centroid(&self) -> Point {
        Point::centroid(self.landmarks.iter().map(|l| &l.position))
            .unwrap_or_else(|| self.bounding_box.center())
    }

    /// Pick the hand the recognizer should track.
    ///
    /// Highest hand-level confidence wins; ties go to the hand with more
    /// retained joints.
    pub fn best(hands: &[HandDetectionResult]) -> Option<&HandDetectionResult> {
        hands.iter().max_by(|a, b| {
            a.confidence
                .total_cmp(&b.confidence)
                .then(a.landmarks.len().cmp(&b.landmarks.len()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand(confidence: f32, joints: &[HandJoint]) -> HandDetectionResult {
        let landmarks = joints
            .iter()
            .enumerate()
            .map(|(i, j)| JointLandmark::new(*j, 0.1 * i as f32, 0.2, 0.9))
            .collect();
        HandDetectionResult::new(landmarks, Handedness::Right, confidence).unwrap()
    }

    #[test]
    fn test_empty_landmarks_is_not_a_hand() {
        assert!(HandDetectionResult::new(Vec::new(), Handedness::Left, 0.9).is_none());
    }

    #[test]
    fn test_bounding_box() {
        let pts = [Point::new(0.2, 0.7), Point::new(0.5, 0.1), Point::new(0.3, 0.4)];
        let bbox = BoundingBox::enclosing(pts.iter()).unwrap();
        assert_eq!(bbox.min, Point::new(0.2, 0.1));
        assert_eq!(bbox.max, Point::new(0.5, 0.7));
    }

    #[test]
    fn test_best_prefers_confidence_then_joint_count() {
        let hands = vec![
            hand(0.6, &[HandJoint::Wrist, HandJoint::IndexTip]),
            hand(0.8, &[HandJoint::Wrist]),
            hand(0.8, &[HandJoint::Wrist, HandJoint::ThumbTip, HandJoint::IndexTip]),
        ];
        let best = HandDetectionResult::best(&hands).unwrap();
        assert_eq!(best.landmarks.len(), 3);
        assert!(HandDetectionResult::best(&[]).is_none());
    }

    #[test]
    fn test_landmark_lookup() {
        let h = hand(0.9, &[HandJoint::Wrist, HandJoint::IndexTip]);
        assert!(h.landmark(HandJoint::IndexTip).is_some());
        assert!(h.landmark(HandJoint::RingTip).is_none());
    }
}
