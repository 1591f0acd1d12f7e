//! Synthetic hands for recognizer tests

use crate::landmarks::{Finger, HandDetectionResult, HandJoint, Handedness, JointLandmark, Point};

/// Builds a hand from per-finger extension flags, rotated so that the
/// index finger points at `angle_deg` (UI convention, -90 is straight up).
#[derive(Debug, Clone)]
pub(crate) struct HandBuilder {
    extended: [bool; 5],
    angle_deg: f32,
    wrist: Point,
    confidence: f32,
    joint_confidence: f32,
    omit: Vec<HandJoint>,
}

impl HandBuilder {
    pub(crate) fn new(extended: [bool; 5]) -> Self {
        Self {
            extended,
            angle_deg: -90.0,
            wrist: Point::new(0.5, 0.55),
            confidence: 0.9,
            joint_confidence: 0.9,
            omit: Vec::new(),
        }
    }

    pub(crate) fn pointing(mut self, angle_deg: f32) -> Self {
        self.angle_deg = angle_deg;
        self
    }

    pub(crate) fn shifted(mut self, dx: f32, dy: f32) -> Self {
        self.wrist = Point::new(self.wrist.x + dx, self.wrist.y + dy);
        self
    }

    pub(crate) fn confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }

    pub(crate) fn without(mut self, joint: HandJoint) -> Self {
        self.omit.push(joint);
        self
    }

    pub(crate) fn build(&self) -> HandDetectionResult {
        let phi = (self.angle_deg + 90.0).to_radians();
        let (sin, cos) = phi.sin_cos();

        let mut local = vec![(HandJoint::Wrist, Point::new(0.0, 0.0))];
        for (i, finger) in Finger::ALL.iter().enumerate() {
            let chain = finger_chain(*finger, self.extended[i]);
            local.extend(finger.joints().iter().copied().zip(chain));
        }

        let landmarks = local
            .into_iter()
            .filter(|(joint, _)| !self.omit.contains(joint))
            .map(|(joint, p)| {
                let x = p.x * cos - p.y * sin + self.wrist.x;
                let y = p.x * sin + p.y * cos + self.wrist.y;
                JointLandmark::new(joint, x, y, self.joint_confidence)
            })
            .collect();

        HandDetectionResult::new(landmarks, Handedness::Right, self.confidence)
            .expect("fixture hand has landmarks")
    }
}

/// Joint offsets from the wrist for an upright hand, base to tip
fn finger_chain(finger: Finger, extended: bool) -> [Point; 4] {
    if finger == Finger::Thumb {
        return if extended {
            [
                Point::new(-0.06, -0.05),
                Point::new(-0.10, -0.09),
                Point::new(-0.14, -0.13),
                Point::new(-0.18, -0.17),
            ]
        } else {
            [
                Point::new(-0.06, -0.05),
                Point::new(-0.04, -0.09),
                Point::new(-0.01, -0.10),
                Point::new(-0.04, -0.06),
            ]
        };
    }

    let bx = match finger {
        Finger::Index => -0.03,
        Finger::Middle => 0.0,
        Finger::Ring => 0.03,
        _ => 0.06,
    };
    if extended {
        [
            Point::new(bx, -0.20),
            Point::new(bx, -0.28),
            Point::new(bx, -0.34),
            Point::new(bx, -0.40),
        ]
    } else {
        [
            Point::new(bx, -0.20),
            Point::new(bx, -0.25),
            Point::new(bx + 0.02, -0.22),
            Point::new(bx + 0.01, -0.18),
        ]
    }
}

/// Thumb and index extended, the rest curled
pub(crate) fn confirmation_posture() -> HandBuilder {
    HandBuilder::new([true, true, false, false, false])
}

/// All five fingers extended
pub(crate) fn open_hand() -> HandBuilder {
    HandBuilder::new([true; 5])
}

/// Every finger curled
pub(crate) fn fist() -> HandBuilder {
    HandBuilder::new([false; 5])
}
