//! Auxiliary motion trace while waiting for a pointing gesture
//!
//! Recognition is decided by the instantaneous pointing direction; this
//! trace only records how the hand moved for diagnostics.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::landmarks::Point;

/// Coarse direction of travel since tracking started
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionDirection {
    #[default]
    None,
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MotionTrackingState {
    pub start_position: Point,
    pub current_position: Point,
    /// Instantaneous speed in normalized units per second
    pub velocity: f32,
    pub direction: MotionDirection,
    /// Straight-line distance from the start position
    pub distance: f32,
    pub started_at: Instant,
    last_update: Instant,
}

impl MotionTrackingState {
    pub fn begin(now: Instant, position: Point) -> Self {
        Self {
            start_position: position,
            current_position: position,
            velocity: 0.0,
            direction: MotionDirection::None,
            distance: 0.0,
            started_at: now,
            last_update: now,
        }
    }

    pub fn update(&mut self, now: Instant, position: Point, min_distance: f32) {
        let dt = now.saturating_duration_since(self.last_update).as_secs_f32();
        if dt > 0.0 {
            self.velocity = self.current_position.distance(&position) / dt;
        }
        self.current_position = position;
        self.last_update = now;

        let delta = position.sub(&self.start_position);
        self.distance = delta.length();
        self.direction = if self.distance < min_distance {
            MotionDirection::None
        } else if delta.x.abs() > delta.y.abs() {
            if delta.x > 0.0 {
                MotionDirection::Right
            } else {
                MotionDirection::Left
            }
        } else if delta.y > 0.0 {
            // y grows downward on screen
            MotionDirection::Down
        } else {
            MotionDirection::Up
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_tracks_direction_and_velocity() {
        let t0 = Instant::now();
        let mut motion = MotionTrackingState::begin(t0, Point::new(0.5, 0.5));

        motion.update(t0 + Duration::from_millis(500), Point::new(0.5, 0.4), 0.02);
        assert_eq!(motion.direction, MotionDirection::Up);
        assert!((motion.distance - 0.1).abs() < 1e-5);
        assert!((motion.velocity - 0.2).abs() < 1e-4);

        motion.update(t0 + Duration::from_millis(1000), Point::new(0.7, 0.45), 0.02);
        assert_eq!(motion.direction, MotionDirection::Right);
    }

    #[test]
    fn test_small_motion_has_no_direction() {
        let t0 = Instant::now();
        let mut motion = MotionTrackingState::begin(t0, Point::new(0.5, 0.5));
        motion.update(t0 + Duration::from_millis(100), Point::new(0.51, 0.5), 0.02);
        assert_eq!(motion.direction, MotionDirection::None);
    }
}
