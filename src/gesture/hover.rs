//! Hover dwell tracking
//!
//! While hovering, the hand centroid is sampled at a fixed cadence. Small
//! jitter keeps the dwell clock running from the original start; a large
//! move restarts it.

use std::time::{Duration, Instant};

use crate::config::GestureConfig;
use crate::landmarks::Point;

/// Outcome of one hover sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverSample {
    /// Within the stability threshold
    Stable,
    /// Between the stability and restart thresholds; still counts toward
    /// the dwell but is not recorded as stable
    Unsteady,
    /// Beyond the restart threshold; dwell starts over from here
    Restarted,
}

/// Dwell state for the current hover
#[derive(Debug, Clone, PartialEq)]
pub struct HoverState {
    pub started_at: Instant,
    pub start_centroid: Point,
    pub current_centroid: Point,
    pub is_stable: bool,
    pub duration: Duration,
}

impl HoverState {
    pub fn begin(now: Instant, centroid: Point) -> Self {
        Self {
            started_at: now,
            start_centroid: centroid,
            current_centroid: centroid,
            is_stable: true,
            duration: Duration::ZERO,
        }
    }

    /// Record a centroid sample taken at `now`
    pub fn sample(&mut self, now: Instant, centroid: Point, config: &GestureConfig) -> HoverSample {
        self.current_centroid = centroid;
        let displacement = self.start_centroid.distance(&centroid);

        if displacement > config.hover_restart_threshold() {
            *self = Self::begin(now, centroid);
            return HoverSample::Restarted;
        }

        self.duration = now.saturating_duration_since(self.started_at);
        self.is_stable = displacement <= config.hover_stability_threshold;
        if self.is_stable {
            HoverSample::Stable
        } else {
            HoverSample::Unsteady
        }
    }

    /// Fraction of `target` dwelled so far, clamped to 1.0
    pub fn progress(&self, target: Duration) -> f32 {
        if target.is_zero() {
            return 1.0;
        }
        (self.duration.as_secs_f32() / target.as_secs_f32()).min(1.0)
    }

    pub fn is_complete(&self, target: Duration) -> bool {
        self.duration >= target
    }
}
