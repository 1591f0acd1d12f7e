//! Configuration loading and management

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Slowest frame rate the throttle is configured for
const MIN_FRAME_RATE: f32 = 0.1;

/// Tunable thresholds for the gesture engine.
///
/// Constructed once and handed to the recognizer; nothing reads it from
/// global state, so independently configured engines can coexist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Joints at or below this confidence are discarded during extraction
    pub landmark_confidence_floor: f32,
    /// Maximum hands requested from the estimator per frame
    pub max_hands: usize,

    /// Minimum posture confidence to enter (and stay in) hovering
    pub posture_confidence_threshold: f32,
    /// Dwell time required before directional input is accepted
    pub hover_duration: Duration,
    /// Hover sampling cadence; also the posture re-check cadence while hovering
    pub hover_sample_interval: Duration,
    /// Centroid displacement still counted as a steady hover
    pub hover_stability_threshold: f32,
    /// Displacement beyond `stability * multiplier` restarts the hover
    pub hover_restart_multiplier: f32,

    /// Minimum tip-to-base distance for an extended finger
    pub min_extension_distance: f32,
    /// Minimum length of each inter-joint segment
    pub min_segment_length: f32,
    /// Maximum bending factor for an extended finger
    pub max_bending_factor: f32,
    /// Scales distance and segment thresholds for thumb and index
    pub relaxed_multiplier: f32,
    /// Scales the bending tolerance for middle, ring and little
    pub strict_multiplier: f32,
    /// Posture confidence when all five fingers match
    pub exact_match_confidence: f32,
    /// Scale applied to the matching fraction on a partial match
    pub partial_match_scale: f32,

    /// Index direction angles (degrees) read as "next step"
    pub next_step_angle_range: (f32, f32),
    /// Index direction angles (degrees) read as "previous step"
    pub previous_step_angle_range: (f32, f32),
    /// Curled middle/ring/little fingers required while pointing (0 = no gate)
    pub min_curled_for_pointing: usize,
    /// Motion trace displacement below which no coarse direction is reported
    pub motion_direction_min_distance: f32,

    /// Frames per second the session adapter forwards to the engine
    pub frame_rate_limit: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            landmark_confidence_floor: 0.3,
            max_hands: 2,
            posture_confidence_threshold: 0.5,
            hover_duration: Duration::from_millis(1000),
            hover_sample_interval: Duration::from_millis(100),
            hover_stability_threshold: 0.05,
            hover_restart_multiplier: 2.0,
            min_extension_distance: 0.08,
            min_segment_length: 0.01,
            max_bending_factor: 0.25,
            relaxed_multiplier: 0.6,
            strict_multiplier: 0.5,
            exact_match_confidence: 0.9,
            partial_match_scale: 0.6,
            next_step_angle_range: (-150.0, -30.0),
            previous_step_angle_range: (30.0, 150.0),
            min_curled_for_pointing: 0,
            motion_direction_min_distance: 0.02,
            frame_rate_limit: 15.0,
        }
    }
}

impl GestureConfig {
    /// Hover displacement that restarts the dwell clock
    pub fn hover_restart_threshold(&self) -> f32 {
        self.hover_stability_threshold * self.hover_restart_multiplier
    }

    /// Check that every threshold is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        unit_range("landmark_confidence_floor", self.landmark_confidence_floor)?;
        unit_range("posture_confidence_threshold", self.posture_confidence_threshold)?;
        unit_range("exact_match_confidence", self.exact_match_confidence)?;
        unit_range("partial_match_scale", self.partial_match_scale)?;

        if self.max_hands == 0 {
            return Err(ConfigError::Invalid("max_hands must be at least 1".into()));
        }
        if self.hover_duration.is_zero() || self.hover_sample_interval.is_zero() {
            return Err(ConfigError::Invalid(
                "hover durations must be non-zero".into(),
            ));
        }
        for (field, value) in [
            ("hover_stability_threshold", self.hover_stability_threshold),
            ("min_extension_distance", self.min_extension_distance),
            ("max_bending_factor", self.max_bending_factor),
            ("relaxed_multiplier", self.relaxed_multiplier),
            ("strict_multiplier", self.strict_multiplier),
        ] {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::OutOfRange {
                    field,
                    value,
                    expected: "> 0",
                });
            }
        }
        if self.frame_rate_limit.is_nan() || self.frame_rate_limit < MIN_FRAME_RATE {
            return Err(ConfigError::OutOfRange {
                field: "frame_rate_limit",
                value: self.frame_rate_limit,
                expected: ">= 0.1",
            });
        }
        if self.hover_restart_multiplier.is_nan() || self.hover_restart_multiplier < 1.0 {
            return Err(ConfigError::OutOfRange {
                field: "hover_restart_multiplier",
                value: self.hover_restart_multiplier,
                expected: ">= 1",
            });
        }
        for (field, (lo, hi)) in [
            ("next_step_angle_range", self.next_step_angle_range),
            ("previous_step_angle_range", self.previous_step_angle_range),
        ] {
            if lo >= hi {
                return Err(ConfigError::Invalid(format!(
                    "{field} is inverted: [{lo}, {hi}]"
                )));
            }
        }
        if self.min_curled_for_pointing > 3 {
            return Err(ConfigError::Invalid(
                "min_curled_for_pointing cannot exceed 3".into(),
            ));
        }
        Ok(())
    }
}

fn unit_range(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            expected: "0.0..=1.0",
        })
    }
}

/// Replay driver configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Recorded session to play back (JSON lines)
    pub recording_path: PathBuf,

    /// Engine thresholds
    pub gesture: GestureConfig,
}

impl Config {
    /// Load configuration from the command line and environment
    pub fn load() -> Result<Self> {
        let recording_path = std::env::args_os()
            .nth(1)
            .map(PathBuf::from)
            .context("usage: cookstep-gestures <recording.jsonl>")?;

        let mut gesture = GestureConfig::default();

        if let Ok(ms) = std::env::var("COOKSTEP_HOVER_MS") {
            let ms: u64 = ms.parse().context("COOKSTEP_HOVER_MS must be an integer")?;
            gesture.hover_duration = Duration::from_millis(ms);
        }
        if let Ok(fps) = std::env::var("COOKSTEP_FRAME_RATE") {
            gesture.frame_rate_limit = fps
                .parse()
                .context("COOKSTEP_FRAME_RATE must be a number")?;
        }

        gesture.validate()?;

        Ok(Self {
            recording_path,
            gesture,
        })
    }
}
