//! Frame-rate gate applied by the session adapter before frames reach
//! the engine. The engine itself never rate-limits.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct FrameThrottle {
    min_interval: Duration,
    last_admitted: Option<Instant>,
}

impl FrameThrottle {
    /// Admit at most `frames_per_second` frames per second
    pub fn new(frames_per_second: f32) -> Self {
        let min_interval = if frames_per_second > 0.0 {
            // Rates too small to represent admit only the first frame
            Duration::try_from_secs_f32(1.0 / frames_per_second).unwrap_or(Duration::MAX)
        } else {
            Duration::ZERO
        };
        Self {
            min_interval,
            last_admitted: None,
        }
    }

    /// Whether a frame arriving at `now` should be forwarded
    pub fn admit(&mut self, now: Instant) -> bool {
        match self.last_admitted {
            Some(last) if now.saturating_duration_since(last) < self.min_interval => false,
            _ => {
                self.last_admitted = Some(now);
                true
            }
        }
    }
}
