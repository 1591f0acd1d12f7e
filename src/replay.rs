//! Recorded-session playback
//!
//! A recording is JSON lines, one estimator result per frame:
//!
//! ```text
//! {"timestamp_ms": 0, "hands": [{"chirality": "right", "confidence": 0.9,
//!   "joints": {"wrist": {"x": 0.5, "y": 0.3, "confidence": 0.9}, ...}}]}
//! {"timestamp_ms": 66, "error": "vision request failed"}
//! ```
//!
//! Coordinates are in estimator space (bottom-left origin).

use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{EstimationError, ReplayError};
use crate::intake::{Frame, HandObservation, HandPoseRequest, PoseEstimator};

/// One recorded estimator result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    /// Offset from the start of the recording
    pub timestamp_ms: u64,
    #[serde(default)]
    pub hands: Vec<HandObservation>,
    /// Simulated estimator failure for this frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RecordedFrame {
    pub fn offset(&self) -> Duration {
        Duration::from_millis(self.timestamp_ms)
    }
}

/// A loaded recording, ordered by timestamp
#[derive(Debug, Clone)]
pub struct Recording {
    frames: Arc<Vec<RecordedFrame>>,
}

impl Recording {
    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let file = std::fs::File::open(path)?;
        let recording = Self::parse(std::io::BufReader::new(file))?;
        info!(?path, frames = recording.len(), "recording loaded");
        Ok(recording)
    }

    /// Parse JSON lines. Blank lines and `#` comments are skipped.
    pub fn parse<R: BufRead>(reader: R) -> Result<Self, ReplayError> {
        let mut frames = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let frame: RecordedFrame = serde_json::from_str(trimmed).map_err(|source| {
                ReplayError::Parse {
                    line: index + 1,
                    source,
                }
            })?;
            frames.push(frame);
        }

        if frames.is_empty() {
            return Err(ReplayError::Empty);
        }
        frames.sort_by_key(|f| f.timestamp_ms);

        Ok(Self {
            frames: Arc::new(frames),
        })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[RecordedFrame] {
        &self.frames
    }

    /// Estimator that answers each frame from this recording by sequence
    pub fn estimator(&self) -> ReplayEstimator {
        ReplayEstimator {
            frames: Arc::clone(&self.frames),
        }
    }
}

/// Pose estimator backed by a recording; frame `n` gets recorded result `n`
#[derive(Debug, Clone)]
pub struct ReplayEstimator {
    frames: Arc<Vec<RecordedFrame>>,
}

impl PoseEstimator for ReplayEstimator {
    fn estimate(
        &self,
        frame: &Frame,
        request: &HandPoseRequest,
    ) -> Result<Vec<HandObservation>, EstimationError> {
        let recorded = usize::try_from(frame.sequence)
            .ok()
            .and_then(|i| self.frames.get(i))
            .ok_or_else(|| {
                EstimationError::InvalidFrame(format!("no recorded frame {}", frame.sequence))
            })?;

        if let Some(message) = &recorded.error {
            return Err(EstimationError::Failed(message.clone()));
        }

        Ok(recorded.hands.iter().take(request.max_hands).cloned().collect())
    }
}
