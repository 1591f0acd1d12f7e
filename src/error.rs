//! Error types shared across the engine

use thiserror::Error;

/// Failures reported by a pose estimator for a single frame
#[derive(Debug, Clone, Error)]
pub enum EstimationError {
    #[error("hand pose estimation failed: {0}")]
    Failed(String),

    #[error("frame cannot be processed: {0}")]
    InvalidFrame(String),
}

/// Rejected configuration values
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("{field} = {value} is out of range (expected {expected})")]
    OutOfRange {
        field: &'static str,
        value: f32,
        expected: &'static str,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Errors from the engine control surface
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to spawn perception worker: {0}")]
    WorkerSpawn(String),

    #[error("perception worker has stopped")]
    WorkerStopped,

    #[error("engine has been shut down")]
    AlreadyShutDown,
}

/// Errors loading a recorded session
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to read recording: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("recording contains no frames")]
    Empty,
}
