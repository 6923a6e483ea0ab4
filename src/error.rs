use std::path::PathBuf;

use thiserror::Error;

/// Misuse of the episode / replay buffer bookkeeping.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MemoryError {
    /// The episode is in the wrong lifecycle state for the operation.
    #[error("invalid episode state: {0}")]
    InvalidState(&'static str),

    /// A buffer operation needed an open episode and there was none.
    #[error("no active episode in the replay buffer")]
    NoActiveEpisode,
}

/// Errors raised while loading or validating a [`TrainerConfig`](crate::config::TrainerConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid value for {field}: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },
}

/// Top-level error type for training and evaluation.
#[derive(Debug, Error)]
pub enum TrainError {
    #[error(transparent)]
    Memory(#[from] MemoryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A policy-gradient loss was requested for a batch without experiences.
    #[error("cannot build a policy-gradient loss from an empty batch")]
    EmptyBatch,

    #[error("torch error: {0}")]
    Torch(#[from] tch::TchError),

    /// Failures raised by the environment are passed through untouched.
    #[error(transparent)]
    Environment(#[from] anyhow::Error),
}

pub type Result<T, E = TrainError> = std::result::Result<T, E>;
