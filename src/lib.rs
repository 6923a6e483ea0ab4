mod misc;

pub mod agents;
pub mod config;
pub mod envs;
pub mod error;
pub mod memory;
pub mod models;
pub mod prob_distributions;

#[cfg(test)]
mod test_utils;

pub use config::TrainerConfig;
pub use error::{MemoryError, Result, TrainError};
