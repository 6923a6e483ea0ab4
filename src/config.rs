use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tch::Device;

use crate::error::ConfigError;

/// Where tensors and parameters live. Resolved once when an agent is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceConfig {
    #[default]
    Cpu,
    Cuda(usize),
    CudaIfAvailable,
}

impl DeviceConfig {
    pub fn device(self) -> Device {
        match self {
            DeviceConfig::Cpu => Device::Cpu,
            DeviceConfig::Cuda(index) => Device::Cuda(index),
            DeviceConfig::CudaIfAvailable => Device::cuda_if_available(),
        }
    }
}

/// Spread of the Gaussian policy used for continuous action spaces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarianceType {
    /// Constant variance, not trained.
    Fixed { var: f64 },
    /// One learned, state-dependent variance shared by every action dimension.
    Spherical { min_var: f64 },
    /// One learned, state-dependent variance per action dimension.
    Diagonal { min_var: f64 },
}

impl Default for VarianceType {
    fn default() -> Self {
        VarianceType::Diagonal { min_var: 1e-2 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub hidden_sizes: Vec<i64>,
    /// Probability floor of every discrete action.
    pub min_prob: f64,
    pub variance: VarianceType,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            hidden_sizes: vec![32],
            min_prob: 0.0,
            variance: VarianceType::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    pub total_epochs: usize,
    /// Minimum environment steps collected per epoch. The last episode is
    /// always played to its end, so an epoch may run slightly longer.
    pub steps_per_epoch: usize,
    /// Step budget per episode. Reaching it cuts the episode short
    /// (`completed = false`).
    pub max_episode_len: Option<usize>,
    pub learning_rate: f64,
    pub device: DeviceConfig,
    pub seed: Option<i64>,
    pub policy: PolicyConfig,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            total_epochs: 50,
            steps_per_epoch: 5000,
            max_episode_len: None,
            learning_rate: 1e-2,
            device: DeviceConfig::default(),
            seed: None,
            policy: PolicyConfig::default(),
        }
    }
}

impl TrainerConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: TrainerConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.steps_per_epoch == 0 {
            return Err(invalid("steps_per_epoch", "must be at least 1"));
        }
        if self.max_episode_len == Some(0) {
            return Err(invalid("max_episode_len", "must be at least 1 when set"));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(invalid(
                "learning_rate",
                format!("must be a positive number, got {}", self.learning_rate),
            ));
        }
        if self.policy.hidden_sizes.iter().any(|&n| n <= 0) {
            return Err(invalid("policy.hidden_sizes", "layer sizes must be positive"));
        }
        if !(0.0..1.0).contains(&self.policy.min_prob) {
            return Err(invalid("policy.min_prob", "must be in [0, 1)"));
        }
        match self.policy.variance {
            VarianceType::Fixed { var } if var <= 0.0 => {
                Err(invalid("policy.variance.var", "must be positive"))
            }
            VarianceType::Spherical { min_var } | VarianceType::Diagonal { min_var }
                if min_var < 0.0 =>
            {
                Err(invalid("policy.variance.min_var", "must not be negative"))
            }
            _ => Ok(()),
        }
    }
}

fn invalid(field: &'static str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = TrainerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.device.device(), Device::Cpu);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: TrainerConfig = serde_json::from_str(
            r#"{
                "steps_per_epoch": 200,
                "device": {"cuda": 1},
                "policy": {"variance": {"fixed": {"var": 0.5}}}
            }"#,
        )
        .unwrap();

        assert_eq!(config.steps_per_epoch, 200);
        assert_eq!(config.total_epochs, 50);
        assert_eq!(config.device, DeviceConfig::Cuda(1));
        assert_eq!(config.policy.hidden_sizes, vec![32]);
        assert_eq!(config.policy.variance, VarianceType::Fixed { var: 0.5 });
    }

    #[test]
    fn test_device_names() {
        let device: DeviceConfig = serde_json::from_str(r#""cuda_if_available""#).unwrap();
        assert_eq!(device, DeviceConfig::CudaIfAvailable);
        let device: DeviceConfig = serde_json::from_str(r#""cpu""#).unwrap();
        assert_eq!(device, DeviceConfig::Cpu);
    }

    #[test]
    fn test_zero_steps_per_epoch_is_rejected() {
        let config = TrainerConfig {
            steps_per_epoch: 0,
            ..TrainerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "steps_per_epoch",
                ..
            })
        ));
    }

    #[test]
    fn test_bad_learning_rate_and_variance_are_rejected() {
        let config = TrainerConfig {
            learning_rate: -1.0,
            ..TrainerConfig::default()
        };
        assert!(config.validate().is_err());

        let mut config = TrainerConfig::default();
        config.policy.variance = VarianceType::Fixed { var: 0.0 };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_file() {
        let path = std::env::temp_dir().join(format!("policygrad-{}.json", ulid::Ulid::new()));
        fs::write(&path, r#"{"total_epochs": 3, "max_episode_len": 200}"#).unwrap();

        let config = TrainerConfig::from_json_file(&path).unwrap();
        assert_eq!(config.total_epochs, 3);
        assert_eq!(config.max_episode_len, Some(200));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = TrainerConfig::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
