use std::path::Path;

use tch::Tensor;

use super::base_agent::TrainableAgent;
use super::policy_gradient::{EpochStats, EvalStats, PolicyGradientCore, ReturnSignal};
use crate::config::TrainerConfig;
use crate::envs::Environment;
use crate::error::Result;

/// Vanilla policy gradient: every step of an episode is weighted by the
/// episode's total reward.
pub struct SimpleGradient {
    core: PolicyGradientCore,
}

impl SimpleGradient {
    pub fn new(env: Box<dyn Environment>, config: TrainerConfig) -> Result<Self> {
        Ok(Self {
            core: PolicyGradientCore::new(env, config)?,
        })
    }

    pub fn core(&self) -> &PolicyGradientCore {
        &self.core
    }
}

impl TrainableAgent for SimpleGradient {
    fn train(&mut self, total_epochs: usize, steps_per_epoch: usize) -> Result<Vec<EpochStats>> {
        self.core.start_clock();
        (0..total_epochs)
            .map(|epoch| {
                self.core
                    .train_epoch(epoch, steps_per_epoch, ReturnSignal::EpisodeReturn)
            })
            .collect()
    }

    fn eval(&mut self, total_steps: usize) -> Result<EvalStats> {
        self.core.eval(total_steps)
    }

    fn act(&self, obs: &Tensor) -> Tensor {
        self.core.act(obs)
    }

    fn config(&self) -> &TrainerConfig {
        self.core.config()
    }

    fn save(&self, path: &Path) -> Result<()> {
        self.core.save(path)
    }

    fn load(&mut self, path: &Path) -> Result<()> {
        self.core.load(path)
    }
}
