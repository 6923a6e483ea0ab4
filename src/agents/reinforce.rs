use std::path::Path;

use tch::Tensor;

use super::base_agent::TrainableAgent;
use super::policy_gradient::{EpochStats, EvalStats, PolicyGradientCore, ReturnSignal};
use crate::config::TrainerConfig;
use crate::envs::Environment;
use crate::error::Result;

/// REINFORCE with rewards-to-go: each step is weighted only by the rewards
/// that follow it, so actions are not credited for what came before them.
pub struct REINFORCE {
    core: PolicyGradientCore,
}

impl REINFORCE {
    pub fn new(env: Box<dyn Environment>, config: TrainerConfig) -> Result<Self> {
        Ok(Self {
            core: PolicyGradientCore::new(env, config)?,
        })
    }

    pub fn core(&self) -> &PolicyGradientCore {
        &self.core
    }
}

impl TrainableAgent for REINFORCE {
    fn train(&mut self, total_epochs: usize, steps_per_epoch: usize) -> Result<Vec<EpochStats>> {
        self.core.start_clock();
        let mut history = Vec::with_capacity(total_epochs);
        for epoch in 0..total_epochs {
            history.push(
                self.core
                    .train_epoch(epoch, steps_per_epoch, ReturnSignal::RewardsToGo)?,
            );
        }
        Ok(history)
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
