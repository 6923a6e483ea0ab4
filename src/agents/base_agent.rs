use std::path::Path;

use tch::Tensor;

use super::policy_gradient::{EpochStats, EvalStats};
use crate::config::TrainerConfig;
use crate::error::Result;

/// Common interface of every training algorithm.
pub trait TrainableAgent {
    /// Runs `total_epochs` rounds of collection, update and flush.
    fn train(&mut self, total_epochs: usize, steps_per_epoch: usize) -> Result<Vec<EpochStats>>;
    /// Plays the current policy greedily for `total_steps` steps without learning.
    fn eval(&mut self, total_steps: usize) -> Result<EvalStats>;
    /// Samples an action for a single observation.
    fn act(&self, obs: &Tensor) -> Tensor;
    fn config(&self) -> &TrainerConfig;
    fn save(&self, path: &Path) -> Result<()>;
    fn load(&mut self, path: &Path) -> Result<()>;

    /// Trains for the epoch count and epoch size given by the configuration.
    fn train_configured(&mut self) -> Result<Vec<EpochStats>> {
        let (total_epochs, steps_per_epoch) =
            (self.config().total_epochs, self.config().steps_per_epoch);
        self.train(total_epochs, steps_per_epoch)
    }
}
