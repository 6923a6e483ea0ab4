use crate::prob_distributions::BaseDistribution;
use tch::Tensor;

/// Parametric map from a batch of states to an action distribution.
pub trait BasePolicy {
    fn forward(&self, x: &Tensor) -> Box<dyn BaseDistribution>;
}
