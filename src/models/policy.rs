use tch::{nn, no_grad, Device, Kind, Tensor};

use super::{BasePolicy, FCGaussianPolicy, FCSoftmaxPolicy};
use crate::config::PolicyConfig;
use crate::envs::ActionSpace;
use crate::misc::batch_states::batch_states;
use crate::prob_distributions::BaseDistribution;

/// Samples actions from, and scores actions under, a parametric policy.
///
/// The parameters themselves live in the `VarStore` the model was built
/// from; `Policy` only holds the network and the device it runs on.
pub struct Policy {
    model: Box<dyn BasePolicy>,
    device: Device,
}

impl Policy {
    pub fn new(model: Box<dyn BasePolicy>, device: Device) -> Self {
        Self { model, device }
    }

    /// Builds the network matching `action_space`: categorical for discrete
    /// spaces, Gaussian for boxes. Finite box bounds squash the mean.
    pub fn build(
        path: &nn::Path,
        observation_size: i64,
        action_space: &ActionSpace,
        config: &PolicyConfig,
    ) -> Self {
        let model: Box<dyn BasePolicy> = match action_space {
            ActionSpace::Discrete(n_actions) => Box::new(FCSoftmaxPolicy::new(
                path,
                observation_size,
                *n_actions,
                &config.hidden_sizes,
                config.min_prob,
            )),
            ActionSpace::Box { low, high } => {
                let finite = low.iter().chain(high.iter()).all(|v| v.is_finite());
                let bounds = finite.then(|| {
                    (
                        Tensor::from_slice(low).to_kind(Kind::Float),
                        Tensor::from_slice(high).to_kind(Kind::Float),
                    )
                });
                Box::new(FCGaussianPolicy::new(
                    path,
                    observation_size,
                    low.len() as i64,
                    &config.hidden_sizes,
                    bounds,
                    config.variance,
                ))
            }
        };
        Self::new(model, path.device())
    }

    pub fn device(&self) -> Device {
        self.device
    }

    /// Action distribution for a `[N, obs]` batch of states.
    pub fn distribution(&self, states: &Tensor) -> Box<dyn BaseDistribution> {
        let states = states.to_device(self.device).to_kind(Kind::Float);
        self.model.forward(&states)
    }

    /// Draws one action for a single state. No gradient is recorded.
    ///
    /// Discrete actions come back as a 0-d `Int64` tensor, continuous ones as
    /// a 1-d tensor of the action dimension, always on the CPU.
    pub fn act(&self, state: &Tensor) -> Tensor {
        no_grad(|| {
            let states = batch_states(&[state.shallow_clone()], self.device);
            self.distribution(&states)
                .sample()
                .squeeze_dim(0)
                .to_device(Device::Cpu)
        })
    }

    /// Most probable action for a single state.
    pub fn act_deterministically(&self, state: &Tensor) -> Tensor {
        no_grad(|| {
            let states = batch_states(&[state.shallow_clone()], self.device);
            self.distribution(&states)
                .most_probable()
                .squeeze_dim(0)
                .to_device(Device::Cpu)
        })
    }

    /// Log-probability of each action in the batch, shape `[N]`.
    ///
    /// Differentiable with respect to the network parameters.
    pub fn log_prob(&self, states: &Tensor, actions: &Tensor) -> Tensor {
        self.distribution(states)
            .log_prob(&actions.to_device(self.device))
    }
}
