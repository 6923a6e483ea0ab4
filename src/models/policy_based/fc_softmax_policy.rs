use super::base_policy_network::BasePolicy;

use crate::misc::weight_initializer::he_init;
use crate::models::Mlp;
use crate::prob_distributions::{BaseDistribution, SoftmaxDistribution};
use tch::nn::{self, Init, Linear, LinearConfig, Module};
use tch::Tensor;

/// Categorical policy for discrete action spaces: MLP trunk plus a linear
/// logits head.
pub struct FCSoftmaxPolicy {
    trunk: Mlp,
    logits_layer: Linear,
    min_prob: f64,
}

impl FCSoftmaxPolicy {
    pub fn new(
        path: &nn::Path,
        n_input_channels: i64,
        n_actions: i64,
        hidden_sizes: &[i64],
        min_prob: f64,
    ) -> Self {
        let trunk = Mlp::new(&(path / "trunk"), n_input_channels, hidden_sizes);
        let n_hidden_channels = trunk.n_output_channels();
        let logits_layer = nn::linear(
            path / "logits",
            n_hidden_channels,
            n_actions,
            LinearConfig {
                ws_init: he_init(n_hidden_channels),
                bs_init: Some(Init::Const(0.0)),
                bias: true,
            },
        );

        FCSoftmaxPolicy {
            trunk,
            logits_layer,
            min_prob,
        }
    }

    pub fn logits(&self, x: &Tensor) -> Tensor {
        self.logits_layer.forward(&self.trunk.forward(x))
    }
}

impl BasePolicy for FCSoftmaxPolicy {
    fn forward(&self, x: &Tensor) -> Box<dyn BaseDistribution> {
        Box::new(SoftmaxDistribution::new(self.logits(x), 1.0, self.min_prob))
    }
}
