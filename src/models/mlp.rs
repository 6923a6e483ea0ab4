use tch::nn::{self, Init, Linear, LinearConfig, Module};
use tch::Tensor;

use crate::misc::weight_initializer::he_init;

/// Fully connected ReLU trunk shared by the policy heads.
///
/// With no hidden layers it is the identity (after flattening to
/// `[-1, n_input_channels]`).
#[derive(Debug)]
pub struct Mlp {
    layers: Vec<Linear>,
    n_input_channels: i64,
    n_output_channels: i64,
}

impl Mlp {
    pub fn new(path: &nn::Path, n_input_channels: i64, hidden_sizes: &[i64]) -> Self {
        let mut layers = Vec::with_capacity(hidden_sizes.len());
        let mut n_in = n_input_channels;
        for (i, &n_out) in hidden_sizes.iter().enumerate() {
            layers.push(nn::linear(
                path / format!("hidden_{i}"),
                n_in,
                n_out,
                LinearConfig {
                    ws_init: he_init(n_in),
                    bs_init: Some(Init::Const(0.0)),
                    bias: true,
                },
            ));
            n_in = n_out;
        }

        Mlp {
            layers,
            n_input_channels,
            n_output_channels: n_in,
        }
    }

    pub fn n_output_channels(&self) -> i64 {
        self.n_output_channels
    }
}

impl Module for Mlp {
    fn forward(&self, x: &Tensor) -> Tensor {
        let mut h = x.view([-1, self.n_input_channels]);
        for layer in &self.layers {
            h = layer.forward(&h).relu();
        }
        h
    }
}
