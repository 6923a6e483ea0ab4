use super::base_policy_network::BasePolicy;

use crate::config::VarianceType;
use crate::misc::weight_initializer::{he_init, xavier_init};
use crate::models::Mlp;
use crate::prob_distributions::{BaseDistribution, GaussianDistribution};
use tch::nn::{self, Init, Linear, LinearConfig, Module};
use tch::Tensor;

enum Spread {
    Fixed(f64),
    Learned { var_layer: Linear, min_var: f64 },
}

/// Diagonal Gaussian policy for continuous action spaces.
///
/// The mean comes from a linear head on the MLP trunk, optionally squashed by
/// `tanh` into `[min_action, max_action]`. The variance is either a constant
/// or a softplus head on the trunk (one value for all dimensions when
/// spherical, one per dimension when diagonal) floored by `min_var`.
pub struct FCGaussianPolicy {
    trunk: Mlp,
    mean_layer: Linear,
    spread: Spread,
    bounds: Option<(Tensor, Tensor)>,
}

impl FCGaussianPolicy {
    pub fn new(
        path: &nn::Path,
        n_input_channels: i64,
        action_size: i64,
        hidden_sizes: &[i64],
        bounds: Option<(Tensor, Tensor)>,
        variance: VarianceType,
    ) -> Self {
        let trunk = Mlp::new(&(path / "trunk"), n_input_channels, hidden_sizes);
        let n_hidden_channels = trunk.n_output_channels();

        let mean_layer = nn::linear(
            path / "mean",
            n_hidden_channels,
            action_size,
            LinearConfig {
                ws_init: xavier_init(n_hidden_channels, action_size),
                bs_init: Some(Init::Const(0.0)),
                bias: true,
            },
        );

        let learned_var = |var_size: i64, min_var: f64| Spread::Learned {
            var_layer: nn::linear(
                path / "var",
                n_hidden_channels,
                var_size,
                LinearConfig {
                    ws_init: he_init(n_hidden_channels),
                    bs_init: Some(Init::Const(0.0)),
                    bias: true,
                },
            ),
            min_var,
        };
        let spread = match variance {
            VarianceType::Fixed { var } => Spread::Fixed(var),
            VarianceType::Spherical { min_var } => learned_var(1, min_var),
            VarianceType::Diagonal { min_var } => learned_var(action_size, min_var),
        };

        let device = path.device();
        let bounds = bounds.map(|(min_action, max_action)| {
            (min_action.to_device(device), max_action.to_device(device))
        });

        FCGaussianPolicy {
            trunk,
            mean_layer,
            spread,
            bounds,
        }
    }

    fn compute_mean_and_var(&self, h: &Tensor) -> (Tensor, Tensor) {
        let mean = self.mean_layer.forward(h);
        let mean = match &self.bounds {
            Some((min_action, max_action)) => bound_by_tanh(&mean, min_action, max_action),
            None => mean,
        };
        let var = match &self.spread {
            Spread::Fixed(var) => mean.ones_like() * *var,
            Spread::Learned { var_layer, min_var } => {
                (var_layer.forward(h).softplus() + *min_var).expand_as(&mean)
            }
        };
        (mean, var)
    }
}

fn bound_by_tanh(x: &Tensor, min_action: &Tensor, max_action: &Tensor) -> Tensor {
    let scale = (max_action - min_action) / 2.0;
    let center = (max_action + min_action) / 2.0;
    x.tanh() * scale + center
}

impl BasePolicy for FCGaussianPolicy {
    fn forward(&self, x: &Tensor) -> Box<dyn BaseDistribution> {
        let h = self.trunk.forward(x);
        let (mean, var) = self.compute_mean_and_var(&h);
        Box::new(GaussianDistribution::new(mean, var))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tch::{Device, Kind};

    fn input(n: i64) -> Tensor {
        Tensor::rand([n, 3], (Kind::Float, Device::Cpu)) * 10.0
    }

    #[test]
    fn test_forward_diagonal() {
        let vs = nn::VarStore::new(Device::Cpu);
        let policy = FCGaussianPolicy::new(
            &vs.root(),
            3,
            2,
            &[16],
            None,
            VarianceType::Diagonal { min_var: 0.1 },
        );

        let distrib = policy.forward(&input(5));
        let (mean, var) = distrib.params();
        assert_eq!(mean.size(), vec![5, 2]);
        assert_eq!(var.size(), vec![5, 2]);
        assert!(var.min().double_value(&[]) >= 0.1 - 1e-6);
        assert_eq!(distrib.sample().size(), vec![5, 2]);
        assert_eq!(distrib.log_prob(&distrib.sample()).size(), vec![5]);
    }

    #[test]
    fn test_spherical_variance_is_shared() {
        let vs = nn::VarStore::new(Device::Cpu);
        let policy = FCGaussianPolicy::new(
            &vs.root(),
            3,
            4,
            &[8],
            None,
            VarianceType::Spherical { min_var: 0.0 },
        );

        let distrib = policy.forward(&input(2));
        let (_, var) = distrib.params();
        assert_eq!(var.size(), vec![2, 4]);
        for row in 0..2 {
            let first = var.double_value(&[row, 0]);
            for col in 1..4 {
                assert!((var.double_value(&[row, col]) - first).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_fixed_variance() {
        let vs = nn::VarStore::new(Device::Cpu);
        let policy = FCGaussianPolicy::new(
            &vs.root(),
            3,
            1,
            &[8],
            None,
            VarianceType::Fixed { var: 0.25 },
        );

        let distrib = policy.forward(&input(3));
        let (_, var) = distrib.params();
        assert!((var.min().double_value(&[]) - 0.25).abs() < 1e-6);
        assert!((var.max().double_value(&[]) - 0.25).abs() < 1e-6);
        // trunk (2) + mean head (2), no variance head
        assert_eq!(vs.trainable_variables().len(), 4);
    }

    #[test]
    fn test_bounded_mean() {
        let vs = nn::VarStore::new(Device::Cpu);
        let bounds = (
            Tensor::from_slice(&[-2.0f32]),
            Tensor::from_slice(&[2.0f32]),
        );
        let policy = FCGaussianPolicy::new(
            &vs.root(),
            3,
            1,
            &[8],
            Some(bounds),
            VarianceType::default(),
        );

        let distrib = policy.forward(&(input(50) * 100.0));
        let (mean, _) = distrib.params();
        assert!(mean.max().double_value(&[]) <= 2.0);
        assert!(mean.min().double_value(&[]) >= -2.0);
    }

    #[test]
    fn test_bound_by_tanh() {
        let x = Tensor::from_slice(&[0.0f32, 100.0, -100.0]).view([3, 1]);
        let bounded = bound_by_tanh(
            &x,
            &Tensor::from_slice(&[1.0f32]),
            &Tensor::from_slice(&[3.0f32]),
        );
        assert!((bounded.double_value(&[0, 0]) - 2.0).abs() < 1e-6);
        assert!((bounded.double_value(&[1, 0]) - 3.0).abs() < 1e-6);
        assert!((bounded.double_value(&[2, 0]) - 1.0).abs() < 1e-6);
    }
}
