use super::base_distribution::BaseDistribution;
use tch::{Kind, Tensor};

/// Diagonal Gaussian over the last dimension of `mean`.
pub struct GaussianDistribution {
    mean: Tensor,
    var: Tensor,
    ln_var: Tensor,
}

impl GaussianDistribution {
    pub fn new(mean: Tensor, var: Tensor) -> Self {
        assert_eq!(mean.size(), var.size(), "mean and var must have same shape");
        let ln_var = var.log();
        GaussianDistribution { mean, var, ln_var }
    }
}

impl BaseDistribution for GaussianDistribution {
    fn params(&self) -> (&Tensor, &Tensor) {
        (&self.mean, &self.var)
    }

    fn entropy(&self) -> Tensor {
        let dim = self.mean.size()[1];
        let log_term = 0.5 * ((2.0 * std::f64::consts::PI).ln() + 1.0);
        log_term * dim as f64
            + 0.5 * self.ln_var.sum_dim_intlist(-1, false, Kind::Float)
    }

    fn sample(&self) -> Tensor {
        let std = self.var.sqrt();
        let noise = Tensor::randn_like(&self.mean);
        &self.mean + &std * noise
    }

    fn log_prob(&self, x: &Tensor) -> Tensor {
        let diff = (x - &self.mean).pow_tensor_scalar(2.0);
        let eltwise_log_prob: Tensor =
            -0.5 * ((2.0 * std::f64::consts::PI).ln() + &self.ln_var + diff / &self.var);
        eltwise_log_prob.sum_dim_intlist(-1, false, Kind::Float)
    }

    fn most_probable(&self) -> Tensor {
        self.mean.shallow_clone()
    }
}
