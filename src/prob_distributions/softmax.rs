use super::base_distribution::BaseDistribution;
use tch::{Kind, Tensor};

/// Categorical distribution over the last dimension of `logits`.
///
/// `min_prob` mixes in a uniform floor so that every action keeps at least
/// that probability.
pub struct SoftmaxDistribution {
    logits: Tensor,
    beta: f64,
    min_prob: f64,
    n: f64,
}

impl SoftmaxDistribution {
    pub fn new(logits: Tensor, beta: f64, min_prob: f64) -> Self {
        let n = logits.size()[1] as f64;
        assert!(min_prob * n <= 1.0, "Invalid min_prob value");
        Self {
            logits,
            beta,
            min_prob,
            n,
        }
    }

    fn all_prob(&self) -> Tensor {
        let scaled_logits = &self.logits * self.beta;
        if self.min_prob > 0.0 {
            let softmax = scaled_logits.softmax(-1, Kind::Float);
            softmax * (1.0 - self.min_prob * self.n) + self.min_prob
        } else {
            scaled_logits.softmax(-1, Kind::Float)
        }
    }

    fn all_log_prob(&self) -> Tensor {
        if self.min_prob > 0.0 {
            self.all_prob().log()
        } else {
            (&self.logits * self.beta).log_softmax(-1, Kind::Float)
        }
    }
}

impl BaseDistribution for SoftmaxDistribution {
    fn params(&self) -> (&Tensor, &Tensor) {
        (&self.logits, &self.logits)
    }

    fn entropy(&self) -> Tensor {
        -(&self.all_prob() * self.all_log_prob()).sum_dim_intlist(-1, false, Kind::Float)
    }

    fn sample(&self) -> Tensor {
        self.all_prob().multinomial(1, true).squeeze_dim(-1)
    }

    fn log_prob(&self, x: &Tensor) -> Tensor {
        let index = x.to_kind(Kind::Int64).view([-1, 1]);
        self.all_log_prob().gather(-1, &index, false).squeeze_dim(-1)
    }

    fn most_probable(&self) -> Tensor {
        self.all_prob().argmax(-1, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logits_1234() -> Tensor {
        Tensor::from_slice(&[1.0, 2.0, 3.0, 4.0]).reshape([1, 4])
    }

    #[test]
    fn test_all_prob() {
        let dist = SoftmaxDistribution::new(logits_1234(), 1.0, 0.0);

        // Test probabilities sum to 1
        let all_prob = dist.all_prob();
        assert!((all_prob.sum(Kind::Float).double_value(&[]) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_all_prob_with_min_prob() {
        let min_prob = 0.1;
        let dist = SoftmaxDistribution::new(logits_1234(), 1.0, min_prob);

        // Ensure minimum probability constraint is applied
        let all_prob = dist.all_prob();
        let min_val = all_prob.min().double_value(&[]);
        assert!(min_val >= min_prob - 1e-6);
        assert!((all_prob.sum(Kind::Float).double_value(&[]) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_sample() {
        let dist = SoftmaxDistribution::new(logits_1234(), 1.0, 0.0);
        let sample = dist.sample();
        assert_eq!(sample.size(), [1]);
        assert_eq!(sample.kind(), Kind::Int64);
        let value = sample.int64_value(&[0]);
        assert!((0..=3).contains(&value));
    }

    #[test]
    fn test_sample_follows_dominant_logit() {
        let logits = Tensor::from_slice(&[0.0, 50.0, 0.0]).reshape([1, 3]);
        let dist = SoftmaxDistribution::new(logits, 1.0, 0.0);
        for _ in 0..20 {
            assert_eq!(dist.sample().int64_value(&[0]), 1);
        }
    }

    #[test]
    fn test_log_prob() {
        let dist = SoftmaxDistribution::new(logits_1234(), 1.0, 0.0);
        let expected = [-3.440189702, -2.440189702, -1.440189702, -0.440189702];
        for (action, expected_log_prob) in expected.iter().enumerate() {
            let log_prob = dist.log_prob(&Tensor::from_slice(&[action as i64]).reshape([1, 1]));
            assert!((log_prob.double_value(&[0]) - expected_log_prob).abs() < 1e-6);
        }
    }

    #[test]
    fn test_log_prob_batch() {
        let logits = Tensor::from_slice(&[1.0, 2.0, 3.0, 4.0, 4.0, 3.0, 2.0, 1.0]).reshape([2, 4]);
        let dist = SoftmaxDistribution::new(logits, 1.0, 0.0);
        let actions = Tensor::from_slice(&[3i64, 3]);

        let log_prob = dist.log_prob(&actions);
        assert_eq!(log_prob.size(), [2]);
        assert!((log_prob.double_value(&[0]) - (-0.440189702)).abs() < 1e-6);
        assert!((log_prob.double_value(&[1]) - (-3.440189702)).abs() < 1e-6);
    }

    #[test]
    fn test_log_prob_is_differentiable() {
        let logits = Tensor::from_slice(&[0.5f32, -0.5]).reshape([1, 2]).set_requires_grad(true);
        let dist = SoftmaxDistribution::new(logits.shallow_clone(), 1.0, 0.0);
        let log_prob = dist.log_prob(&Tensor::from_slice(&[0i64]));
        log_prob.sum(Kind::Float).backward();

        let grad = logits.grad();
        // d/dz0 log softmax(z)_0 = 1 - p0, d/dz1 = -p1
        assert!(grad.double_value(&[0, 0]) > 0.0);
        assert!(grad.double_value(&[0, 1]) < 0.0);
    }

    #[test]
    fn test_entropy() {
        let dist = SoftmaxDistribution::new(logits_1234(), 1.0, 0.0);
        let entropy = dist.entropy();
        assert!(entropy.double_value(&[0]) >= 0.0);
        assert!((entropy.double_value(&[0]) - 0.947536964).abs() < 1e-6)
    }

    #[test]
    fn test_most_probable() {
        let dist = SoftmaxDistribution::new(logits_1234(), 1.0, 0.0);
        assert_eq!(dist.most_probable().int64_value(&[0]), 3);

        let logits = Tensor::from_slice(&[1.0, 3.5, 1.0, 2.0]).reshape([1, 4]);
        let dist = SoftmaxDistribution::new(logits, 1.0, 0.1);
        assert_eq!(dist.most_probable().int64_value(&[0]), 1);

        let logits = Tensor::from_slice(&[5.1, 3.5, 5.0, 4.0]).reshape([1, 4]);
        let dist = SoftmaxDistribution::new(logits, 1.5, 0.0);
        assert_eq!(dist.most_probable().int64_value(&[0]), 0);
    }

    #[test]
    fn test_invalid_min_prob() {
        let result = std::panic::catch_unwind(|| {
            SoftmaxDistribution::new(logits_1234(), 1.0, 0.3);
        });
        assert!(result.is_err());
    }
}
