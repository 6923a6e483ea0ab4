use tch::Tensor;

/// Batched action distribution built from a policy network's output.
///
/// Every method works on a leading batch dimension `N`.
pub trait BaseDistribution {
    fn params(&self) -> (&Tensor, &Tensor);
    fn entropy(&self) -> Tensor;
    fn sample(&self) -> Tensor;
    /// Per-example log-probability of `x`, shape `[N]`. Differentiable.
    fn log_prob(&self, x: &Tensor) -> Tensor;
    fn most_probable(&self) -> Tensor;
}
