mod base_distribution;
mod gaussian;
mod softmax;

pub use base_distribution::BaseDistribution;
pub use gaussian::GaussianDistribution;
pub use softmax::SoftmaxDistribution;
