mod mlp;
mod policy;

mod policy_based {
    pub mod base_policy_network;
    pub mod fc_gaussian_policy;
    pub mod fc_softmax_policy;
}

pub use mlp::Mlp;
pub use policy::Policy;
pub use policy_based::base_policy_network::BasePolicy;
pub use policy_based::fc_gaussian_policy::FCGaussianPolicy;
pub use policy_based::fc_softmax_policy::FCSoftmaxPolicy;
