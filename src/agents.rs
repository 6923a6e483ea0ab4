mod base_agent;
mod policy_gradient;
mod reinforce;
mod simple_gradient;

pub use base_agent::TrainableAgent;
pub use policy_gradient::{
    policy_gradient_loss, CollectStats, EpochStats, EvalStats, PolicyGradientCore, ReturnSignal,
};
pub use reinforce::REINFORCE;
pub use simple_gradient::SimpleGradient;
