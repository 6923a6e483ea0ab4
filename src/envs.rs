mod base_env;
mod cartpole;
mod http_env;
mod pendulum;

pub use base_env::{ActionSpace, Environment, Step};
pub use cartpole::CartPole;
pub use http_env::HttpEnv;
pub use pendulum::Pendulum;
