mod episode;
mod experience;
mod replay_buffer;
mod trajectory;

pub use episode::Episode;
pub use experience::Experience;
pub use replay_buffer::ReplayBuffer;
pub use trajectory::Trajectory;
