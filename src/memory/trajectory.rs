use tch::Tensor;

/// Seven parallel per-step sequences, in insertion order.
///
/// Produced by a finished [`Episode`](super::Episode) and concatenated
/// episode-after-episode by the [`ReplayBuffer`](super::ReplayBuffer).
#[derive(Debug, Default)]
pub struct Trajectory {
    pub states: Vec<Tensor>,
    pub actions: Vec<Tensor>,
    pub rewards: Vec<f64>,
    pub next_states: Vec<Tensor>,
    pub final_flags: Vec<bool>,
    /// Total (undiscounted) episode reward, repeated for every step.
    pub episode_return: Vec<f64>,
    /// Undiscounted suffix sum of rewards from each step to the episode end.
    pub rewards_to_go: Vec<f64>,
}

impl Trajectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }

    /// Appends every sequence of `other` to the end of `self`.
    pub fn extend_from(&mut self, other: &Trajectory) {
        self.states
            .extend(other.states.iter().map(Tensor::shallow_clone));
        self.actions
            .extend(other.actions.iter().map(Tensor::shallow_clone));
        self.rewards.extend_from_slice(&other.rewards);
        self.next_states
            .extend(other.next_states.iter().map(Tensor::shallow_clone));
        self.final_flags.extend_from_slice(&other.final_flags);
        self.episode_return.extend_from_slice(&other.episode_return);
        self.rewards_to_go.extend_from_slice(&other.rewards_to_go);
    }

    pub fn clear(&mut self) {
        self.states.clear();
        self.actions.clear();
        self.rewards.clear();
        self.next_states.clear();
        self.final_flags.clear();
        self.episode_return.clear();
        self.rewards_to_go.clear();
    }

    pub(crate) fn is_consistent(&self) -> bool {
        let n = self.len();
        self.states.len() == n
            && self.actions.len() == n
            && self.next_states.len() == n
            && self.final_flags.len() == n
            && self.episode_return.len() == n
            && self.rewards_to_go.len() == n
    }
}
