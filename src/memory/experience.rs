use tch::Tensor;

/// One environment transition `(s, a, r, s', final)`.
///
/// Owned by the [`Episode`](super::Episode) that recorded it. The only
/// mutation ever applied is raising `is_final` when the episode closes on a
/// true terminal state.
#[derive(Debug)]
pub struct Experience {
    state: Tensor,
    action: Tensor,
    reward: f64,
    next_state: Tensor,
    is_final: bool,
}

impl Experience {
    pub(crate) fn new(state: Tensor, action: Tensor, reward: f64, next_state: Tensor) -> Self {
        Self {
            state,
            action,
            reward,
            next_state,
            is_final: false,
        }
    }

    pub(crate) fn mark_final(&mut self) {
        self.is_final = true;
    }

    pub fn state(&self) -> &Tensor {
        &self.state
    }

    pub fn action(&self) -> &Tensor {
        &self.action
    }

    pub fn reward(&self) -> f64 {
        self.reward
    }

    pub fn next_state(&self) -> &Tensor {
        &self.next_state
    }

    pub fn is_final(&self) -> bool {
        self.is_final
    }
}
