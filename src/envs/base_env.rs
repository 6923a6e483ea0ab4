use tch::Tensor;

/// Shape of the actions an environment accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionSpace {
    /// `n` actions, passed as a 0-d `Int64` tensor holding the index.
    Discrete(i64),
    /// Continuous actions, passed as a 1-d `Float` tensor of `low.len()` values.
    Box { low: Vec<f64>, high: Vec<f64> },
}

impl ActionSpace {
    /// Number of logits (discrete) or action dimensions (continuous).
    pub fn size(&self) -> i64 {
        match self {
            ActionSpace::Discrete(n) => *n,
            ActionSpace::Box { low, .. } => low.len() as i64,
        }
    }

    pub fn is_discrete(&self) -> bool {
        matches!(self, ActionSpace::Discrete(_))
    }
}

/// Result of one environment transition.
#[derive(Debug)]
pub struct Step {
    pub next_state: Tensor,
    pub reward: f64,
    pub done: bool,
    pub info: serde_json::Value,
}

/// Black-box environment driven by the training loop.
///
/// States are 1-d `Float` tensors of `observation_size()` values.
pub trait Environment {
    fn observation_size(&self) -> i64;
    fn action_space(&self) -> ActionSpace;
    fn reset(&mut self) -> anyhow::Result<Tensor>;
    fn step(&mut self, action: &Tensor) -> anyhow::Result<Step>;
}
