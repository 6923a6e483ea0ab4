//! Deterministic mock environments for exercising the training loop.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::bail;
use serde_json::Value;
use tch::Tensor;

use crate::envs::{ActionSpace, Environment, Step};

#[derive(Debug, Clone, Copy)]
pub(crate) enum MockReward {
    Constant(f64),
    /// Reward equals the discrete action index taken.
    ActionIndex,
}

/// Counters shared between a boxed [`MockEnv`] and the test that built it.
#[derive(Debug, Default)]
pub(crate) struct MockCounters {
    pub steps: usize,
    pub resets: usize,
}

/// Fixed-length episodes (`episode_len` steps, then `done`), or never-ending
/// ones when `episode_len` is `None`. Stepping a terminated episode fails.
pub(crate) struct MockEnv {
    episode_len: Option<usize>,
    reward: MockReward,
    action_space: ActionSpace,
    t: usize,
    needs_reset: bool,
    counters: Rc<RefCell<MockCounters>>,
}

impl MockEnv {
    pub fn countdown(episode_len: usize) -> Self {
        Self::new(
            Some(episode_len),
            MockReward::Constant(1.0),
            ActionSpace::Discrete(2),
        )
    }

    pub fn never_done() -> Self {
        Self::new(None, MockReward::Constant(0.5), ActionSpace::Discrete(2))
    }

    pub fn new(episode_len: Option<usize>, reward: MockReward, action_space: ActionSpace) -> Self {
        Self {
            episode_len,
            reward,
            action_space,
            t: 0,
            needs_reset: true,
            counters: Rc::new(RefCell::new(MockCounters::default())),
        }
    }

    pub fn counters(&self) -> Rc<RefCell<MockCounters>> {
        Rc::clone(&self.counters)
    }

    fn observation(&self) -> Tensor {
        let t = self.t as f32;
        Tensor::from_slice(&[t, 1.0 - t, 0.5])
    }
}

impl Environment for MockEnv {
    fn observation_size(&self) -> i64 {
        3
    }

    fn action_space(&self) -> ActionSpace {
        self.action_space.clone()
    }

    fn reset(&mut self) -> anyhow::Result<Tensor> {
        self.t = 0;
        self.needs_reset = false;
        self.counters.borrow_mut().resets += 1;
        Ok(self.observation())
    }

    fn step(&mut self, action: &Tensor) -> anyhow::Result<Step> {
        if self.needs_reset {
            bail!("mock environment stepped without reset");
        }
        self.t += 1;
        self.counters.borrow_mut().steps += 1;

        let reward = match self.reward {
            MockReward::Constant(r) => r,
            MockReward::ActionIndex => action.int64_value(&[]) as f64,
        };
        let done = self.episode_len.is_some_and(|len| self.t >= len);
        self.needs_reset = done;

        Ok(Step {
            next_state: self.observation(),
            reward,
            done,
            info: Value::Null,
        })
    }
}
