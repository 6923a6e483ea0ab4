use anyhow::{bail, Context};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;
use tch::Tensor;

use super::base_env::{ActionSpace, Environment, Step};

// CartPole-v1 parameters.
const GRAVITY: f64 = 9.8;
const MASS_CART: f64 = 1.0;
const MASS_POLE: f64 = 0.1;
const TOTAL_MASS: f64 = MASS_CART + MASS_POLE;
const HALF_POLE_LENGTH: f64 = 0.5;
const POLE_MASS_LENGTH: f64 = MASS_POLE * HALF_POLE_LENGTH;
const FORCE_MAG: f64 = 10.0;
const TAU: f64 = 0.02;
const THETA_THRESHOLD: f64 = 12.0 * 2.0 * std::f64::consts::PI / 360.0;
const X_THRESHOLD: f64 = 2.4;

/// Classic cart-pole balancing task.
///
/// Observation: `[x, x_dot, theta, theta_dot]`. Two discrete actions push the
/// cart left (0) or right (1). Every step yields reward 1; the episode
/// terminates when the pole falls past 12 degrees or the cart leaves the track.
pub struct CartPole {
    state: [f64; 4],
    rng: StdRng,
    done: bool,
}

impl CartPole {
    pub fn new(seed: u64) -> Self {
        Self {
            state: [0.0; 4],
            rng: StdRng::seed_from_u64(seed),
            done: true,
        }
    }

    fn observation(&self) -> Tensor {
        Tensor::from_slice(&self.state.map(|v| v as f32))
    }

    fn is_failed(&self) -> bool {
        let [x, _, theta, _] = self.state;
        !(-X_THRESHOLD..=X_THRESHOLD).contains(&x)
            || !(-THETA_THRESHOLD..=THETA_THRESHOLD).contains(&theta)
    }
}

impl Environment for CartPole {
    fn observation_size(&self) -> i64 {
        4
    }

    fn action_space(&self) -> ActionSpace {
        ActionSpace::Discrete(2)
    }

    fn reset(&mut self) -> anyhow::Result<Tensor> {
        for v in self.state.iter_mut() {
            *v = self.rng.gen_range(-0.05..0.05);
        }
        self.done = false;
        Ok(self.observation())
    }

    fn step(&mut self, action: &Tensor) -> anyhow::Result<Step> {
        if self.done {
            bail!("CartPole stepped after termination; call reset first");
        }
        let action = action
            .f_view([-1])
            .and_then(|a| a.f_int64_value(&[0]))
            .context("CartPole expects a single discrete action")?;
        let force = match action {
            0 => -FORCE_MAG,
            1 => FORCE_MAG,
            other => bail!("CartPole action out of range: {other}"),
        };

        let [x, x_dot, theta, theta_dot] = self.state;
        let (sin, cos) = theta.sin_cos();
        let temp = (force + POLE_MASS_LENGTH * theta_dot * theta_dot * sin) / TOTAL_MASS;
        let theta_acc = (GRAVITY * sin - cos * temp)
            / (HALF_POLE_LENGTH * (4.0 / 3.0 - MASS_POLE * cos * cos / TOTAL_MASS));
        let x_acc = temp - POLE_MASS_LENGTH * theta_acc * cos / TOTAL_MASS;

        self.state = [
            x + TAU * x_dot,
            x_dot + TAU * x_acc,
            theta + TAU * theta_dot,
            theta_dot + TAU * theta_acc,
        ];
        self.done = self.is_failed();

        Ok(Step {
            next_state: self.observation(),
            reward: 1.0,
            done: self.done,
            info: Value::Null,
        })
    }
}
