use anyhow::Context;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;
use std::f64::consts::PI;
use tch::Tensor;

use super::base_env::{ActionSpace, Environment, Step};

// Pendulum-v1 parameters.
const MAX_SPEED: f64 = 8.0;
const MAX_TORQUE: f64 = 2.0;
const DT: f64 = 0.05;
const G: f64 = 10.0;
const MASS: f64 = 1.0;
const LENGTH: f64 = 1.0;

/// Inverted pendulum swing-up with a continuous torque action.
///
/// Observation: `[cos(theta), sin(theta), theta_dot]`. The task never
/// terminates on its own, so episodes end only through the trainer's
/// `max_episode_len` cutoff.
pub struct Pendulum {
    theta: f64,
    theta_dot: f64,
    rng: StdRng,
}

fn angle_normalize(x: f64) -> f64 {
    (x + PI).rem_euclid(2.0 * PI) - PI
}

impl Pendulum {
    pub fn new(seed: u64) -> Self {
        Self {
            theta: 0.0,
            theta_dot: 0.0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn observation(&self) -> Tensor {
        Tensor::from_slice(&[
            self.theta.cos() as f32,
            self.theta.sin() as f32,
            self.theta_dot as f32,
        ])
    }
}

impl Environment for Pendulum {
    fn observation_size(&self) -> i64 {
        3
    }

    fn action_space(&self) -> ActionSpace {
        ActionSpace::Box {
            low: vec![-MAX_TORQUE],
            high: vec![MAX_TORQUE],
        }
    }

    fn reset(&mut self) -> anyhow::Result<Tensor> {
        self.theta = self.rng.gen_range(-PI..PI);
        self.theta_dot = self.rng.gen_range(-1.0..1.0);
        Ok(self.observation())
    }

    fn step(&mut self, action: &Tensor) -> anyhow::Result<Step> {
        let torque = action
            .f_view([-1])
            .and_then(|a| a.f_double_value(&[0]))
            .context("Pendulum expects a one-dimensional torque action")?
            .clamp(-MAX_TORQUE, MAX_TORQUE);

        let cost = angle_normalize(self.theta).powi(2)
            + 0.1 * self.theta_dot.powi(2)
            + 0.001 * torque.powi(2);

        let theta_dot = self.theta_dot
            + (3.0 * G / (2.0 * LENGTH) * self.theta.sin() + 3.0 / (MASS * LENGTH * LENGTH) * torque)
                * DT;
        self.theta_dot = theta_dot.clamp(-MAX_SPEED, MAX_SPEED);
        self.theta += self.theta_dot * DT;

        Ok(Step {
            next_state: self.observation(),
            reward: -cost,
            done: false,
            info: Value::Null,
        })
    }
}
