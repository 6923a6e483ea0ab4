use std::path::Path;
use std::time::Duration;

use serde::Serialize;
use tch::nn::OptimizerConfig;
use tch::{nn, Kind, Tensor};
use tracing::{debug, info, warn};

use crate::config::TrainerConfig;
use crate::envs::{ActionSpace, Environment};
use crate::error::{ConfigError, Result, TrainError};
use crate::memory::{ReplayBuffer, Trajectory};
use crate::misc::batch_states::batch_states;
use crate::misc::stopwatch::Stopwatch;
use crate::models::Policy;

/// Per-step weight multiplying the log-probability in the policy-gradient loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnSignal {
    /// Total reward of the episode the step belongs to.
    EpisodeReturn,
    /// Sum of the rewards from the step to the end of its episode.
    RewardsToGo,
}

impl ReturnSignal {
    pub fn weights<'a>(&self, batch: &'a Trajectory) -> &'a [f64] {
        match self {
            ReturnSignal::EpisodeReturn => &batch.episode_return,
            ReturnSignal::RewardsToGo => &batch.rewards_to_go,
        }
    }
}

/// `-mean(log_probs * weights)`. Minimizing it ascends the expected return.
pub fn policy_gradient_loss(log_probs: &Tensor, weights: &[f64]) -> Result<Tensor> {
    if weights.is_empty() {
        return Err(TrainError::EmptyBatch);
    }
    let weights = Tensor::from_slice(weights)
        .to_kind(Kind::Float)
        .to_device(log_probs.device());
    Ok(-(log_probs * weights).mean(Kind::Float))
}

/// What one collection phase produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectStats {
    pub n_steps: usize,
    pub episode_returns: Vec<f64>,
    pub episode_lengths: Vec<usize>,
    /// Episodes cut off by `max_episode_len` rather than ended by the environment.
    pub n_truncated: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct EpochStats {
    pub epoch: usize,
    /// `None` when the update was skipped.
    pub loss: Option<f64>,
    pub n_steps: usize,
    pub n_episodes: usize,
    pub n_truncated: usize,
    pub mean_return: f64,
    pub min_return: f64,
    pub max_return: f64,
    pub mean_episode_len: f64,
    pub epoch_time: Duration,
    pub total_time: Duration,
}

impl EpochStats {
    fn new(
        epoch: usize,
        loss: Option<f64>,
        collected: &CollectStats,
        epoch_time: Duration,
        total_time: Duration,
    ) -> Self {
        let returns = &collected.episode_returns;
        let lengths: Vec<f64> = collected
            .episode_lengths
            .iter()
            .map(|&len| len as f64)
            .collect();
        Self {
            epoch,
            loss,
            n_steps: collected.n_steps,
            n_episodes: returns.len(),
            n_truncated: collected.n_truncated,
            mean_return: mean(returns),
            min_return: returns.iter().copied().fold(f64::INFINITY, f64::min),
            max_return: returns.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            mean_episode_len: mean(&lengths),
            epoch_time,
            total_time,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EvalStats {
    pub n_steps: usize,
    /// Episodes that ended within the step budget.
    pub n_episodes: usize,
    /// Mean return of the finished episodes, or the partial return when none finished.
    pub mean_return: f64,
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Collection, update and flush shared by every policy-gradient variant.
///
/// Owns the environment, the parameters, the optimizer and the per-epoch
/// buffer. Variants differ only in the [`ReturnSignal`] they train with.
pub struct PolicyGradientCore {
    env: Box<dyn Environment>,
    vs: nn::VarStore,
    policy: Policy,
    optimizer: nn::Optimizer,
    buffer: ReplayBuffer,
    config: TrainerConfig,
    stopwatch: Stopwatch,
}

impl PolicyGradientCore {
    pub fn new(env: Box<dyn Environment>, config: TrainerConfig) -> Result<Self> {
        config.validate()?;
        if let ActionSpace::Discrete(n_actions) = env.action_space() {
            if config.policy.min_prob * n_actions as f64 > 1.0 {
                return Err(ConfigError::InvalidValue {
                    field: "policy.min_prob",
                    message: format!("too large for {n_actions} actions"),
                }
                .into());
            }
        }
        if let Some(seed) = config.seed {
            tch::manual_seed(seed);
        }

        let vs = nn::VarStore::new(config.device.device());
        let policy = Policy::build(
            &vs.root(),
            env.observation_size(),
            &env.action_space(),
            &config.policy,
        );
        let optimizer = nn::Adam::default().build(&vs, config.learning_rate)?;
        info!(
            observation_size = env.observation_size(),
            action_space = ?env.action_space(),
            device = ?vs.device(),
            "policy built"
        );

        Ok(Self {
            env,
            vs,
            policy,
            optimizer,
            buffer: ReplayBuffer::new(),
            config,
            stopwatch: Stopwatch::new(),
        })
    }

    /// Plays the policy until at least `min_steps` steps are recorded.
    ///
    /// The episode in progress when the budget is reached is played to its
    /// end, so every collected episode is closed when this returns.
    pub fn run_epoch(&mut self, min_steps: usize) -> Result<CollectStats> {
        let mut stats = CollectStats::default();
        let mut episode_len = 0;

        self.buffer.start_episode();
        let mut state = self.env.reset()?;
        loop {
            let action = self.policy.act(&state);
            let step = self.env.step(&action)?;
            self.buffer.insert_experience(
                state,
                action,
                step.reward,
                step.next_state.shallow_clone(),
            )?;
            stats.n_steps += 1;
            episode_len += 1;

            let cut_off = self
                .config
                .max_episode_len
                .is_some_and(|max| episode_len >= max);
            if !(step.done || cut_off) {
                state = step.next_state;
                continue;
            }

            let episode = self.buffer.finish_episode(step.done)?;
            debug!(
                episode = %episode.id(),
                len = episode.len(),
                ret = episode.total_reward(),
                completed = step.done,
                "episode finished"
            );
            stats.episode_returns.push(episode.total_reward());
            stats.episode_lengths.push(episode.len());
            if !step.done {
                stats.n_truncated += 1;
            }
            episode_len = 0;

            if stats.n_steps >= min_steps {
                break;
            }
            self.buffer.start_episode();
            state = self.env.reset()?;
        }
        Ok(stats)
    }

    /// One gradient step on the epoch batch. Returns the loss, or `None`
    /// when the batch is empty and the update was skipped.
    pub fn update(&mut self, signal: ReturnSignal) -> Result<Option<f64>> {
        let batch = self.buffer.get_epoch_batch();
        if batch.is_empty() {
            warn!("empty epoch batch, skipping policy update");
            return Ok(None);
        }

        let device = self.policy.device();
        let states = batch_states(&batch.states, device);
        let actions = batch_states(&batch.actions, device);
        let log_probs = self.policy.log_prob(&states, &actions);
        let loss = policy_gradient_loss(&log_probs, signal.weights(batch))?;

        self.optimizer.zero_grad();
        loss.backward();
        self.optimizer.step();
        Ok(Some(loss.double_value(&[])))
    }

    pub fn flush(&mut self) {
        self.buffer.reset();
    }

    /// Restarts the clock reported as `total_time` in [`EpochStats`].
    pub fn start_clock(&mut self) {
        self.stopwatch = Stopwatch::new();
    }

    /// Collects, updates, then flushes the buffer whether or not the update succeeded.
    pub fn train_epoch(
        &mut self,
        epoch: usize,
        steps_per_epoch: usize,
        signal: ReturnSignal,
    ) -> Result<EpochStats> {
        let collected = match self.run_epoch(steps_per_epoch) {
            Ok(collected) => collected,
            Err(e) => {
                self.flush();
                return Err(e);
            }
        };
        debug!(
            steps = collected.n_steps,
            episodes = collected.episode_returns.len(),
            "collection done"
        );

        let update = self.update(signal);
        self.flush();
        let loss = update?;

        let (epoch_time, total_time) = self.stopwatch.lap();
        let stats = EpochStats::new(epoch, loss, &collected, epoch_time, total_time);
        info!(
            epoch,
            loss = ?stats.loss,
            mean_return = stats.mean_return,
            mean_episode_len = stats.mean_episode_len,
            episodes = stats.n_episodes,
            steps = stats.n_steps,
            epoch_time = ?stats.epoch_time,
            "epoch finished"
        );
        Ok(stats)
    }

    /// Greedy rollout for `total_steps` steps. Does not touch the buffer or the parameters.
    pub fn eval(&mut self, total_steps: usize) -> Result<EvalStats> {
        let mut returns = Vec::new();
        let mut current_return = 0.0;
        let mut episode_len = 0;

        let mut state = self.env.reset()?;
        for _ in 0..total_steps {
            let action = self.policy.act_deterministically(&state);
            let step = self.env.step(&action)?;
            current_return += step.reward;
            episode_len += 1;

            let cut_off = self
                .config
                .max_episode_len
                .is_some_and(|max| episode_len >= max);
            if step.done || cut_off {
                returns.push(current_return);
                current_return = 0.0;
                episode_len = 0;
                state = self.env.reset()?;
            } else {
                state = step.next_state;
            }
        }

        let n_episodes = returns.len();
        let mean_return = if n_episodes == 0 {
            current_return
        } else {
            mean(&returns)
        };
        info!(steps = total_steps, episodes = n_episodes, mean_return, "evaluation finished");
        Ok(EvalStats {
            n_steps: total_steps,
            n_episodes,
            mean_return,
        })
    }

    pub fn act(&self, obs: &Tensor) -> Tensor {
        self.policy.act(obs)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.vs.save(path)?;
        info!(path = %path.display(), "parameters saved");
        Ok(())
    }

    pub fn load(&mut self, path: &Path) -> Result<()> {
        self.vs.load(path)?;
        info!(path = %path.display(), "parameters loaded");
        Ok(())
    }

    pub fn buffer(&self) -> &ReplayBuffer {
        &self.buffer
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn var_store(&self) -> &nn::VarStore {
        &self.vs
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }
}
