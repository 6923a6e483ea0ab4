use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use policygrad::agents::{TrainableAgent, REINFORCE, SimpleGradient};
use policygrad::envs::{ActionSpace, CartPole, Environment, HttpEnv, Pendulum};
use policygrad::TrainerConfig;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EnvKind {
    Cartpole,
    Pendulum,
    Http,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Algo {
    Simple,
    Reinforce,
}

/// Train a policy-gradient agent on a bundled or remote environment.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    #[arg(long, value_enum, default_value = "cartpole")]
    env: EnvKind,

    #[arg(long, value_enum, default_value = "simple")]
    algo: Algo,

    /// JSON trainer configuration; missing fields take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    epochs: Option<usize>,

    /// Minimum environment steps per epoch.
    #[arg(long)]
    steps: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value = "http://localhost:8000")]
    url: String,

    #[arg(long, default_value = "CartPole-v1")]
    env_id: String,

    /// Observation width of the remote environment.
    #[arg(long, default_value_t = 4)]
    obs_size: i64,

    /// Number of discrete actions of the remote environment.
    #[arg(long, default_value_t = 2)]
    n_actions: i64,

    /// Write the trained parameters here.
    #[arg(long)]
    save: Option<PathBuf>,

    /// Greedy evaluation steps after training (0 to skip).
    #[arg(long, default_value_t = 0)]
    eval_steps: usize,
}

fn make_env(args: &Args, seed: u64) -> anyhow::Result<Box<dyn Environment>> {
    Ok(match args.env {
        EnvKind::Cartpole => Box::new(CartPole::new(seed)),
        EnvKind::Pendulum => Box::new(Pendulum::new(seed)),
        EnvKind::Http => Box::new(HttpEnv::new(
            &args.url,
            &args.env_id,
            args.obs_size,
            ActionSpace::Discrete(args.n_actions),
        )?),
    })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => TrainerConfig::from_json_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => TrainerConfig::default(),
    };
    if let Some(epochs) = args.epochs {
        config.total_epochs = epochs;
    }
    if let Some(steps) = args.steps {
        config.steps_per_epoch = steps;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed as i64);
    }
    // Pendulum never terminates on its own.
    if matches!(args.env, EnvKind::Pendulum) && config.max_episode_len.is_none() {
        config.max_episode_len = Some(200);
    }

    let env = make_env(&args, args.seed.unwrap_or(0))?;
    let mut agent: Box<dyn TrainableAgent> = match args.algo {
        Algo::Simple => Box::new(SimpleGradient::new(env, config)?),
        Algo::Reinforce => Box::new(REINFORCE::new(env, config)?),
    };
    info!(env = ?args.env, algo = ?args.algo, "training started");

    let history = agent.train_configured()?;
    if let Some(last) = history.last() {
        info!(
            epochs = history.len(),
            mean_return = last.mean_return,
            total_time = ?last.total_time,
            "training finished"
        );
    }

    if args.eval_steps > 0 {
        let stats = agent.eval(args.eval_steps)?;
        println!("{}", serde_json::to_string(&stats)?);
    }

    if let Some(path) = &args.save {
        agent.save(path)?;
    }
    Ok(())
}
