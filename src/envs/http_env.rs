use anyhow::{anyhow, bail, Context};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tch::{Kind, Tensor};

use super::base_env::{ActionSpace, Environment, Step};

#[derive(Deserialize)]
struct ResetResponse {
    session_id: String,
    observation: Vec<f32>,
}

#[derive(Deserialize)]
struct StepResponse {
    observation: Vec<f32>,
    reward: f64,
    done: bool,
    #[serde(default)]
    info: Value,
}

/// Remote environment served over a JSON HTTP session API.
///
/// `POST {base_url}/reset` with `{"env": env_id}` opens a session and returns
/// the first observation; `POST {base_url}/step` with
/// `{"session_id", "action"}` advances it.
pub struct HttpEnv {
    client: Client,
    base_url: String,
    env_id: String,
    observation_size: i64,
    action_space: ActionSpace,
    session_id: Option<String>,
}

impl HttpEnv {
    pub fn new(
        base_url: &str,
        env_id: &str,
        observation_size: i64,
        action_space: ActionSpace,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("HTTP client build failed")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            env_id: env_id.to_string(),
            observation_size,
            action_space,
            session_id: None,
        })
    }

    fn observation(&self, values: &[f32]) -> anyhow::Result<Tensor> {
        if values.len() as i64 != self.observation_size {
            bail!(
                "observation size mismatch: expected {}, got {}",
                self.observation_size,
                values.len()
            );
        }
        Ok(Tensor::from_slice(values))
    }
}

/// JSON encoding of an action for the `/step` request body.
pub(crate) fn action_to_json(action: &Tensor, space: &ActionSpace) -> anyhow::Result<Value> {
    let flat = action.f_view([-1])?;
    match space {
        ActionSpace::Discrete(_) => Ok(json!(flat.f_int64_value(&[0])?)),
        ActionSpace::Box { .. } => {
            let values = Vec::<f64>::try_from(flat.to_kind(Kind::Double))?;
            Ok(json!(values))
        }
    }
}

impl Environment for HttpEnv {
    fn observation_size(&self) -> i64 {
        self.observation_size
    }

    fn action_space(&self) -> ActionSpace {
        self.action_space.clone()
    }

    fn reset(&mut self) -> anyhow::Result<Tensor> {
        let resp = self
            .client
            .post(format!("{}/reset", self.base_url))
            .json(&json!({ "env": self.env_id }))
            .send()
            .context("reset request failed")?
            .error_for_status()?
            .json::<ResetResponse>()
            .context("reset JSON parse failed")?;
        self.session_id = Some(resp.session_id);
        self.observation(&resp.observation)
    }

    fn step(&mut self, action: &Tensor) -> anyhow::Result<Step> {
        let session_id = self
            .session_id
            .as_deref()
            .ok_or_else(|| anyhow!("step called before reset"))?;
        let action = action_to_json(action, &self.action_space)?;
        let resp = self
            .client
            .post(format!("{}/step", self.base_url))
            .json(&json!({ "session_id": session_id, "action": action }))
            .send()
            .context("step request failed")?
            .error_for_status()?
            .json::<StepResponse>()
            .context("step JSON parse failed")?;

        Ok(Step {
            next_state: self.observation(&resp.observation)?,
            reward: resp.reward,
            done: resp.done,
            info: resp.info,
        })
    }
}
