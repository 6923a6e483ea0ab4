use tch::Tensor;

use super::episode::Episode;
use super::trajectory::Trajectory;
use crate::error::MemoryError;

/// On-policy trajectory store for one epoch.
///
/// Holds at most one open episode plus every episode closed since the last
/// [`reset`](ReplayBuffer::reset), with their derived sequences concatenated
/// in episode-then-step order. It is consumed by a single policy update and
/// then flushed; nothing survives across epochs.
#[derive(Debug, Default)]
pub struct ReplayBuffer {
    current_episode: Option<Episode>,
    episodes: Vec<Episode>,
    epoch: Trajectory,
}

impl ReplayBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a new episode. Does nothing if one is already open.
    pub fn start_episode(&mut self) {
        if self.current_episode.is_none() {
            self.current_episode = Some(Episode::new());
        }
    }

    pub fn insert_experience(
        &mut self,
        state: Tensor,
        action: Tensor,
        reward: f64,
        next_state: Tensor,
    ) -> Result<(), MemoryError> {
        self.current_episode
            .as_mut()
            .ok_or(MemoryError::NoActiveEpisode)?
            .insert_experience(state, action, reward, next_state)
    }

    /// Finishes the open episode and folds its sequences into the epoch batch.
    ///
    /// On error the open episode is left untouched.
    pub fn finish_episode(&mut self, completed: bool) -> Result<&Episode, MemoryError> {
        let episode = self
            .current_episode
            .as_mut()
            .ok_or(MemoryError::NoActiveEpisode)?;
        episode.finish(completed)?;

        let episode = self
            .current_episode
            .take()
            .ok_or(MemoryError::NoActiveEpisode)?;
        if let Some(trajectory) = episode.trajectory() {
            self.epoch.extend_from(trajectory);
        }
        self.episodes.push(episode);

        debug_assert_eq!(
            self.epoch.len(),
            self.episodes.iter().map(Episode::len).sum::<usize>()
        );
        Ok(&self.episodes[self.episodes.len() - 1])
    }

    /// Drops the open episode (unfinished), every closed episode and the
    /// aggregated batch.
    pub fn reset(&mut self) {
        self.current_episode = None;
        self.episodes.clear();
        self.epoch.clear();
    }

    /// Flattened sequences of every closed episode of this epoch.
    ///
    /// Empty when no episode has been closed; callers must not train on it then.
    pub fn get_epoch_batch(&self) -> &Trajectory {
        &self.epoch
    }

    pub fn has_active_episode(&self) -> bool {
        self.current_episode.is_some()
    }

    pub fn current_episode(&self) -> Option<&Episode> {
        self.current_episode.as_ref()
    }

    pub fn episodes(&self) -> &[Episode] {
        &self.episodes
    }

    pub fn n_episodes(&self) -> usize {
        self.episodes.len()
    }

    /// Number of experiences in closed episodes.
    pub fn len(&self) -> usize {
        self.epoch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.epoch.is_empty()
    }
}
