use tch::Tensor;
use ulid::Ulid;

use super::experience::Experience;
use super::trajectory::Trajectory;
use crate::error::MemoryError;
use crate::misc::cumsum;

/// All experiences of one trajectory, from environment reset to termination
/// or cutoff.
///
/// The derived [`Trajectory`] only exists once the episode is finished.
#[derive(Debug)]
pub struct Episode {
    id: Ulid,
    experiences: Vec<Experience>,
    finished: bool,
    trajectory: Trajectory,
}

impl Episode {
    pub fn new() -> Self {
        Self {
            id: Ulid::new(),
            experiences: vec![],
            finished: false,
            trajectory: Trajectory::new(),
        }
    }

    pub fn id(&self) -> Ulid {
        self.id
    }

    pub fn len(&self) -> usize {
        self.experiences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.experiences.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn experiences(&self) -> &[Experience] {
        &self.experiences
    }

    /// Derived per-step sequences, `None` while the episode is still open.
    pub fn trajectory(&self) -> Option<&Trajectory> {
        self.finished.then_some(&self.trajectory)
    }

    /// Sum of all rewards collected so far.
    pub fn total_reward(&self) -> f64 {
        self.experiences.iter().map(Experience::reward).sum()
    }

    pub fn insert_experience(
        &mut self,
        state: Tensor,
        action: Tensor,
        reward: f64,
        next_state: Tensor,
    ) -> Result<(), MemoryError> {
        if self.finished {
            return Err(MemoryError::InvalidState(
                "cannot insert into a finished episode",
            ));
        }
        self.experiences
            .push(Experience::new(state, action, reward, next_state));
        Ok(())
    }

    /// Closes the episode and derives its per-step sequences.
    ///
    /// `completed` marks the last experience as a true terminal transition;
    /// `false` means the episode was cut off by a step budget.
    pub fn finish(&mut self, completed: bool) -> Result<(), MemoryError> {
        if self.finished {
            return Err(MemoryError::InvalidState("episode is already finished"));
        }
        let Some(last) = self.experiences.last_mut() else {
            return Err(MemoryError::InvalidState("cannot finish an empty episode"));
        };
        if completed {
            last.mark_final();
        }

        let t = &mut self.trajectory;
        for experience in &self.experiences {
            t.states.push(experience.state().shallow_clone());
            t.actions.push(experience.action().shallow_clone());
            t.rewards.push(experience.reward());
            t.next_states.push(experience.next_state().shallow_clone());
            t.final_flags.push(experience.is_final());
        }

        let total: f64 = t.rewards.iter().sum();
        t.episode_return = vec![total; t.rewards.len()];
        t.rewards_to_go = cumsum::cumsum_rev(&t.rewards, 1.0);

        self.finished = true;
        Ok(())
    }
}

impl Default for Episode {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode_with_rewards(rewards: &[f64]) -> Episode {
        let mut episode = Episode::new();
        for (i, &r) in rewards.iter().enumerate() {
            episode
                .insert_experience(
                    Tensor::from_slice(&[i as f64]),
                    Tensor::from(i as i64),
                    r,
                    Tensor::from_slice(&[(i + 1) as f64]),
                )
                .unwrap();
        }
        episode
    }

    #[test]
    fn test_finish_completed_episode() {
        let mut episode = episode_with_rewards(&[1.0, 2.0, 3.0]);
        episode.finish(true).unwrap();

        let t = episode.trajectory().unwrap();
        assert_eq!(t.rewards, vec![1.0, 2.0, 3.0]);
        assert_eq!(t.episode_return, vec![6.0, 6.0, 6.0]);
        assert_eq!(t.rewards_to_go, vec![6.0, 5.0, 3.0]);
        assert_eq!(t.final_flags, vec![false, false, true]);
        assert!(episode.experiences()[2].is_final());
        assert!(t.is_consistent());
    }

    #[test]
    fn test_finish_truncated_episode_keeps_final_flag_false() {
        let mut episode = episode_with_rewards(&[0.5, 0.5]);
        episode.finish(false).unwrap();

        let t = episode.trajectory().unwrap();
        assert_eq!(t.final_flags, vec![false, false]);
        assert!(!episode.experiences()[1].is_final());
    }

    #[test]
    fn test_returns_match_suffix_sums() {
        let rewards = [0.3, -1.2, 4.0, 0.0, 2.5, -0.7];
        let mut episode = episode_with_rewards(&rewards);
        episode.finish(true).unwrap();

        let t = episode.trajectory().unwrap();
        let total: f64 = rewards.iter().sum();
        assert_eq!(t.episode_return.len(), rewards.len());
        for i in 0..rewards.len() {
            let suffix: f64 = rewards[i..].iter().sum();
            assert!((t.rewards_to_go[i] - suffix).abs() < 1e-9);
            assert!((t.episode_return[i] - total).abs() < 1e-9);
        }
        assert!((t.rewards_to_go[0] - t.episode_return[0]).abs() < 1e-9);
        assert_eq!(t.rewards_to_go[rewards.len() - 1], t.rewards[rewards.len() - 1]);
    }

    #[test]
    fn test_flattened_sequences_follow_insertion_order() {
        let mut episode = episode_with_rewards(&[1.0, 1.0, 1.0]);
        episode.finish(true).unwrap();

        let t = episode.trajectory().unwrap();
        for i in 0..3 {
            assert_eq!(t.states[i].double_value(&[0]), i as f64);
            assert_eq!(t.actions[i].int64_value(&[]), i as i64);
            assert_eq!(t.next_states[i].double_value(&[0]), (i + 1) as f64);
        }
    }

    #[test]
    fn test_trajectory_hidden_until_finished() {
        let episode = episode_with_rewards(&[1.0]);
        assert!(!episode.is_finished());
        assert!(episode.trajectory().is_none());
        assert_eq!(episode.total_reward(), 1.0);
    }

    #[test]
    fn test_finish_empty_episode_fails() {
        let mut episode = Episode::new();
        assert!(matches!(
            episode.finish(true),
            Err(MemoryError::InvalidState(_))
        ));
        assert!(!episode.is_finished());
    }

    #[test]
    fn test_finish_twice_fails() {
        let mut episode = episode_with_rewards(&[1.0, 2.0]);
        episode.finish(true).unwrap();
        assert!(matches!(
            episode.finish(true),
            Err(MemoryError::InvalidState(_))
        ));
        assert_eq!(episode.trajectory().unwrap().len(), 2);
    }

    #[test]
    fn test_insert_into_finished_episode_fails() {
        let mut episode = episode_with_rewards(&[1.0]);
        episode.finish(false).unwrap();

        let result = episode.insert_experience(
            Tensor::from_slice(&[0.0]),
            Tensor::from(0i64),
            1.0,
            Tensor::from_slice(&[0.0]),
        );
        assert!(matches!(result, Err(MemoryError::InvalidState(_))));
        assert_eq!(episode.len(), 1);
    }
}
