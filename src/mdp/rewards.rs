//! Reward configuration for the Tic-Tac-Toe MDP

use serde::{Deserialize, Serialize};

/// Local rewards applied at each transition.
///
/// Terminal rewards are earned exactly once, on the transition that enters
/// the terminal state; the living reward applies to every other transition.
///
/// # Examples
///
/// ```
/// use ttt_mdp::mdp::RewardConfig;
///
/// let rewards = RewardConfig::default().with_living_reward(0.0);
/// assert!(rewards.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardConfig {
    /// Reward for the move that completes the agent's winning line
    pub win_reward: f64,
    /// Reward when the opponent's reply completes their winning line
    pub lose_reward: f64,
    /// Reward for any transition that does not end the game
    pub living_reward: f64,
    /// Reward for the move (or reply) that fills the board without a winner
    pub draw_reward: f64,
}

impl RewardConfig {
    /// Create a reward configuration with explicit values
    pub fn new(win_reward: f64, lose_reward: f64, living_reward: f64, draw_reward: f64) -> Self {
        Self {
            win_reward,
            lose_reward,
            living_reward,
            draw_reward,
        }
    }

    /// Set the win reward
    pub fn with_win_reward(mut self, value: f64) -> Self {
        self.win_reward = value;
        self
    }

    /// Set the loss reward
    pub fn with_lose_reward(mut self, value: f64) -> Self {
        self.lose_reward = value;
        self
    }

    /// Set the living reward
    pub fn with_living_reward(mut self, value: f64) -> Self {
        self.living_reward = value;
        self
    }

    /// Set the draw reward
    pub fn with_draw_reward(mut self, value: f64) -> Self {
        self.draw_reward = value;
        self
    }

    /// Check that every reward is a finite number.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if any reward is NaN
    /// or infinite.
    pub fn validate(&self) -> Result<(), crate::Error> {
        let entries = [
            ("win_reward", self.win_reward),
            ("lose_reward", self.lose_reward),
            ("living_reward", self.living_reward),
            ("draw_reward", self.draw_reward),
        ];
        for (name, value) in entries {
            if !value.is_finite() {
                return Err(crate::Error::InvalidConfiguration {
                    message: format!("{name} must be finite, got {value}"),
                });
            }
        }
        Ok(())
    }
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            win_reward: 10.0,
            lose_reward: -50.0,
            living_reward: -1.0,
            draw_reward: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rewards_are_valid() {
        assert!(RewardConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_non_finite() {
        let rewards = RewardConfig::default().with_win_reward(f64::NAN);
        assert!(rewards.validate().is_err());

        let rewards = RewardConfig::default().with_lose_reward(f64::NEG_INFINITY);
        assert!(rewards.validate().is_err());
    }

    #[test]
    fn test_builder_overrides() {
        let rewards = RewardConfig::default()
            .with_living_reward(0.0)
            .with_draw_reward(1.0);
        assert_eq!(rewards.living_reward, 0.0);
        assert_eq!(rewards.draw_reward, 1.0);
        assert_eq!(rewards.win_reward, 10.0);
    }
}
