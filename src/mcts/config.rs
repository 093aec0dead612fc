//! MCTS configuration parameters.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::policy::FinalSelection;

/// Rejected configuration values.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    #[error("exploration constant must be finite and non-negative, got {0}")]
    Exploration(f64),

    #[error("RAVE bias must be finite and non-negative, got {0}")]
    RaveBias(f64),

    #[error("confidence threshold must be within [0, 1], got {0}")]
    Threshold(f64),

    #[error("simulation ceiling must be positive")]
    ZeroCeiling,

    #[error("time check batch must be positive")]
    ZeroBatch,
}

/// MCTS configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MCTSConfig {
    /// UCT exploration constant `C` (default: sqrt(2)).
    /// Higher values favor exploration over exploitation.
    pub exploration_constant: f64,

    /// Blend Rapid Action Value Estimates into child selection.
    pub rave: bool,

    /// RAVE `K`: how fast the RAVE weight decays as real visits accumulate.
    pub rave_bias: f64,

    /// Hard ceiling on simulations per decision.
    /// Also bounds the cached logarithm table.
    pub max_simulations: u32,

    /// Iterations between deadline checks in timed searches.
    pub time_check_batch: u32,

    /// How the move is picked among the root's children.
    pub final_selection: FinalSelection,

    /// Random seed for shuffles and rollouts.
    /// Same seed produces deterministic searches.
    pub seed: u64,

    /// Drop finished trees on a background thread.
    pub background_teardown: bool,
}

impl Default for MCTSConfig {
    fn default() -> Self {
        Self {
            exploration_constant: std::f64::consts::SQRT_2,
            rave: false,
            rave_bias: 0.4,
            max_simulations: 1_000_000,
            time_check_batch: 1000,
            final_selection: FinalSelection::RobustChild,
            seed: 42,
            background_teardown: true,
        }
    }
}

impl MCTSConfig {
    /// Create a new config with custom exploration constant.
    #[must_use]
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    /// Enable RAVE with the given bias.
    #[must_use]
    pub fn with_rave(mut self, bias: f64) -> Self {
        self.rave = true;
        self.rave_bias = bias;
        self
    }

    /// Create a new config with custom seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Create a new config with a custom simulation ceiling.
    #[must_use]
    pub fn with_max_simulations(mut self, max: u32) -> Self {
        self.max_simulations = max;
        self
    }

    /// Create a new config with a custom deadline check interval.
    #[must_use]
    pub fn with_time_check_batch(mut self, batch: u32) -> Self {
        self.time_check_batch = batch;
        self
    }

    /// Create a new config with a custom root selection policy.
    #[must_use]
    pub fn with_final_selection(mut self, selection: FinalSelection) -> Self {
        self.final_selection = selection;
        self
    }

    /// Tear trees down on the calling thread instead of in the background.
    #[must_use]
    pub fn with_inline_teardown(mut self) -> Self {
        self.background_teardown = false;
        self
    }

    /// Check that every parameter is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(ConfigError::Exploration(self.exploration_constant));
        }
        if !self.rave_bias.is_finite() || self.rave_bias < 0.0 {
            return Err(ConfigError::RaveBias(self.rave_bias));
        }
        if let FinalSelection::Confident { threshold } = self.final_selection {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(ConfigError::Threshold(threshold));
            }
        }
        if self.max_simulations == 0 {
            return Err(ConfigError::ZeroCeiling);
        }
        if self.time_check_batch == 0 {
            return Err(ConfigError::ZeroBatch);
        }
        Ok(())
    }
}
