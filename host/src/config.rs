use minesweep_core::Difficulty;
use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::*;

/// Settings for one visible game, usually handed over by the embedding page as JSON.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Difficulty of the first board.
    pub difficulty: Difficulty,
    /// Fixed seed for reproducible boards, random when unset.
    pub seed: Option<u64>,
    pub tick_interval_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Beginner,
            seed: None,
            tick_interval_ms: 1000,
        }
    }
}

impl SessionConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()
    }

    pub fn validate(self) -> Result<Self> {
        if self.tick_interval_ms == 0 {
            return Err(HostError::ZeroTickInterval);
        }
        Ok(self)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}
