//! Tunable game rules, loaded from an optional JSON file.
//!
//! Every field has a default matching the classic browser version, so a
//! config file only needs the keys it wants to change:
//!
//! ```json
//! { "round_seconds": 45, "bonus_chance": 0.2 }
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;
use crate::games::whack::levels::{LevelSpec, LevelTable, DEFAULT_LEVELS};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Length of a timed round
    pub round_seconds: u32,
    /// Lives at the start of a survival round
    pub starting_lives: u32,
    pub points_per_mole: u32,
    /// Seconds added by a time bonus
    pub time_bonus_seconds: u32,
    /// Probability that a spawn is the mode's bonus item instead of a mole
    pub bonus_chance: f64,
    /// How long a hit target stays on screen before it drops
    pub hit_linger_ms: u64,
    pub levels: Vec<LevelSpec>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            round_seconds: 30,
            starting_lives: 3,
            points_per_mole: 10,
            time_bonus_seconds: 5,
            bonus_chance: 0.1,
            hit_linger_ms: 200,
            levels: DEFAULT_LEVELS.to_vec(),
        }
    }
}

impl GameConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text)?;
        info!(path = %path.display(), "loaded game config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.round_seconds == 0 {
            return Err(ConfigError::ZeroRoundLength);
        }
        if self.starting_lives == 0 {
            return Err(ConfigError::ZeroLives);
        }
        self.level_table()?;
        Ok(())
    }

    pub fn level_table(&self) -> Result<LevelTable, ConfigError> {
        Ok(LevelTable::new(self.levels.clone())?)
    }

    pub fn hit_linger(&self) -> Duration {
        Duration::from_millis(self.hit_linger_ms)
    }

    /// `bonus_chance` clamped into a usable probability
    pub fn bonus_probability(&self) -> f64 {
        if self.bonus_chance.is_nan() {
            0.0
        } else {
            self.bonus_chance.clamp(0.0, 1.0)
        }
    }
}
