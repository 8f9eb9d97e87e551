//! World construction parameters.
//!
//! Only the world's shape and starting conditions are configurable; the game
//! tables in [`registry`](crate::registry) are fixed.

use crate::error::ConfigError;
use crate::registry::ItemType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub grid_width: u32,
    pub grid_height: u32,
    /// Side of the square unlocked region at start, centred in the grid.
    pub start_size: u32,
    /// Cap on simultaneously live item entities.
    pub max_items: usize,
    /// Logic steps per second.
    pub tick_rate: u32,
    pub starting_money: u32,
    pub seed: u64,
    /// Scatter resource tiles on creation.
    pub generate_resources: bool,
    /// Deposited into the player inventory on creation.
    pub starting_items: Vec<(ItemType, u32)>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            grid_width: 64,
            grid_height: 64,
            start_size: 9,
            max_items: 1000,
            tick_rate: 60,
            starting_money: 1000,
            seed: 0,
            generate_resources: true,
            starting_items: vec![(ItemType::Miner, 1), (ItemType::Conveyor, 10)],
        }
    }
}

impl WorldConfig {
    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: WorldConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ConfigError::Invalid("grid must not be empty".to_string()));
        }
        if self.start_size == 0
            || self.start_size > self.grid_width
            || self.start_size > self.grid_height
        {
            return Err(ConfigError::Invalid(format!(
                "start_size {} does not fit a {}x{} grid",
                self.start_size, self.grid_width, self.grid_height
            )));
        }
        if self.tick_rate == 0 {
            return Err(ConfigError::Invalid("tick_rate must be positive".to_string()));
        }
        if self.max_items == 0 {
            return Err(ConfigError::Invalid("max_items must be positive".to_string()));
        }
        if self.grid_width > i32::MAX as u32 / 2 || self.grid_height > i32::MAX as u32 / 2 {
            return Err(ConfigError::Invalid("grid is too large".to_string()));
        }
        Ok(())
    }
}
