//! Application configuration
//!
//! Settings come from three layers: built-in defaults, an optional JSON file
//! and command-line flags. Every field is optional in the file.
//!
//! ```json
//! {
//!   "game": { "grid_size": 20, "tick_interval_ms": 150, "tail_policy": "vacating" },
//!   "input": { "swipe_min_distance": 50.0 },
//!   "log_file": "snake.log"
//! }
//! ```

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::game::GameConfig;
use crate::input::swipe::DEFAULT_MIN_DISTANCE;

/// Input tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Minimum swipe travel, in pixels, along the dominant axis
    pub swipe_min_distance: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            swipe_min_distance: DEFAULT_MIN_DISTANCE,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub game: GameConfig,
    pub input: InputConfig,
    /// Where to write logs; logging is off without it
    pub log_file: Option<PathBuf>,
}

impl AppConfig {
    /// Read a JSON config file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file {:?}", path))
    }

    /// Write the config as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config to {:?}", path))
    }

    pub fn validate(&self) -> Result<()> {
        self.game.validate().context("Invalid game config")?;
        ensure!(
            self.input.swipe_min_distance.is_finite() && self.input.swipe_min_distance > 0.0,
            "swipe_min_distance must be a positive number, got {}",
            self.input.swipe_min_distance
        );
        Ok(())
    }
}
