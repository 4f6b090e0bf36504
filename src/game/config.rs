use anyhow::{Result, bail, ensure};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{direction::Direction, state::Position};

/// Smallest board where the default layout keeps food off the head
pub const MIN_GRID_SIZE: usize = 3;

/// Largest supported board edge
pub const MAX_GRID_SIZE: usize = 1000;

/// Which snake cells count as obstacles for the new head
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TailPolicy {
    /// The tail cell is vacated in the same tick, so the head may move onto it
    #[default]
    Vacating,
    /// Collide against the whole pre-move body, tail included
    Strict,
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width and height of the square grid
    pub grid_size: usize,
    /// Milliseconds between two ticks
    pub tick_interval_ms: u64,
    /// Points awarded per food eaten
    pub food_score: u32,
    /// Where the single-cell snake starts
    pub initial_head: Position,
    /// Where the first food is placed
    pub initial_food: Position,
    /// Heading of a fresh snake
    pub initial_direction: Direction,
    pub tail_policy: TailPolicy,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            tick_interval_ms: 150,
            food_score: 10,
            initial_head: Position::new(10, 10),
            initial_food: Position::new(15, 15),
            initial_direction: Direction::Up,
            tail_policy: TailPolicy::Vacating,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with a custom grid size
    ///
    /// The start cells are placed relative to the grid the same way the
    /// default 20x20 layout places them.
    pub fn new(grid_size: usize) -> Self {
        let size = grid_size as i32;
        Self {
            grid_size,
            initial_head: Position::new(size / 2, size / 2),
            initial_food: Position::new(size * 3 / 4, size * 3 / 4),
            ..Default::default()
        }
    }

    /// Change the grid size, moving the start cells along with it
    pub fn with_grid_size(self, grid_size: usize) -> Self {
        let layout = Self::new(grid_size);
        Self {
            grid_size,
            initial_head: layout.initial_head,
            initial_food: layout.initial_food,
            ..self
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn contains(&self, pos: Position) -> bool {
        let size = self.grid_size as i32;
        pos.x >= 0 && pos.x < size && pos.y >= 0 && pos.y < size
    }

    /// Reject layouts the engine cannot start from
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.grid_size >= MIN_GRID_SIZE,
            "grid_size must be at least {}, got {}",
            MIN_GRID_SIZE,
            self.grid_size
        );
        ensure!(
            self.grid_size <= MAX_GRID_SIZE,
            "grid_size must be at most {}, got {}",
            MAX_GRID_SIZE,
            self.grid_size
        );
        ensure!(self.tick_interval_ms > 0, "tick_interval_ms must be positive");
        if !self.contains(self.initial_head) {
            bail!(
                "initial_head {:?} is outside the {}x{} grid",
                self.initial_head,
                self.grid_size,
                self.grid_size
            );
        }
        if !self.contains(self.initial_food) {
            bail!(
                "initial_food {:?} is outside the {}x{} grid",
                self.initial_food,
                self.grid_size,
                self.grid_size
            );
        }
        ensure!(
            self.initial_food != self.initial_head,
            "initial_food must not overlap the snake at {:?}",
            self.initial_head
        );
        Ok(())
    }
}
