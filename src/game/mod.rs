//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The engine is driven from outside: something calls `tick` on a fixed period and
//! forwards turn and pause requests in between.

pub mod config;
pub mod direction;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use config::{GameConfig, TailPolicy};
pub use direction::Direction;
pub use engine::{GameEngine, TickOutcome};
pub use state::{CollisionType, GameState, Phase, Position, Snake};
