//! Grid Snake - a small snake game on a fixed square grid
//!
//! This library provides:
//! - Core game logic (game module)
//! - TUI rendering (render module)
//! - Keyboard and swipe input (input module)
//! - Session statistics (metrics module)
//! - The interactive terminal session (modes module)

pub mod config;
pub mod game;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod render;
