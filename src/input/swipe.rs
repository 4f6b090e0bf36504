//! Swipe gesture recognition
//!
//! A swipe is a press followed by a release. Its direction is the dominant axis
//! of the displacement, and it only counts once that displacement is strictly
//! larger than the minimum distance. Terminal mouse drags are fed through the
//! same tracker after scaling cells to pixel-like units.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::game::Direction;

/// Minimum travel along the dominant axis for a swipe to register
pub const DEFAULT_MIN_DISTANCE: f32 = 50.0;

/// Approximate pixel size of a terminal cell, used to scale mouse drags
pub const CELL_WIDTH_PX: f32 = 10.0;
pub const CELL_HEIGHT_PX: f32 = 20.0;

#[derive(Debug, Clone)]
pub struct SwipeTracker {
    min_distance: f32,
    start: Option<(f32, f32)>,
}

impl SwipeTracker {
    pub fn new(min_distance: f32) -> Self {
        Self {
            min_distance,
            start: None,
        }
    }

    /// Record where the touch started, replacing any unfinished swipe
    pub fn begin(&mut self, x: f32, y: f32) {
        self.start = Some((x, y));
    }

    /// Finish the swipe at `(x, y)`
    ///
    /// Returns `None` when no swipe was started or the travel was too short.
    pub fn end(&mut self, x: f32, y: f32) -> Option<Direction> {
        let (start_x, start_y) = self.start.take()?;
        let dx = x - start_x;
        let dy = y - start_y;

        if dx.abs() > dy.abs() {
            if dx.abs() <= self.min_distance {
                return None;
            }
            Some(if dx > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            })
        } else {
            if dy.abs() <= self.min_distance {
                return None;
            }
            Some(if dy > 0.0 {
                Direction::Down
            } else {
                Direction::Up
            })
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.start.is_some()
    }

    /// Interpret a left-button drag as a swipe
    pub fn handle_mouse_event(&mut self, event: MouseEvent) -> Option<Direction> {
        let x = f32::from(event.column) * CELL_WIDTH_PX;
        let y = f32::from(event.row) * CELL_HEIGHT_PX;

        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.begin(x, y);
                None
            }
            MouseEventKind::Up(MouseButton::Left) => self.end(x, y),
            _ => None,
        }
    }
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_DISTANCE)
    }
}
