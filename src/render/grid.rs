use crate::game::{GameState, Position};

/// What occupies a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Head,
    Body,
    Food,
    Empty,
}

/// Classify one cell; the head wins over everything else
pub fn classify(state: &GameState, pos: Position) -> CellKind {
    if pos == state.snake.head() {
        CellKind::Head
    } else if state.snake.contains(pos) {
        CellKind::Body
    } else if state.food == Some(pos) {
        CellKind::Food
    } else {
        CellKind::Empty
    }
}

/// The whole board, row by row from the top
pub fn grid_rows(state: &GameState) -> Vec<Vec<CellKind>> {
    let size = state.grid_size as i32;
    (0..size)
        .map(|y| (0..size).map(|x| classify(state, Position::new(x, y))).collect())
        .collect()
}
