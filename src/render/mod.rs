pub mod grid;
pub mod renderer;

pub use grid::{CellKind, classify, grid_rows};
pub use renderer::Renderer;
