use rand::Rng;

use crate::config::GridSize;
use crate::snake::{Position, Snake};

/// The single food cell currently on the board.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Food {
    pub position: Position,
}

impl Food {
    #[must_use]
    pub fn new(position: Position) -> Self {
        Self { position }
    }

    /// Spawns food on a cell the snake does not occupy.
    ///
    /// Returns `None` when the snake covers the whole grid.
    #[must_use]
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, grid: GridSize, snake: &Snake) -> Option<Self> {
        spawn_position(rng, grid, snake).map(Self::new)
    }
}

/// Draws uniformly random cells until one is free of the snake.
///
/// Every free cell is equally likely. Returns `None` when no free cell
/// exists instead of sampling forever.
#[must_use]
pub fn spawn_position<R: Rng + ?Sized>(
    rng: &mut R,
    grid: GridSize,
    snake: &Snake,
) -> Option<Position> {
    if snake.len() >= grid.total_cells() {
        return None;
    }

    let side = i32::from(grid.side);
    loop {
        let candidate = Position {
            x: rng.gen_range(0..side),
            y: rng.gen_range(0..side),
        };
        if !snake.occupies(candidate) {
            return Some(candidate);
        }
    }
}
