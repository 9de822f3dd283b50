use std::collections::VecDeque;

use crate::config::GridSize;
use crate::input::Direction;

/// Number of segments in a freshly reset snake.
pub const INITIAL_SNAKE_LEN: usize = 3;

/// Grid position in logical cell coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the neighbouring cell one step in `direction`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Ordered snake body, head first.
///
/// The body is never empty and consecutive segments are orthogonal
/// neighbours. Movement direction lives with the engine, not here.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Snake {
    body: VecDeque<Position>,
}

impl Snake {
    /// Creates the starting snake: a horizontal segment centered on the grid,
    /// head at the center, facing right.
    #[must_use]
    pub fn centered(grid: GridSize) -> Self {
        let mid = i32::from(grid.side / 2);
        let body = (0..INITIAL_SNAKE_LEN as i32)
            .map(|offset| Position::new(mid - offset, mid))
            .collect();

        Self { body }
    }

    /// Creates a snake from explicit body segments (front is head).
    ///
    /// Returns `None` for an empty body.
    #[must_use]
    pub fn from_segments(segments: Vec<Position>) -> Option<Self> {
        if segments.is_empty() {
            return None;
        }

        Some(Self {
            body: VecDeque::from(segments),
        })
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Returns the tail segment, the cell that vacates on a non-eating step.
    #[must_use]
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Returns the head position after one step in `direction`.
    #[must_use]
    pub fn next_head(&self, direction: Direction) -> Position {
        self.head().step(direction)
    }

    /// Returns true if moving the head onto `cell` hits the body.
    ///
    /// The tail is excluded since it leaves its cell on the same step.
    #[must_use]
    pub fn collides_with_body(&self, cell: Position) -> bool {
        self.body
            .iter()
            .take(self.body.len() - 1)
            .any(|segment| *segment == cell)
    }

    /// Pushes `new_head`; drops the tail unless `grow` is set.
    pub fn advance(&mut self, new_head: Position, grow: bool) {
        self.body.push_front(new_head);
        if !grow {
            let _ = self.body.pop_back();
        }
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns true when there are no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }
}
