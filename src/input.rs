use std::io;
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};

use crate::ui::layout::ScreenLayout;

/// Canonical movement directions for snake input.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Returns the unit step `(dx, dy)`; y grows downwards.
    #[must_use]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// High-level input events consumed by the game loop.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameInput {
    Direction(Direction),
    /// Press on an on-screen direction button.
    Control(Direction),
    /// Start or restart (Space/Enter, or a click on the play surface).
    Confirm,
    Quit,
}

/// Returns whether a direction change is legal (no immediate 180° turns).
#[must_use]
pub fn direction_change_is_valid(current: Direction, next: Direction) -> bool {
    next != current.opposite()
}

/// Maps a key press to a game input. Arrows and WASD steer.
#[must_use]
pub fn map_key(key: KeyEvent) -> Option<GameInput> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c' | 'C')).then_some(GameInput::Quit);
    }

    let input = match key.code {
        KeyCode::Up => GameInput::Direction(Direction::Up),
        KeyCode::Down => GameInput::Direction(Direction::Down),
        KeyCode::Left => GameInput::Direction(Direction::Left),
        KeyCode::Right => GameInput::Direction(Direction::Right),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'w' => GameInput::Direction(Direction::Up),
            's' => GameInput::Direction(Direction::Down),
            'a' => GameInput::Direction(Direction::Left),
            'd' => GameInput::Direction(Direction::Right),
            ' ' => GameInput::Confirm,
            'q' => GameInput::Quit,
            _ => return None,
        },
        KeyCode::Enter => GameInput::Confirm,
        KeyCode::Esc => GameInput::Quit,
        _ => return None,
    };

    Some(input)
}

/// Maps a pointer press to a game input using the current screen layout.
///
/// On-screen direction pads steer; a press on the play surface confirms.
#[must_use]
pub fn map_mouse(mouse: MouseEvent, layout: &ScreenLayout) -> Option<GameInput> {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return None;
    }

    if let Some(direction) = layout.control_at(mouse.column, mouse.row) {
        return Some(GameInput::Control(direction));
    }

    layout
        .play_surface_contains(mouse.column, mouse.row)
        .then_some(GameInput::Confirm)
}

/// Polls crossterm for keyboard and pointer events.
#[derive(Debug, Default)]
pub struct InputHandler;

impl InputHandler {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Waits up to `timeout` for one event and maps it to a game input.
    pub fn poll_input(
        &mut self,
        timeout: Duration,
        layout: &ScreenLayout,
    ) -> io::Result<Option<GameInput>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }

        let input = match event::read()? {
            Event::Key(key) => map_key(key),
            Event::Mouse(mouse) => map_mouse(mouse, layout),
            _ => None,
        };

        Ok(input)
    }
}
