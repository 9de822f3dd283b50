use std::time::Duration;

use ratatui::style::Color;
use thiserror::Error;

use crate::snake::{INITIAL_SNAKE_LEN, Position};

/// Default side length of the square play field, in cells.
pub const DEFAULT_GRID_SIDE: u16 = 20;

/// Smallest grid that still fits the centered starting snake plus a move.
pub const MIN_GRID_SIDE: u16 = 5;

/// Base tick interval in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 150;

/// Minimum tick interval in milliseconds.
pub const MIN_TICK_INTERVAL_MS: u64 = 60;

/// Score needed per speed increase.
pub const POINTS_PER_SPEED_STEP: u32 = 5;

/// Milliseconds removed from the tick interval per speed step.
pub const SPEED_STEP_DECREMENT_MS: u64 = 20;

/// Score that ends the session as a win and unlocks the contact section.
pub const DEFAULT_UNLOCK_SCORE: u32 = 10;

/// Logical grid dimensions. The play field is always square.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridSize {
    pub side: u16,
}

impl GridSize {
    #[must_use]
    pub fn square(side: u16) -> Self {
        Self { side }
    }

    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.side) * usize::from(self.side)
    }

    /// Returns true when `position` lies in `[0, side)` on both axes.
    #[must_use]
    pub fn contains(self, position: Position) -> bool {
        let side = i32::from(self.side);
        (0..side).contains(&position.x) && (0..side).contains(&position.y)
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::square(DEFAULT_GRID_SIDE)
    }
}

/// Tick interval schedule as a pure function of score.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SpeedRamp {
    pub base_ms: u64,
    pub min_ms: u64,
    pub points_per_step: u32,
    pub decrement_ms: u64,
}

impl SpeedRamp {
    /// Returns `max(min, base - floor(score / step) * decrement)`.
    #[must_use]
    pub fn interval_for(&self, score: u32) -> Duration {
        let steps = u64::from(score / self.points_per_step.max(1));
        let clamped_ms = self
            .base_ms
            .saturating_sub(steps.saturating_mul(self.decrement_ms))
            .max(self.min_ms);
        Duration::from_millis(clamped_ms)
    }
}

impl Default for SpeedRamp {
    fn default() -> Self {
        Self {
            base_ms: DEFAULT_TICK_INTERVAL_MS,
            min_ms: MIN_TICK_INTERVAL_MS,
            points_per_step: POINTS_PER_SPEED_STEP,
            decrement_ms: SPEED_STEP_DECREMENT_MS,
        }
    }
}

/// Everything the engine needs to know before a session starts.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct EngineConfig {
    pub grid: GridSize,
    pub ramp: SpeedRamp,
    pub unlock_score: u32,
}

impl EngineConfig {
    /// Checks the invariants the engine relies on.
    ///
    /// A valid config always leaves at least one free cell for food while the
    /// score is below the unlock threshold.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.side < MIN_GRID_SIDE {
            return Err(ConfigError::GridTooSmall {
                side: self.grid.side,
                min: MIN_GRID_SIDE,
            });
        }

        if self.unlock_score == 0 {
            return Err(ConfigError::ZeroUnlockScore);
        }

        let longest_snake = usize::try_from(self.unlock_score)
            .unwrap_or(usize::MAX)
            .saturating_add(INITIAL_SNAKE_LEN - 1);
        if longest_snake >= self.grid.total_cells() {
            return Err(ConfigError::UnlockScoreTooLarge {
                unlock_score: self.unlock_score,
                cells: self.grid.total_cells(),
            });
        }

        if self.ramp.points_per_step == 0 {
            return Err(ConfigError::ZeroSpeedStep);
        }

        if self.ramp.min_ms == 0 || self.ramp.min_ms > self.ramp.base_ms {
            return Err(ConfigError::InvalidTickRange {
                base_ms: self.ramp.base_ms,
                min_ms: self.ramp.min_ms,
            });
        }

        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid: GridSize::default(),
            ramp: SpeedRamp::default(),
            unlock_score: DEFAULT_UNLOCK_SCORE,
        }
    }
}

/// Rejected engine configuration.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum ConfigError {
    #[error("grid side {side} is smaller than the minimum of {min}")]
    GridTooSmall { side: u16, min: u16 },
    #[error("unlock score must be at least 1")]
    ZeroUnlockScore,
    #[error("unlock score {unlock_score} cannot be reached on a board of {cells} cells")]
    UnlockScoreTooLarge { unlock_score: u32, cells: usize },
    #[error("points per speed step must be at least 1")]
    ZeroSpeedStep,
    #[error("minimum tick {min_ms}ms must be non-zero and not above the base tick {base_ms}ms")]
    InvalidTickRange { base_ms: u64, min_ms: u64 },
}

/// Colors applied to the terminal frame.
#[derive(Debug)]
pub struct Theme {
    pub snake_head: Color,
    pub snake_body: Color,
    pub food: Color,
    pub play_bg: Color,
    pub border_fg: Color,
    pub hud_score: Color,
    pub progress: Color,
    pub locked: Color,
    pub unlocked: Color,
    pub overlay_title: Color,
    pub overlay_win: Color,
    pub muted: Color,
}

/// Cyan-on-navy terminal look.
pub const THEME_TERMINAL: Theme = Theme {
    snake_head: Color::LightCyan,
    snake_body: Color::Cyan,
    food: Color::LightRed,
    play_bg: Color::Black,
    border_fg: Color::Cyan,
    hud_score: Color::White,
    progress: Color::LightGreen,
    locked: Color::Yellow,
    unlocked: Color::LightGreen,
    overlay_title: Color::LightCyan,
    overlay_win: Color::LightGreen,
    muted: Color::DarkGray,
};

pub const GLYPH_SNAKE_HEAD: &str = "██";
pub const GLYPH_SNAKE_BODY: &str = "▓▓";
pub const GLYPH_FOOD: &str = "<>";

/// Terminal columns per logical cell; keeps cells roughly square.
pub const CELL_WIDTH: u16 = 2;
