//! Grid Snake engine that unlocks a contact section once the player reaches
//! the score threshold, plus the terminal front end that drives it.

pub mod config;
pub mod driver;
pub mod food;
pub mod game;
pub mod input;
pub mod overlay;
pub mod renderer;
pub mod scheduler;
pub mod snake;
pub mod terminal_runtime;
pub mod ui;
pub mod unlock;
