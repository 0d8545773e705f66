//! Terminal snake: a fixed-tick game engine with a diff-based terminal renderer.

pub mod collision;
pub mod config;
pub mod game;
pub mod game_loop;
pub mod input;
pub mod logging;
pub mod render;
pub mod snake;
pub mod stage;
pub mod term;
pub mod theme;

/// Unsigned terminal coordinate, as crossterm reports it.
pub type TermInt = u16;

/// Arena-local cell, centered on the arena origin.
pub type Coords = (i16, i16);
