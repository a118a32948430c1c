//! Terminal input module (engine-facing).
//!
//! Independent of any UI framework: maps `crossterm` key events into
//! [`crate::types::Command`] values for the game controller's input port.

pub mod map;

pub use tetris_replay_types as types;

pub use map::{handle_key_event, is_actionable, should_quit};
