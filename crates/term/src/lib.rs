//! Terminal rendering for a running match.
//!
//! Renders a [`core::MatchSnapshot`] into a framebuffer and flushes it with
//! `crossterm`, redrawing only changed cells. Board cells are two columns
//! wide to keep them roughly square.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use tetris_replay_core as core;
pub use tetris_replay_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{GameView, HudInfo, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
