//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains all the game rules, state management, and replay data.
//! It has **zero dependencies** on threads, terminals, or I/O, making it:
//!
//! - **Deterministic**: Same seed and same commands produce identical matches
//! - **Testable**: Comprehensive unit tests for all game rules
//! - **Portable**: Can run in any environment (terminal loop, headless replay)
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 board with collision, two-phase line clearing and garbage rows
//! - [`game_state`]: The [`Match`] state machine
//! - [`pieces`]: Tetromino catalog with per-kind rotation tables
//! - [`rng`]: Seeded LCG for piece draws and garbage holes
//! - [`scoring`]: Points, leveling and fall cadence
//! - [`replay`]: Seed plus command log of a recorded match
//!
//! # Game Rules
//!
//! - **Uniform draws**: each next piece is drawn independently from the seeded RNG
//! - **No wall kicks**: a rotation that collides is rejected
//! - **Two-phase clears**: full rows are marked first and removed on compaction
//! - **Garbage**: reaching level 5, 8, 11, ... pushes one gray row in from the bottom
//!
//! # Example
//!
//! ```
//! use tetris_replay_core::{Match, Player};
//! use tetris_replay_types::Command;
//!
//! let mut game = Match::new("demo", Player::new("ada"), 12345);
//!
//! game.apply(Command::MoveRight);
//! game.apply(Command::Rotate);
//! let outcome = game.apply(Command::HardDrop);
//!
//! assert!(outcome.accepted);
//! assert_eq!(game.pieces_locked(), 1);
//! ```

pub mod board;
pub mod game_state;
pub mod pieces;
pub mod player;
pub mod replay;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use tetris_replay_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use game_state::{
    time_seed, CommandOutcome, CompactReport, LockReport, Match, TickOutcome,
};
pub use pieces::{shape, Piece, PieceShape};
pub use player::Player;
pub use replay::{ReplayEvent, ReplaySession};
pub use rng::SimpleRng;
pub use scoring::{drop_interval_ms, next_level, points};
pub use snapshot::{ActiveSnapshot, MatchSnapshot};
