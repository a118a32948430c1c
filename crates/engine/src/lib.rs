//! Engine - the game loop around a [`Match`](tetris_replay_core::Match)
//!
//! - [`config`]: loop cadence, defaults and environment overrides
//! - [`step`]: the counted unit of loop progress (tick, flash, compaction)
//! - [`controller`]: the `game-loop` thread, its input port and finalization
//! - [`events`]: observer trait and the events it receives
//! - [`recorder`] / [`playback`]: replay capture and cursor
//! - [`simulate`]: headless playback on a virtual clock
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tetris_replay_core::{Match, MatchSnapshot, Player};
//! use tetris_replay_engine::{GameController, GameEvent, LoopConfig};
//!
//! let game = Match::new("m-1", Player::new("ada"), 7);
//! let handle = GameController::new(game, LoopConfig::default())
//!     .with_observer(Arc::new(|event: &GameEvent, _snapshot: &MatchSnapshot| {
//!         if let GameEvent::LevelUp { level } = event {
//!             println!("level {}", level);
//!         }
//!     }))
//!     .spawn()
//!     .unwrap();
//!
//! let input = handle.input();
//! input.hard_drop();
//! handle.stop();
//! let summary = handle.join().unwrap();
//! println!("score {}", summary.score());
//! ```

pub mod config;
pub mod controller;
pub mod events;
pub mod playback;
pub mod recorder;
pub mod simulate;
pub mod step;

pub use config::LoopConfig;
pub use controller::{ControllerHandle, GameController, InputPort, MatchSummary};
pub use events::{GameEvent, Observer};
pub use playback::PlaybackCursor;
pub use recorder::ReplayRecorder;
pub use simulate::{simulate, Simulation};
pub use step::{Step, StepMachine};
