//! Tetris replay (workspace facade crate).
//!
//! Re-exports the member crates under short names so the binary, the
//! integration tests and the benchmarks share one import path:
//! `tetris_replay::{core, engine, input, store, term, types}`.

pub mod frontend;

pub use tetris_replay_core as core;
pub use tetris_replay_engine as engine;
pub use tetris_replay_input as input;
pub use tetris_replay_store as store;
pub use tetris_replay_term as term;
pub use tetris_replay_types as types;
