//! Storage adapters - replay sessions and match results
//!
//! Both concerns sit behind a trait so the game loop can be handed any
//! backend. File-backed implementations are the default; in-memory ones
//! serve tests and headless runs.
//!
//! Failures surface as [`StoreError`] and are the caller's to report. They
//! never feed back into match state.

pub mod config;
pub mod error;
pub mod match_store;
pub mod replay_store;

pub use config::StorageConfig;
pub use error::StoreError;
pub use match_store::{JsonlMatchStore, MatchRecord, MatchStore, MemoryMatchStore, PlayerStats};
pub use replay_store::{JsonFileReplayStore, MemoryReplayStore, ReplayStore};
