//! Observer notifications
//!
//! Observers run on whichever thread produced the event (the game loop or an
//! input thread) and must marshal to their own context. They are called with
//! the match lock held, so they must return quickly and never call back into
//! the controller. They get a copy of the state, never the match itself.

use std::sync::Arc;

use tetris_replay_core::MatchSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Any mutation; carries nothing beyond the snapshot
    StateChanged,
    /// Full rows were found and started flashing
    LineClearStarted { rows: u32 },
    /// Published once per level transition
    LevelUp { level: u32 },
    GameOver { score: u32 },
    Paused(bool),
}

impl GameEvent {
    /// Events an audio adapter cares about
    pub fn is_cue(&self) -> bool {
        matches!(
            self,
            GameEvent::LineClearStarted { .. } | GameEvent::LevelUp { .. } | GameEvent::GameOver { .. }
        )
    }
}

pub trait Observer: Send + Sync {
    fn on_event(&self, event: &GameEvent, snapshot: &MatchSnapshot);
}

impl<F> Observer for F
where
    F: Fn(&GameEvent, &MatchSnapshot) + Send + Sync,
{
    fn on_event(&self, event: &GameEvent, snapshot: &MatchSnapshot) {
        self(event, snapshot)
    }
}

#[derive(Clone, Default)]
pub(crate) struct Observers {
    list: Vec<Arc<dyn Observer>>,
}

impl Observers {
    pub(crate) fn push(&mut self, observer: Arc<dyn Observer>) {
        self.list.push(observer);
    }

    pub(crate) fn notify(&self, event: &GameEvent, snapshot: &MatchSnapshot) {
        for observer in &self.list {
            observer.on_event(event, snapshot);
        }
    }

    pub(crate) fn notify_all(&self, events: &[GameEvent], snapshot: &MatchSnapshot) {
        for event in events {
            self.notify(event, snapshot);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.list.len()
    }
}
