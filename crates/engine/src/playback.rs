//! Playback cursor over a recorded session
//!
//! Events carrying a step stamp become due once the loop has completed that
//! many steps. Events without one fall back to elapsed playback time.

use tetris_replay_core::ReplaySession;
use tetris_replay_types::Command;

#[derive(Debug, Clone)]
pub struct PlaybackCursor {
    session: ReplaySession,
    next: usize,
}

impl PlaybackCursor {
    pub fn new(session: ReplaySession) -> Self {
        Self { session, next: 0 }
    }

    pub fn seed(&self) -> u64 {
        self.session.seed
    }

    pub fn applied(&self) -> usize {
        self.next
    }

    pub fn remaining(&self) -> usize {
        self.session.events.len() - self.next
    }

    pub fn is_exhausted(&self) -> bool {
        self.next >= self.session.events.len()
    }

    /// Events are exhausted and the recorded step count, if any, is reached
    pub fn is_finished(&self, steps_done: u64) -> bool {
        self.is_exhausted()
            && self
                .session
                .total_steps
                .map_or(true, |total| steps_done >= total)
    }

    /// Take the next due command, if any. Each event is yielded exactly once,
    /// in recorded order.
    pub fn next_due(&mut self, steps_done: u64, elapsed_ms: u64) -> Option<Command> {
        let event = self.session.events.get(self.next)?;
        let due = match event.step {
            Some(step) => step <= steps_done,
            None => event.elapsed_ms <= elapsed_ms,
        };
        if !due {
            return None;
        }
        self.next += 1;
        Some(event.command)
    }
}
