use std::time::Instant;

use tetris_replay_core::{ReplayEvent, ReplaySession};
use tetris_replay_types::Command;

/// Append-only log of accepted commands for the running match
#[derive(Debug, Clone)]
pub struct ReplayRecorder {
    session: ReplaySession,
    started: Instant,
}

impl ReplayRecorder {
    pub fn new(seed: u64) -> Self {
        Self::starting_at(seed, Instant::now())
    }

    pub fn starting_at(seed: u64, started: Instant) -> Self {
        Self {
            session: ReplaySession::new(seed),
            started,
        }
    }

    /// Log an accepted command, stamped with elapsed time and completed steps
    pub fn record(&mut self, command: Command, step: u64) {
        let elapsed_ms = self.started.elapsed().as_millis() as u64;
        self.session
            .push(ReplayEvent::at_step(elapsed_ms, step, command));
    }

    pub fn session(&self) -> &ReplaySession {
        &self.session
    }

    pub fn len(&self) -> usize {
        self.session.len()
    }

    pub fn is_empty(&self) -> bool {
        self.session.is_empty()
    }

    /// Close the log; `total_steps` is the loop's step count at the end
    pub fn finish(mut self, total_steps: u64) -> ReplaySession {
        self.session.total_steps = Some(total_steps);
        self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_order_with_steps() {
        let mut recorder = ReplayRecorder::new(5);
        recorder.record(Command::MoveLeft, 0);
        recorder.record(Command::HardDrop, 3);
        let session = recorder.finish(10);

        assert_eq!(session.seed, 5);
        assert_eq!(session.total_steps, Some(10));
        let steps: Vec<_> = session.events.iter().map(|e| e.step).collect();
        assert_eq!(steps, vec![Some(0), Some(3)]);
        assert!(session.events[0].elapsed_ms <= session.events[1].elapsed_ms);
        assert!(session.check_well_formed().is_none());
    }
}
