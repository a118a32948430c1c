//! Replay data - the seed plus the ordered log of accepted commands
//!
//! A session is append-only while recording and read-only afterwards. Events
//! carry the elapsed time since match start and, when recorded by the game
//! loop, the number of loop steps completed when the command was applied.
//! Playback keys on the step count when present; the timestamp is the
//! fallback for sessions written without step stamps.

use serde::{Deserialize, Serialize};

use crate::types::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayEvent {
    pub elapsed_ms: u64,
    pub command: Command,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<u64>,
}

impl ReplayEvent {
    pub fn new(elapsed_ms: u64, command: Command) -> Self {
        Self {
            elapsed_ms,
            command,
            step: None,
        }
    }

    pub fn at_step(elapsed_ms: u64, step: u64, command: Command) -> Self {
        Self {
            elapsed_ms,
            command,
            step: Some(step),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaySession {
    pub seed: u64,
    #[serde(default)]
    pub events: Vec<ReplayEvent>,
    /// Loop steps the recorded match ran for, written at finalization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_steps: Option<u64>,
}

impl ReplaySession {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            events: Vec::new(),
            total_steps: None,
        }
    }

    /// Append an event, keeping timestamps and step stamps non-decreasing.
    pub fn push(&mut self, mut event: ReplayEvent) {
        if let Some(last) = self.events.last() {
            event.elapsed_ms = event.elapsed_ms.max(last.elapsed_ms);
            if let (Some(step), Some(prev)) = (event.step, last.step) {
                event.step = Some(step.max(prev));
            }
        }
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Elapsed time of the last event
    pub fn duration_ms(&self) -> u64 {
        self.events.last().map_or(0, |e| e.elapsed_ms)
    }

    /// First reason this session could not have come from a recorder, if any.
    pub fn check_well_formed(&self) -> Option<String> {
        for (index, pair) in self.events.windows(2).enumerate() {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.elapsed_ms < prev.elapsed_ms {
                return Some(format!("event {} goes back in time", index + 1));
            }
            if let (Some(a), Some(b)) = (prev.step, next.step) {
                if b < a {
                    return Some(format!("event {} goes back in steps", index + 1));
                }
            }
        }
        if let Some(index) = self.events.iter().position(|e| !e.command.is_piece_command()) {
            return Some(format!("event {} is not a piece command", index));
        }
        if let (Some(total), Some(last)) = (self.total_steps, self.events.last().and_then(|e| e.step)) {
            if last > total {
                return Some(format!("event step {} exceeds total steps {}", last, total));
            }
        }
        None
    }
}
