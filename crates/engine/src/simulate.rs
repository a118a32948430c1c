//! Headless playback - runs a recorded session through the step machine
//! without sleeping, on a virtual clock.

use tetris_replay_core::{Match, Player, ReplaySession};
use tracing::debug;

use crate::config::LoopConfig;
use crate::playback::PlaybackCursor;
use crate::step::StepMachine;

#[derive(Debug, Clone)]
pub struct Simulation {
    pub game: Match,
    pub steps: u64,
    pub events_applied: usize,
    /// Every event was applied and the recorded step count reached
    pub complete: bool,
}

/// Replay `session` to its end and return the final match.
pub fn simulate(session: &ReplaySession, player: Player, config: &LoopConfig) -> Simulation {
    let mut game = Match::new(format!("replay-{}", session.seed), player, session.seed);
    let mut machine = StepMachine::new(config.flash_steps);
    let mut cursor = PlaybackCursor::new(session.clone());
    let mut clock_ms: u64 = 0;

    loop {
        while let Some(command) = cursor.next_due(machine.steps(), clock_ms) {
            game.apply(command);
        }
        if game.is_game_over() || cursor.is_finished(machine.steps()) {
            break;
        }
        machine.step(&mut game);
        let delay = config.step_delay(machine.is_flashing(), game.level());
        clock_ms = clock_ms.saturating_add(delay.as_millis() as u64);
    }

    let complete = cursor.is_finished(machine.steps());
    debug!(
        seed = session.seed,
        steps = machine.steps(),
        applied = cursor.applied(),
        score = game.score(),
        game_over = game.is_game_over(),
        "simulation finished"
    );
    Simulation {
        steps: machine.steps(),
        events_applied: cursor.applied(),
        complete,
        game,
    }
}
