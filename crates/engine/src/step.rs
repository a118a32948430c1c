//! Step machine - one unit of game-loop progress
//!
//! A step is one of: a gravity tick, the start of a flash for rows that an
//! input hard drop left pending, one flash countdown, or the final countdown
//! that compacts the flashing rows. Steps are counted; the count is what
//! replay events are stamped with, so it must advance identically in live
//! play and in playback.

use tetris_replay_core::{CompactReport, LockReport, Match, TickOutcome};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Ticked(TickOutcome),
    /// Rows were already pending when the step began
    FlashStarted { rows: u32 },
    Flashing { remaining: u8 },
    Compacted(CompactReport),
}

impl Step {
    pub fn lock(&self) -> Option<LockReport> {
        match self {
            Step::Ticked(outcome) => outcome.lock(),
            _ => None,
        }
    }

    /// Rows that began flashing during this step
    pub fn flash_rows(&self) -> Option<u32> {
        match self {
            Step::FlashStarted { rows } => Some(*rows),
            Step::Ticked(TickOutcome::Locked(report)) if report.lines_cleared > 0 => {
                Some(report.lines_cleared)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StepMachine {
    flash_steps: u8,
    remaining: u8,
    steps: u64,
}

impl StepMachine {
    pub fn new(flash_steps: u8) -> Self {
        Self {
            flash_steps: flash_steps.max(1),
            remaining: 0,
            steps: 0,
        }
    }

    /// Steps completed so far
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn is_flashing(&self) -> bool {
        self.remaining > 0
    }

    pub fn step(&mut self, game: &mut Match) -> Step {
        self.steps += 1;

        if self.remaining > 0 {
            self.remaining -= 1;
            if self.remaining > 0 {
                return Step::Flashing {
                    remaining: self.remaining,
                };
            }
            let report = game.compact_pending_rows();
            debug!(
                step = self.steps,
                rows = report.rows_removed,
                garbage = report.garbage_rows,
                "rows compacted"
            );
            return Step::Compacted(report);
        }

        if game.has_pending_rows() {
            self.remaining = self.flash_steps;
            let rows = game.board().pending_rows().len() as u32;
            return Step::FlashStarted { rows };
        }

        let outcome = game.advance_tick();
        if let TickOutcome::Locked(report) = outcome {
            debug!(
                step = self.steps,
                lines = report.lines_cleared,
                score = game.score(),
                "piece locked"
            );
            if report.lines_cleared > 0 {
                self.remaining = self.flash_steps;
            }
        }
        Step::Ticked(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tetris_replay_core::{Board, Piece, Player};
    use tetris_replay_types::{Color, PieceKind, Position, BOARD_WIDTH};

    /// Bottom row filled except the four right-most columns, I piece above the gap
    fn one_line_setup() -> Match {
        let mut board = Board::new();
        for x in 0..BOARD_WIDTH as i8 - 4 {
            board.set(x, 19, Some(Color::Gray));
        }
        let mut game = Match::new("s", Player::new("p"), 1).with_board(board);
        assert!(game.place_active(Piece::at(PieceKind::I, Position::new(6, 0), 0)));
        game
    }

    #[test]
    fn tick_lock_starts_flash_then_compacts() {
        let mut game = one_line_setup();
        let mut machine = StepMachine::new(3);

        let step = loop {
            let step = machine.step(&mut game);
            if step.lock().is_some() {
                break step;
            }
        };
        assert_eq!(step.flash_rows(), Some(1));
        assert!(machine.is_flashing());
        let locked_at = machine.steps();

        assert_eq!(machine.step(&mut game), Step::Flashing { remaining: 2 });
        assert_eq!(machine.step(&mut game), Step::Flashing { remaining: 1 });
        assert!(matches!(machine.step(&mut game), Step::Compacted(r) if r.rows_removed == 1));
        assert!(!game.has_pending_rows());
        assert_eq!(machine.steps(), locked_at + 3);
        assert!(!machine.is_flashing());
    }

    #[test]
    fn rows_pending_from_input_start_a_flash_step() {
        let mut game = one_line_setup();
        let mut machine = StepMachine::new(2);
        let report = game.hard_drop().unwrap();
        assert_eq!(report.lines_cleared, 1);

        assert_eq!(machine.step(&mut game), Step::FlashStarted { rows: 1 });
        assert_eq!(machine.step(&mut game), Step::Flashing { remaining: 1 });
        assert!(matches!(machine.step(&mut game), Step::Compacted(_)));
        assert!(matches!(machine.step(&mut game), Step::Ticked(TickOutcome::Fell)));
        assert_eq!(machine.steps(), 4);
    }

    #[test]
    fn zero_flash_steps_still_compacts_on_its_own_step() {
        let mut game = one_line_setup();
        let mut machine = StepMachine::new(0);
        game.hard_drop();
        assert!(matches!(machine.step(&mut game), Step::FlashStarted { .. }));
        assert!(matches!(machine.step(&mut game), Step::Compacted(_)));
    }
}
