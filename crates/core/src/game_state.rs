//! Game state module - the match state machine
//!
//! `Match` ties together the board, the active and next pieces, the seeded
//! RNG and scoring. It exposes the only mutating operations: move, rotate,
//! tick, hard drop and compaction of pending rows.
//!
//! Every operation is a silent no-op once the match is over. Edge-triggered
//! outcomes (lines found, level-up, garbage queued) are returned from the
//! call that produced them instead of being stored as flags.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::pieces::Piece;
use crate::player::Player;
use crate::rng::SimpleRng;
use crate::scoring;
use crate::snapshot::{ActiveSnapshot, MatchSnapshot};
use crate::types::Command;
use crate::Board;

/// What happened when the active piece was locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockReport {
    /// Full rows marked pending removal
    pub lines_cleared: u32,
    pub points: u32,
    /// Level after this lock
    pub level: u32,
    pub leveled_up: bool,
    /// Garbage rows queued for injection after compaction
    pub garbage_queued: u32,
    /// The next piece could not spawn
    pub game_over: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The piece moved down one row
    Fell,
    /// The piece could not fall and was locked
    Locked(LockReport),
    /// Game over, or rows are still waiting for compaction
    Rejected,
}

impl TickOutcome {
    pub fn lock(&self) -> Option<LockReport> {
        match self {
            TickOutcome::Locked(report) => Some(*report),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompactReport {
    pub rows_removed: u32,
    pub garbage_rows: u32,
    /// Injected garbage pushed the board into the active piece
    pub game_over: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommandOutcome {
    /// The command changed the match (and may be recorded)
    pub accepted: bool,
    pub lock: Option<LockReport>,
}

impl CommandOutcome {
    fn rejected() -> Self {
        Self::default()
    }

    fn moved(accepted: bool) -> Self {
        Self {
            accepted,
            lock: None,
        }
    }
}

/// Seed derived from the wall clock, for live play
pub fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(1)
}

/// One match: board, pieces, counters and the RNG stream.
#[derive(Debug, Clone)]
pub struct Match {
    id: String,
    player: Player,
    board: Board,
    active: Piece,
    next: Piece,
    score: u32,
    level: u32,
    lines: u32,
    game_over: bool,
    /// Captured at creation, never changes
    seed: u64,
    /// Mutated only by piece draws
    rng: SimpleRng,
    garbage_rng: SimpleRng,
    queued_garbage: u32,
    pieces_locked: u32,
}

impl Match {
    /// Create a new match with the given RNG seed
    pub fn new(id: impl Into<String>, player: Player, seed: u64) -> Self {
        let mut rng = SimpleRng::new(seed);
        let active = Piece::spawn(rng.next_kind());
        let next = Piece::spawn(rng.next_kind());

        Self {
            id: id.into(),
            player,
            board: Board::new(),
            active,
            next,
            score: 0,
            level: 1,
            lines: 0,
            game_over: false,
            seed,
            rng,
            garbage_rng: SimpleRng::for_garbage(seed),
            queued_garbage: 0,
            pieces_locked: 0,
        }
    }

    /// Create a match seeded from the current time
    pub fn with_time_seed(id: impl Into<String>, player: Player) -> Self {
        Self::new(id, player, time_seed())
    }

    /// Start from a prepared board (puzzles, tests)
    pub fn with_board(mut self, board: Board) -> Self {
        self.board = board;
        if !self.board.is_position_valid(&self.active) {
            self.game_over = true;
        }
        self
    }

    /// Replace the active piece if it fits where it is
    pub fn place_active(&mut self, piece: Piece) -> bool {
        if self.game_over {
            return false;
        }
        self.commit_if_valid(piece)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Reassign the owning player; allowed at any time
    pub fn set_player(&mut self, player: Player) {
        self.player = player;
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> Piece {
        self.active
    }

    pub fn next(&self) -> Piece {
        self.next
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn queued_garbage(&self) -> u32 {
        self.queued_garbage
    }

    pub fn pieces_locked(&self) -> u32 {
        self.pieces_locked
    }

    pub fn has_pending_rows(&self) -> bool {
        self.board.has_pending_rows()
    }

    /// Try to move the active piece; the live piece changes only on success.
    pub fn try_move(&mut self, dx: i8, dy: i8) -> bool {
        if self.game_over {
            return false;
        }
        self.commit_if_valid(self.active.moved(dx, dy))
    }

    /// Advance to the next rotation state in place. No kicks.
    pub fn try_rotate(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        self.commit_if_valid(self.active.rotated())
    }

    fn commit_if_valid(&mut self, candidate: Piece) -> bool {
        if self.board.is_position_valid(&candidate) {
            self.active = candidate;
            true
        } else {
            false
        }
    }

    /// One gravity step: fall one row, or lock when resting.
    pub fn advance_tick(&mut self) -> TickOutcome {
        if self.game_over || self.board.has_pending_rows() {
            return TickOutcome::Rejected;
        }
        if self.try_move(0, 1) {
            return TickOutcome::Fell;
        }
        TickOutcome::Locked(self.lock_active())
    }

    /// Drop the active piece to its resting row and lock it.
    pub fn hard_drop(&mut self) -> Option<LockReport> {
        if self.game_over || self.board.has_pending_rows() {
            return None;
        }
        while self.try_move(0, 1) {}
        Some(self.lock_active())
    }

    /// Apply a player command. `TogglePause` is never accepted here.
    pub fn apply(&mut self, command: Command) -> CommandOutcome {
        if self.game_over {
            return CommandOutcome::rejected();
        }
        match command {
            Command::MoveLeft => CommandOutcome::moved(self.try_move(-1, 0)),
            Command::MoveRight => CommandOutcome::moved(self.try_move(1, 0)),
            Command::SoftDrop => CommandOutcome::moved(self.try_move(0, 1)),
            Command::Rotate => CommandOutcome::moved(self.try_rotate()),
            Command::HardDrop => match self.hard_drop() {
                Some(report) => CommandOutcome {
                    accepted: true,
                    lock: Some(report),
                },
                None => CommandOutcome::rejected(),
            },
            Command::TogglePause => CommandOutcome::rejected(),
        }
    }

    fn lock_active(&mut self) -> LockReport {
        self.board.lock(&self.active);
        self.pieces_locked = self.pieces_locked.saturating_add(1);

        let cleared = self.board.mark_full_rows() as u32;
        let mut report = LockReport {
            lines_cleared: cleared,
            level: self.level,
            ..LockReport::default()
        };

        if cleared > 0 {
            // Points use the level in effect before this clear.
            report.points = scoring::points(cleared, self.level);
            self.score = self.score.saturating_add(report.points);
            self.lines = self.lines.saturating_add(cleared);

            let new_level = scoring::next_level(self.lines);
            if new_level > self.level {
                report.garbage_queued = (self.level + 1..=new_level)
                    .map(scoring::garbage_rows_for_level)
                    .sum();
                self.queued_garbage += report.garbage_queued;
                self.level = new_level;
                report.level = new_level;
                report.leveled_up = true;
            }
        }

        self.active = self.next;
        self.next = Piece::spawn(self.rng.next_kind());
        if !self.board.is_position_valid(&self.active) {
            self.game_over = true;
        }
        report.game_over = self.game_over;
        report
    }

    /// Remove pending rows, then inject any queued garbage.
    pub fn compact_pending_rows(&mut self) -> CompactReport {
        if self.game_over {
            return CompactReport::default();
        }
        let rows_removed = self.board.compact_pending_rows() as u32;
        let garbage_rows = std::mem::take(&mut self.queued_garbage);
        if garbage_rows > 0 {
            self.board
                .inject_garbage_rows(garbage_rows as usize, &mut self.garbage_rng);
            if !self.board.is_position_valid(&self.active) {
                self.game_over = true;
            }
        }
        CompactReport {
            rows_removed,
            garbage_rows,
            game_over: self.game_over,
        }
    }

    /// Copy the visible state into an existing snapshot
    pub fn snapshot_into(&self, out: &mut MatchSnapshot) {
        self.board.write_grid(&mut out.board);
        out.pending_rows = *self.board.pending_flags();
        out.active = ActiveSnapshot::from(self.active);
        out.next = self.next.kind;
        out.score = self.score;
        out.level = self.level;
        out.lines = self.lines;
        out.game_over = self.game_over;
        out.seed = self.seed;
        out.player_id = self.player.id;
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        let mut out = MatchSnapshot::default();
        self.snapshot_into(&mut out);
        out
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[cfg(test)]
    pub(crate) fn set_progress(&mut self, lines: u32, level: u32) {
        self.lines = lines;
        self.level = level;
    }
}
