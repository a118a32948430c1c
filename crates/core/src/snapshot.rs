use crate::pieces::Piece;
use crate::types::{Cell, PieceKind, Position, BOARD_HEIGHT, BOARD_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: u8,
    pub x: i8,
    pub y: i8,
}

impl From<Piece> for ActiveSnapshot {
    fn from(value: Piece) -> Self {
        Self {
            kind: value.kind,
            rotation: value.rotation() as u8,
            x: value.position.x,
            y: value.position.y,
        }
    }
}

impl ActiveSnapshot {
    pub fn piece(&self) -> Piece {
        Piece::at(self.kind, Position::new(self.x, self.y), self.rotation as usize)
    }

    /// Absolute board coordinates of the occupied cells
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8)> + 'static {
        self.piece().cells()
    }
}

/// Read-only copy of everything a presentation layer may show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchSnapshot {
    pub board: [[Cell; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
    /// Rows flashing before removal
    pub pending_rows: [bool; BOARD_HEIGHT as usize],
    pub active: ActiveSnapshot,
    pub next: PieceKind,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub paused: bool,
    pub game_over: bool,
    pub seed: u64,
    pub player_id: u64,
}

impl MatchSnapshot {
    pub fn playable(&self) -> bool {
        !self.game_over && !self.paused
    }

    pub fn is_animating(&self) -> bool {
        self.pending_rows.iter().any(|&p| p)
    }

    /// Cell at `(x, y)` including the active piece overlay
    pub fn cell_with_active(&self, x: i8, y: i8) -> Cell {
        if self.active.cells().any(|(cx, cy)| cx == x && cy == y) && !self.game_over {
            return Some(self.active.kind.color());
        }
        if x < 0 || y < 0 || x >= BOARD_WIDTH as i8 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        self.board[y as usize][x as usize]
    }
}

impl Default for MatchSnapshot {
    fn default() -> Self {
        Self {
            board: [[None; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            pending_rows: [false; BOARD_HEIGHT as usize],
            active: ActiveSnapshot::from(Piece::spawn(PieceKind::I)),
            next: PieceKind::I,
            score: 0,
            level: 1,
            lines: 0,
            paused: false,
            game_over: false,
            seed: 0,
            player_id: 0,
        }
    }
}
