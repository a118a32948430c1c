//! Pieces module - tetromino catalog and the falling piece value
//!
//! Every kind owns an ordered list of rotation states. Each state is a 4x4
//! occupancy grid anchored at the piece's top-left [`Position`]; unused cells
//! are padding, so all states of one kind share the same dimensions.
//!
//! Rotation has no wall kicks: a rotation that collides is rejected as is.

use crate::types::{Color, PieceKind, Position};

/// Side length of every rotation grid
pub const GRID_SIZE: usize = 4;

/// Occupancy grid of one rotation state, indexed `[row][col]`
pub type ShapeGrid = [[bool; GRID_SIZE]; GRID_SIZE];

/// Build a grid from four text rows (`#` = occupied).
const fn grid(rows: [&str; GRID_SIZE]) -> ShapeGrid {
    let mut out = [[false; GRID_SIZE]; GRID_SIZE];
    let mut r = 0;
    while r < GRID_SIZE {
        let bytes = rows[r].as_bytes();
        let mut c = 0;
        while c < GRID_SIZE && c < bytes.len() {
            out[r][c] = bytes[c] == b'#';
            c += 1;
        }
        r += 1;
    }
    out
}

static I_ROTATIONS: [ShapeGrid; 2] = [
    grid(["####", "....", "....", "...."]),
    grid(["#...", "#...", "#...", "#..."]),
];

static O_ROTATIONS: [ShapeGrid; 1] = [grid([".##.", ".##.", "....", "...."])];

static T_ROTATIONS: [ShapeGrid; 4] = [
    grid([".#..", "###.", "....", "...."]),
    grid([".#..", ".##.", ".#..", "...."]),
    grid(["....", "###.", ".#..", "...."]),
    grid([".#..", "##..", ".#..", "...."]),
];

static S_ROTATIONS: [ShapeGrid; 2] = [
    grid([".##.", "##..", "....", "...."]),
    grid(["#...", "##..", ".#..", "...."]),
];

static Z_ROTATIONS: [ShapeGrid; 2] = [
    grid(["##..", ".##.", "....", "...."]),
    grid([".#..", "##..", "#...", "...."]),
];

static J_ROTATIONS: [ShapeGrid; 4] = [
    grid(["#...", "###.", "....", "...."]),
    grid([".##.", ".#..", ".#..", "...."]),
    grid(["....", "###.", "..#.", "...."]),
    grid([".#..", ".#..", "##..", "...."]),
];

static L_ROTATIONS: [ShapeGrid; 4] = [
    grid(["..#.", "###.", "....", "...."]),
    grid([".#..", ".#..", ".##.", "...."]),
    grid(["....", "###.", "#...", "...."]),
    grid(["##..", ".#..", ".#..", "...."]),
];

/// Rotation table and display attribute of one piece kind
#[derive(Debug)]
pub struct PieceShape {
    kind: PieceKind,
    rotations: &'static [ShapeGrid],
}

static I_SHAPE: PieceShape = PieceShape {
    kind: PieceKind::I,
    rotations: &I_ROTATIONS,
};
static O_SHAPE: PieceShape = PieceShape {
    kind: PieceKind::O,
    rotations: &O_ROTATIONS,
};
static T_SHAPE: PieceShape = PieceShape {
    kind: PieceKind::T,
    rotations: &T_ROTATIONS,
};
static S_SHAPE: PieceShape = PieceShape {
    kind: PieceKind::S,
    rotations: &S_ROTATIONS,
};
static Z_SHAPE: PieceShape = PieceShape {
    kind: PieceKind::Z,
    rotations: &Z_ROTATIONS,
};
static J_SHAPE: PieceShape = PieceShape {
    kind: PieceKind::J,
    rotations: &J_ROTATIONS,
};
static L_SHAPE: PieceShape = PieceShape {
    kind: PieceKind::L,
    rotations: &L_ROTATIONS,
};

/// Look up the catalog entry for a piece kind
pub fn shape(kind: PieceKind) -> &'static PieceShape {
    match kind {
        PieceKind::I => &I_SHAPE,
        PieceKind::O => &O_SHAPE,
        PieceKind::T => &T_SHAPE,
        PieceKind::S => &S_SHAPE,
        PieceKind::Z => &Z_SHAPE,
        PieceKind::J => &J_SHAPE,
        PieceKind::L => &L_SHAPE,
    }
}

impl PieceShape {
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn color(&self) -> Color {
        self.kind.color()
    }

    pub fn rotation_count(&self) -> usize {
        self.rotations.len()
    }

    /// Grid for a rotation index; any index is valid (taken modulo the count).
    pub fn rotation(&self, index: usize) -> &'static ShapeGrid {
        &self.rotations[index % self.rotations.len()]
    }

    /// Occupied `(col, row)` offsets of a rotation state, row-major.
    pub fn offsets(&self, index: usize) -> impl Iterator<Item = (i8, i8)> + 'static {
        let grid = self.rotation(index);
        (0..GRID_SIZE).flat_map(move |row| {
            (0..GRID_SIZE)
                .filter(move |&col| grid[row][col])
                .map(move |col| (col as i8, row as i8))
        })
    }
}

/// A falling piece: kind, bounding-box position and rotation index.
///
/// `Piece` is a small `Copy` value. Speculative moves build a candidate with
/// [`Piece::moved`] / [`Piece::rotated`] and only replace the live piece once
/// the board accepts the candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub position: Position,
    rotation: usize,
}

impl Piece {
    /// Create a new piece at the spawn position, rotation 0
    pub fn spawn(kind: PieceKind) -> Self {
        Self::at(kind, Position::spawn(), 0)
    }

    pub fn at(kind: PieceKind, position: Position, rotation: usize) -> Self {
        Self {
            kind,
            position,
            rotation: rotation % shape(kind).rotation_count(),
        }
    }

    pub fn rotation(&self) -> usize {
        self.rotation
    }

    pub fn shape(&self) -> &'static PieceShape {
        shape(self.kind)
    }

    pub fn grid(&self) -> &'static ShapeGrid {
        self.shape().rotation(self.rotation)
    }

    pub fn color(&self) -> Color {
        self.kind.color()
    }

    /// Absolute board coordinates of every occupied cell
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8)> + 'static {
        let Position { x, y } = self.position;
        self.shape()
            .offsets(self.rotation)
            .map(move |(dx, dy)| (x + dx, y + dy))
    }

    pub fn moved(&self, dx: i8, dy: i8) -> Self {
        Self {
            position: self.position.moved(dx, dy),
            ..*self
        }
    }

    /// Candidate with the next rotation state, same position
    pub fn rotated(&self) -> Self {
        Self {
            rotation: (self.rotation + 1) % self.shape().rotation_count(),
            ..*self
        }
    }
}
