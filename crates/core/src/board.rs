//! Board module - manages the game grid
//!
//! The board is a 10x20 grid where each cell is empty or holds the display
//! attribute of whatever filled it. Uses a flat array for cache locality and
//! zero allocation.
//!
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19
//! (top to bottom).
//!
//! Line clearing is split in two phases so a flash animation can run in
//! between: [`Board::mark_full_rows`] only flags rows, and
//! [`Board::compact_pending_rows`] removes them later.

use arrayvec::ArrayVec;

use crate::pieces::Piece;
use crate::rng::SimpleRng;
use crate::types::{Cell, Color, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

const WIDTH: usize = BOARD_WIDTH as usize;
const HEIGHT: usize = BOARD_HEIGHT as usize;

/// Row indices, bounded by the board height
pub type RowList = ArrayVec<u8, HEIGHT>;

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
    /// Rows found full and waiting for compaction
    pending: [bool; HEIGHT],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
            pending: [false; HEIGHT],
        }
    }

    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * WIDTH + (x as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= HEIGHT {
            return false;
        }
        self.row(y).iter().all(|cell| cell.is_some())
    }

    fn row(&self, y: usize) -> &[Cell] {
        &self.cells[y * WIDTH..(y + 1) * WIDTH]
    }

    /// Check whether a piece fits at its current position and rotation.
    ///
    /// Every occupied cell must lie within `[0, width)` horizontally and above
    /// the floor. Cells above the visible area (negative row) skip the fill
    /// check; all other cells must be empty.
    pub fn is_position_valid(&self, piece: &Piece) -> bool {
        piece.cells().all(|(x, y)| {
            if x < 0 || x >= BOARD_WIDTH as i8 || y >= BOARD_HEIGHT as i8 {
                return false;
            }
            y < 0 || !self.is_occupied(x, y)
        })
    }

    /// Write a piece's cells into the grid.
    ///
    /// Cells above the visible area are dropped. Callers validate the final
    /// resting position first. Returns the number of cells written.
    pub fn lock(&mut self, piece: &Piece) -> usize {
        let color = piece.color();
        piece
            .cells()
            .filter(|&(x, y)| self.set(x, y, Some(color)))
            .count()
    }

    /// Flag every full row as pending removal and return how many were found.
    ///
    /// Cells are not moved; see [`Board::compact_pending_rows`].
    pub fn mark_full_rows(&mut self) -> usize {
        let mut found = 0;
        for y in (0..HEIGHT).rev() {
            if self.is_row_full(y) {
                self.pending[y] = true;
                found += 1;
            }
        }
        found
    }

    pub fn is_row_pending(&self, y: usize) -> bool {
        y < HEIGHT && self.pending[y]
    }

    pub fn has_pending_rows(&self) -> bool {
        self.pending.iter().any(|&p| p)
    }

    /// Pending rows, bottom to top
    pub fn pending_rows(&self) -> RowList {
        (0..HEIGHT)
            .rev()
            .filter(|&y| self.pending[y])
            .map(|y| y as u8)
            .collect()
    }

    pub fn pending_flags(&self) -> &[bool; HEIGHT] {
        &self.pending
    }

    /// Remove pending rows and let everything above fall into the gap.
    ///
    /// Two-pointer pass from the bottom with `copy_within`, no allocation.
    /// Vacated top rows are cleared and all pending marks reset. A no-op when
    /// nothing is pending. Returns the number of rows removed.
    pub fn compact_pending_rows(&mut self) -> usize {
        let mut removed = 0;
        let mut write_y = HEIGHT;

        for read_y in (0..HEIGHT).rev() {
            if self.pending[read_y] {
                self.pending[read_y] = false;
                removed += 1;
                continue;
            }
            write_y -= 1;
            if write_y != read_y {
                let src = read_y * WIDTH;
                self.cells.copy_within(src..src + WIDTH, write_y * WIDTH);
            }
        }

        for cell in &mut self.cells[..write_y * WIDTH] {
            *cell = None;
        }

        removed
    }

    /// Push `count` garbage rows in from the bottom.
    ///
    /// Each insertion shifts every row up by one (row 0 is discarded) and
    /// fills the new bottom row with gray cells except one hole column drawn
    /// from `rng`.
    pub fn inject_garbage_rows(&mut self, count: usize, rng: &mut SimpleRng) {
        for _ in 0..count {
            self.cells.copy_within(WIDTH.., 0);
            self.pending.copy_within(1.., 0);

            let hole = rng.next_range(WIDTH as u32) as usize;
            let bottom = (HEIGHT - 1) * WIDTH;
            for (x, cell) in self.cells[bottom..].iter_mut().enumerate() {
                *cell = if x == hole { None } else { Some(Color::Gray) };
            }
            self.pending[HEIGHT - 1] = false;
        }
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Copy the grid into a row-major 2D array
    pub fn write_grid(&self, out: &mut [[Cell; WIDTH]; HEIGHT]) {
        for (y, row) in out.iter_mut().enumerate() {
            row.copy_from_slice(self.row(y));
        }
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells = [None; BOARD_SIZE];
        self.pending = [false; HEIGHT];
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
