//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the engine.
//! All types are plain data, usable from the core state machine, the game
//! loop, storage adapters and the terminal front-end alike.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, row 0 at the top)
//! - **Spawn position**: (4, 0), rotation 0
//!
//! # Game Loop Timing
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `BASE_DROP_MS` | 800 | Fall interval at level 1 |
//! | `DROP_FACTOR` | 0.75 | Interval multiplier per level |
//! | `MIN_DROP_MS` | 30 | Fall interval floor |
//! | `LINE_CLEAR_FLASH_STEPS` | 3 | Loop steps a cleared row flashes before removal |
//! | `LINE_CLEAR_FLASH_MS` | 150 | Sleep between flash steps |
//! | `PAUSE_POLL_MS` | 100 | Poll interval while paused |
//!
//! # Scoring
//!
//! Base points `[0, 100, 300, 500, 800]` for 0-4 cleared lines, scaled by
//! `1 + 0.25 * (level - 1)`. The level rises every 4 lines.
//!
//! # Examples
//!
//! ```
//! use tetris_replay_types::{Command, PieceKind, Position, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let kind = PieceKind::from_str("t").unwrap();
//! assert_eq!(kind, PieceKind::T);
//!
//! let command = Command::from_str("hardDrop").unwrap();
//! assert_eq!(command, Command::HardDrop);
//!
//! let pos = Position::new(4, 0).moved(-1, 1);
//! assert_eq!((pos.x, pos.y), (3, 1));
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

use serde::{Deserialize, Serialize};

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Spawn column of a new piece's bounding box
pub const SPAWN_X: i8 = 4;

/// Spawn row of a new piece's bounding box
pub const SPAWN_Y: i8 = 0;

/// Fall interval at level 1 (800ms per row)
pub const BASE_DROP_MS: u64 = 800;

/// Per-level multiplier applied to the fall interval
pub const DROP_FACTOR: f64 = 0.75;

/// Fall interval floor (30ms)
pub const MIN_DROP_MS: u64 = 30;

/// Number of loop steps a full row flashes before it is removed
pub const LINE_CLEAR_FLASH_STEPS: u8 = 3;

/// Sleep between two flash steps (150ms)
pub const LINE_CLEAR_FLASH_MS: u64 = 150;

/// Poll interval while the loop is paused (100ms)
pub const PAUSE_POLL_MS: u64 = 100;

/// Base points for clearing 0..=4 lines at level 1
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// Lines needed to advance one level
pub const LINES_PER_LEVEL: u32 = 4;

/// First level that injects a garbage row
pub const GARBAGE_FIRST_LEVEL: u32 = 5;

/// Every this many levels after the first garbage level, inject again
pub const GARBAGE_LEVEL_STRIDE: u32 = 3;

/// The seven tetromino piece kinds
///
/// Draw order for the random generator follows [`PieceKind::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds, in random-draw index order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// ```
    /// use tetris_replay_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }

    /// Display attribute used when this kind is locked onto the board
    pub fn color(&self) -> Color {
        match self {
            PieceKind::I => Color::Cyan,
            PieceKind::O => Color::Yellow,
            PieceKind::T => Color::Purple,
            PieceKind::S => Color::Green,
            PieceKind::Z => Color::Red,
            PieceKind::J => Color::Blue,
            PieceKind::L => Color::Orange,
        }
    }
}

/// Display attribute of a filled board cell.
///
/// Locked cells keep the color of the piece that filled them; garbage rows
/// are [`Color::Gray`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Cyan,
    Yellow,
    Purple,
    Green,
    Red,
    Blue,
    Orange,
    Gray,
}

impl Color {
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Cyan => "cyan",
            Color::Yellow => "yellow",
            Color::Purple => "purple",
            Color::Green => "green",
            Color::Red => "red",
            Color::Blue => "blue",
            Color::Orange => "orange",
            Color::Gray => "gray",
        }
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(Color)`: Filled cell with its display attribute
pub type Cell = Option<Color>;

/// Board coordinate of a piece's bounding box (top-left corner).
///
/// `x` grows to the right, `y` grows downwards. Negative `y` is above the
/// visible area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i8,
    pub y: i8,
}

impl Position {
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    /// Spawn position for new pieces
    pub const fn spawn() -> Self {
        Self::new(SPAWN_X, SPAWN_Y)
    }

    /// Return a new position shifted by `(dx, dy)`.
    pub fn moved(self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

/// Discrete player commands.
///
/// Produced by the keyboard input source or synthesized from a replay
/// session. [`Command::TogglePause`] is handled by the game loop and never
/// reaches the match nor the replay log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Command {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Move piece one cell down
    SoftDrop,
    /// Advance to the next rotation state
    Rotate,
    /// Drop piece to its resting position and lock it
    HardDrop,
    /// Pause or resume the game loop
    TogglePause,
}

impl Command {
    /// Commands that act on the match and may be recorded in a replay.
    pub const PIECE_COMMANDS: [Command; 5] = [
        Command::MoveLeft,
        Command::MoveRight,
        Command::SoftDrop,
        Command::Rotate,
        Command::HardDrop,
    ];

    /// Parse command from string (case-insensitive, `-`/`_` ignored)
    ///
    /// ```
    /// use tetris_replay_types::Command;
    ///
    /// assert_eq!(Command::from_str("moveLeft"), Some(Command::MoveLeft));
    /// assert_eq!(Command::from_str("hard-drop"), Some(Command::HardDrop));
    /// assert_eq!(Command::from_str("unknown"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "moveleft" => Some(Command::MoveLeft),
            "moveright" => Some(Command::MoveRight),
            "softdrop" => Some(Command::SoftDrop),
            "rotate" => Some(Command::Rotate),
            "harddrop" => Some(Command::HardDrop),
            "togglepause" | "pause" => Some(Command::TogglePause),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Command::MoveLeft => "moveLeft",
            Command::MoveRight => "moveRight",
            Command::SoftDrop => "softDrop",
            Command::Rotate => "rotate",
            Command::HardDrop => "hardDrop",
            Command::TogglePause => "togglePause",
        }
    }

    /// Whether this command mutates the match (and so can be recorded).
    pub fn is_piece_command(&self) -> bool {
        !matches!(self, Command::TogglePause)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing_defaults_match_reference_loop() {
        assert_eq!(BASE_DROP_MS, 800);
        assert_eq!(MIN_DROP_MS, 30);
        assert_eq!(LINE_CLEAR_FLASH_STEPS, 3);
        assert_eq!(LINE_CLEAR_FLASH_MS, 150);
        assert_eq!(PAUSE_POLL_MS, 100);
        assert!(DROP_FACTOR < 1.0);
    }

    #[test]
    fn piece_kind_roundtrips_through_str() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_str(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn every_kind_has_a_distinct_color() {
        let mut colors: Vec<Color> = PieceKind::ALL.iter().map(|k| k.color()).collect();
        colors.sort_by_key(|c| c.as_str());
        colors.dedup();
        assert_eq!(colors.len(), 7);
        assert!(!colors.contains(&Color::Gray));
    }

    #[test]
    fn command_parses_camel_and_kebab_case() {
        for command in Command::PIECE_COMMANDS {
            assert_eq!(Command::from_str(command.as_str()), Some(command));
        }
        assert_eq!(Command::from_str("move-right"), Some(Command::MoveRight));
        assert_eq!(Command::from_str("SOFT_DROP"), Some(Command::SoftDrop));
        assert_eq!(Command::from_str("pause"), Some(Command::TogglePause));
    }

    #[test]
    fn command_serializes_as_kebab_case() {
        let json = serde_json::to_string(&Command::HardDrop).unwrap();
        assert_eq!(json, "\"hard-drop\"");
        let back: Command = serde_json::from_str("\"move-left\"").unwrap();
        assert_eq!(back, Command::MoveLeft);
    }

    #[test]
    fn toggle_pause_is_not_a_piece_command() {
        assert!(!Command::TogglePause.is_piece_command());
        assert!(Command::PIECE_COMMANDS.iter().all(|c| c.is_piece_command()));
    }

    #[test]
    fn position_moved_returns_new_value() {
        let start = Position::spawn();
        let moved = start.moved(1, 2);
        assert_eq!(start, Position::new(SPAWN_X, SPAWN_Y));
        assert_eq!(moved, Position::new(SPAWN_X + 1, SPAWN_Y + 2));
    }
}
