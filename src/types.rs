use std::fmt;

use serde::{Deserialize, Serialize};

/// Side of a piece or of the player to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    White,
}

impl Color {
    pub const fn opposite(self) -> Self {
        match self {
            Self::Red => Self::White,
            Self::White => Self::Red,
        }
    }

    /// Row step of a forward move: red travels up the board, white down.
    pub const fn forward(self) -> i8 {
        match self {
            Self::Red => -1,
            Self::White => 1,
        }
    }

    /// Row on which a piece of this color is crowned.
    pub const fn promotion_row(self) -> u8 {
        match self {
            Self::Red => 0,
            Self::White => 7,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Red => "Red",
            Self::White => "White",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A board coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Only dark cells can ever hold a piece.
    pub const fn is_dark(self) -> bool {
        (self.row + self.col) % 2 == 1
    }
}

/// One piece as seen by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PieceView {
    pub row: u8,
    pub col: u8,
    pub color: Color,
    pub king: bool,
}

/// A highlighted destination of the selected piece.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveHint {
    pub row: u8,
    pub col: u8,
    /// Contract: positions of the pieces removed by this move, empty for a plain step.
    pub captures: Vec<Position>,
}

/// Public game state returned from WASM APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub pieces: Vec<PieceView>,
    pub turn: Color,
    pub selected: Option<Position>,
    pub valid_moves: Vec<MoveHint>,
    pub red_count: u8,
    pub white_count: u8,
    pub red_kings: u8,
    pub white_kings: u8,
    pub is_game_over: bool,
    pub winner: Option<Color>,
}

/// Final result after game over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameResult {
    pub winner: Option<Color>,
    pub red_count: u8,
    pub white_count: u8,
    pub message: String,
}
