use std::collections::BTreeMap;

use crate::piece::Piece;
use crate::types::{Color, Position};

pub const BOARD_SIZE: usize = 8;
const PIECES_PER_SIDE: u8 = 12;
const KING_WEIGHT: f32 = 0.5;
const RED_KING_PENALTY: f32 = 0.5;
const COLUMN_STEPS: [i8; 2] = [-1, 1];

/// Destination -> positions of the pieces jumped to reach it (empty for a plain step).
pub type ValidMoves = BTreeMap<Position, Vec<Position>>;

/// Checkers board: an 8x8 mailbox plus running piece and king counters.
///
/// The board is a plain value, so copying it for lookahead never aliases the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    grid: [[Option<Piece>; BOARD_SIZE]; BOARD_SIZE],
    red_left: u8,
    white_left: u8,
    red_kings: u8,
    white_kings: u8,
}

impl Board {
    /// Creates the initial board:
    /// white on the dark cells of rows 0..=2, red on rows 5..=7.
    pub fn new() -> Self {
        let mut board = Self::empty();
        for row in 0..BOARD_SIZE as u8 {
            for col in 0..BOARD_SIZE as u8 {
                if !Position::new(row, col).is_dark() {
                    continue;
                }
                if row < 3 {
                    board.put(Piece::new(row, col, Color::White));
                } else if row > 4 {
                    board.put(Piece::new(row, col, Color::Red));
                }
            }
        }
        debug_assert_eq!(board.counts(), (PIECES_PER_SIDE, PIECES_PER_SIDE));
        board
    }

    pub fn empty() -> Self {
        Self {
            grid: [[None; BOARD_SIZE]; BOARD_SIZE],
            red_left: 0,
            white_left: 0,
            red_kings: 0,
            white_kings: 0,
        }
    }

    /// Builds a board from an arbitrary set of pieces.
    pub fn from_pieces(pieces: &[Piece]) -> Result<Self, String> {
        let mut board = Self::empty();
        for piece in pieces {
            board.place(*piece)?;
        }
        Ok(board)
    }

    /// Adds a piece on an empty dark cell.
    pub fn place(&mut self, piece: Piece) -> Result<(), String> {
        let pos = piece.position();
        if !in_bounds(pos) {
            return Err(format!("({}, {}) is off the board", pos.row, pos.col));
        }
        if !pos.is_dark() {
            return Err(format!("({}, {}) is a light cell", pos.row, pos.col));
        }
        if self.cell(pos).is_some() {
            return Err(format!("({}, {}) is already occupied", pos.row, pos.col));
        }
        self.put(piece);
        Ok(())
    }

    pub fn piece_at(&self, row: u8, col: u8) -> Option<Piece> {
        let pos = Position::new(row, col);
        if in_bounds(pos) { self.cell(pos) } else { None }
    }

    /// Pieces of one color in row-major order.
    pub fn pieces(&self, color: Color) -> Vec<Piece> {
        self.all_pieces()
            .into_iter()
            .filter(|piece| piece.color == color)
            .collect()
    }

    pub fn all_pieces(&self) -> Vec<Piece> {
        self.grid.iter().flatten().flatten().copied().collect()
    }

    /// Returns `(red_count, white_count)`.
    pub fn counts(&self) -> (u8, u8) {
        (self.red_left, self.white_left)
    }

    /// Returns `(red_kings, white_kings)`.
    pub fn kings(&self) -> (u8, u8) {
        (self.red_kings, self.white_kings)
    }

    /// Moves the occupant of `from` to `to`, crowning it on its last row.
    /// Caller contract: `to` comes from `valid_moves` for that piece.
    pub fn move_piece(&mut self, from: Position, to: Position) {
        if !in_bounds(from) || !in_bounds(to) {
            return;
        }
        let Some(mut piece) = self.cell(from) else {
            return;
        };

        let displaced = self.cell(to).map(|mut other| {
            other.relocate(from);
            other
        });
        piece.relocate(to);

        if !piece.king && to.row == piece.color.promotion_row() {
            piece.make_king();
            *self.kings_mut(piece.color) += 1;
        }

        self.set(from, displaced);
        self.set(to, Some(piece));
    }

    /// Clears every listed cell, keeping the counters in step.
    pub fn remove(&mut self, positions: &[Position]) {
        for &pos in positions {
            if !in_bounds(pos) {
                continue;
            }
            let Some(piece) = self.cell(pos) else {
                continue;
            };
            self.set(pos, None);
            *self.left_mut(piece.color) -= 1;
            if piece.king {
                *self.kings_mut(piece.color) -= 1;
            }
        }
    }

    /// Returns every destination of `piece` with the pieces it captures on the way.
    ///
    /// Men look forward only, kings in both row directions. A capture keeps looking
    /// from its landing cell in the same row direction, and only the end of a chain is
    /// reported. Captures are not preferred over plain steps.
    pub fn valid_moves(&self, piece: &Piece) -> ValidMoves {
        let mut moves = ValidMoves::new();
        for row_step in piece.row_directions() {
            for col_step in COLUMN_STEPS {
                self.walk_diagonal(
                    piece.position(),
                    row_step,
                    col_step,
                    piece.color,
                    &[],
                    &mut moves,
                );
            }
        }
        moves
    }

    /// Static score, positive when white is ahead.
    pub fn evaluate(&self) -> f32 {
        let material = self.white_left as f32 - self.red_left as f32;
        let kings = self.white_kings as f32 - self.red_kings as f32;
        material + KING_WEIGHT * kings - RED_KING_PENALTY * self.red_kings as f32
    }

    /// The side whose opponent has no pieces left.
    pub fn winner(&self) -> Option<Color> {
        if self.red_left == 0 {
            Some(Color::White)
        } else if self.white_left == 0 {
            Some(Color::Red)
        } else {
            None
        }
    }

    /// Walks one diagonal, returning whether any destination was recorded.
    fn walk_diagonal(
        &self,
        from: Position,
        row_step: i8,
        col_step: i8,
        color: Color,
        captured: &[Position],
        moves: &mut ValidMoves,
    ) -> bool {
        let Some(next) = offset(from, row_step, col_step) else {
            return false;
        };

        match self.cell(next) {
            None => {
                // A chain may not end with a plain step.
                if !captured.is_empty() {
                    return false;
                }
                moves.entry(next).or_default();
                true
            }
            Some(occupant) if occupant.color == color => false,
            Some(_) => {
                let Some(landing) = offset(next, row_step, col_step) else {
                    return false;
                };
                if self.cell(landing).is_some() {
                    return false;
                }

                let mut chain = Vec::with_capacity(captured.len() + 1);
                chain.push(next);
                chain.extend_from_slice(captured);

                let mut continued = false;
                for step in COLUMN_STEPS {
                    continued |=
                        self.walk_diagonal(landing, row_step, step, color, &chain, moves);
                }
                if !continued {
                    let entry = moves.entry(landing).or_default();
                    if entry.len() < chain.len() {
                        *entry = chain;
                    }
                }
                true
            }
        }
    }

    fn put(&mut self, piece: Piece) {
        *self.left_mut(piece.color) += 1;
        if piece.king {
            *self.kings_mut(piece.color) += 1;
        }
        self.set(piece.position(), Some(piece));
    }

    fn cell(&self, pos: Position) -> Option<Piece> {
        self.grid[pos.row as usize][pos.col as usize]
    }

    fn set(&mut self, pos: Position, piece: Option<Piece>) {
        self.grid[pos.row as usize][pos.col as usize] = piece;
    }

    fn left_mut(&mut self, color: Color) -> &mut u8 {
        match color {
            Color::Red => &mut self.red_left,
            Color::White => &mut self.white_left,
        }
    }

    fn kings_mut(&mut self, color: Color) -> &mut u8 {
        match color {
            Color::Red => &mut self.red_kings,
            Color::White => &mut self.white_kings,
        }
    }

    /// Recounts the grid and checks the counters and stored coordinates against it.
    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        let mut counts = [0u8; 4];
        for (row, cells) in self.grid.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                let Some(piece) = cell else {
                    continue;
                };
                let pos = Position::new(row as u8, col as u8);
                if piece.position() != pos || !pos.is_dark() {
                    return false;
                }
                let base = match piece.color {
                    Color::Red => 0,
                    Color::White => 2,
                };
                counts[base] += 1;
                if piece.king {
                    counts[base + 1] += 1;
                }
            }
        }
        counts == [self.red_left, self.red_kings, self.white_left, self.white_kings]
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

fn in_bounds(pos: Position) -> bool {
    (pos.row as usize) < BOARD_SIZE && (pos.col as usize) < BOARD_SIZE
}

fn offset(pos: Position, row_step: i8, col_step: i8) -> Option<Position> {
    let row = pos.row as i8 + row_step;
    let col = pos.col as i8 + col_step;
    let range = 0..BOARD_SIZE as i8;
    if range.contains(&row) && range.contains(&col) {
        Some(Position::new(row as u8, col as u8))
    } else {
        None
    }
}
