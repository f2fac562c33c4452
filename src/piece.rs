use crate::types::{Color, PieceView, Position};

/// A checker. Its coordinates always mirror the grid cell that holds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub row: u8,
    pub col: u8,
    pub color: Color,
    pub king: bool,
}

impl Piece {
    pub const fn new(row: u8, col: u8, color: Color) -> Self {
        Self {
            row,
            col,
            color,
            king: false,
        }
    }

    pub const fn king(row: u8, col: u8, color: Color) -> Self {
        Self {
            row,
            col,
            color,
            king: true,
        }
    }

    pub const fn position(&self) -> Position {
        Position::new(self.row, self.col)
    }

    /// Row steps this piece may travel: forward only, or both ways once crowned.
    pub fn row_directions(&self) -> impl Iterator<Item = i8> {
        let forward = self.color.forward();
        std::iter::once(forward).chain(self.king.then_some(-forward))
    }

    pub(crate) fn relocate(&mut self, to: Position) {
        self.row = to.row;
        self.col = to.col;
    }

    pub(crate) fn make_king(&mut self) {
        self.king = true;
    }

    pub fn to_view(&self) -> PieceView {
        PieceView {
            row: self.row,
            col: self.col,
            color: self.color,
            king: self.king,
        }
    }
}
