pub mod search;

use crate::board::Board;
use crate::game::MoveSelector;
use crate::types::Color;

pub use search::{Searcher, choose_move, successors};

/// Engine backed by the fixed-depth minimax searcher.
#[derive(Debug, Default, Clone, Copy)]
pub struct MinimaxSelector;

impl MoveSelector for MinimaxSelector {
    fn choose_board(&self, board: &Board, color: Color, depth: u8) -> Board {
        let (_score, best) = Searcher::new(depth).run(board, color == Color::White);
        best
    }
}
