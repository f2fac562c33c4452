use log::debug;
use web_time::Instant;

use crate::board::Board;
use crate::types::Color;

const MIN_SCORE: f32 = f32::NEG_INFINITY;
const MAX_SCORE: f32 = f32::INFINITY;

/// Fixed-depth minimax. White is always the maximizing side, red the minimizing one.
pub struct Searcher {
    max_depth: u8,
    nodes: u64,
    start_time: Instant,
}

impl Searcher {
    pub fn new(max_depth: u8) -> Self {
        Self {
            max_depth,
            nodes: 0,
            start_time: Instant::now(),
        }
    }

    /// Searches for white and returns `(score, best successor)`.
    pub fn search(&mut self, board: &Board) -> (f32, Board) {
        self.run(board, true)
    }

    /// Runs the search from the side given by `maximizing`.
    /// Returns the input board itself at depth 0, on a decided game, or when the
    /// side to move has no legal move.
    pub fn run(&mut self, board: &Board, maximizing: bool) -> (f32, Board) {
        self.start_time = Instant::now();
        self.nodes = 0;

        let (score, best) = self.minimax(board, self.max_depth, maximizing);

        debug!(
            "minimax depth={} nodes={} elapsed={}ms score={score}",
            self.max_depth,
            self.nodes,
            self.start_time.elapsed().as_millis()
        );
        (score, best)
    }

    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    fn minimax(&mut self, board: &Board, depth: u8, maximizing: bool) -> (f32, Board) {
        self.nodes += 1;

        if depth == 0 || board.winner().is_some() {
            return (board.evaluate(), *board);
        }

        let color = if maximizing { Color::White } else { Color::Red };
        let children = successors(board, color);
        // No legal move scores the frozen position rather than a loss.
        if children.is_empty() {
            return (board.evaluate(), *board);
        }

        let mut best_score = if maximizing { MIN_SCORE } else { MAX_SCORE };
        let mut best_board = *board;

        for child in children {
            let (score, _) = self.minimax(&child, depth - 1, !maximizing);
            if is_better_score(score, best_score, maximizing) {
                best_score = score;
                best_board = child;
            }
        }

        (best_score, best_board)
    }
}

/// One-shot search from the side given by `maximizing`.
pub fn choose_move(board: &Board, depth: u8, maximizing: bool) -> (f32, Board) {
    Searcher::new(depth).run(board, maximizing)
}

/// Every board reachable in one ply by `color`, piece by piece in row-major order.
pub fn successors(board: &Board, color: Color) -> Vec<Board> {
    let mut out = Vec::new();
    for piece in board.pieces(color) {
        for (dest, captured) in board.valid_moves(&piece) {
            let mut next = *board;
            next.move_piece(piece.position(), dest);
            if !captured.is_empty() {
                next.remove(&captured);
            }
            out.push(next);
        }
    }
    out
}

// Strict comparison keeps the first of equally scored children.
fn is_better_score(score: f32, best_score: f32, maximizing: bool) -> bool {
    if maximizing {
        score > best_score
    } else {
        score < best_score
    }
}
