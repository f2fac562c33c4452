use log::{debug, info, warn};

use crate::ai::MinimaxSelector;
use crate::board::{BOARD_SIZE, Board, ValidMoves};
use crate::config::GameConfig;
use crate::types::{Color, GameResult, GameSnapshot, MoveHint, Position};

pub trait MoveSelector: Send + Sync {
    /// Returns the board after `color` has played, or `board` unchanged when it cannot move.
    fn choose_board(&self, board: &Board, color: Color, depth: u8) -> Board;
}

/// Turn controller: selection, cached moves of the selected piece, turn order and the
/// game-over latch.
pub struct GameState {
    board: Board,
    turn: Color,
    selected: Option<Position>,
    valid_moves: ValidMoves,
    game_over: bool,
    config: GameConfig,
    engine: Box<dyn MoveSelector>,
}

impl GameState {
    pub fn new(config: GameConfig, engine: Box<dyn MoveSelector>) -> Self {
        info!(
            "new game: {} moves first, human plays {}, engine plays {} at depth {}",
            config.first_turn,
            config.human_color(),
            config.engine_color,
            config.search_depth
        );
        Self {
            board: Board::new(),
            turn: config.first_turn,
            selected: None,
            valid_moves: ValidMoves::new(),
            game_over: false,
            config,
            engine,
        }
    }

    pub fn with_default_engine(config: GameConfig) -> Self {
        Self::new(config, Box::new(MinimaxSelector))
    }

    /// Handles a click on `(row, col)`.
    ///
    /// Selects a piece of the side to move, or completes a move when a piece is already
    /// selected and the cell is one of its destinations. Any other cell drops the current
    /// selection and is retried as a fresh selection.
    pub fn select(&mut self, row: u8, col: u8) -> bool {
        if self.game_over {
            return false;
        }
        if row as usize >= BOARD_SIZE || col as usize >= BOARD_SIZE {
            return false;
        }

        let pos = Position::new(row, col);
        if self.selected.is_some() {
            if self.valid_moves.contains_key(&pos) {
                return self.move_to(row, col);
            }
            self.clear_selection();
            return self.select(row, col);
        }

        match self.board.piece_at(row, col) {
            Some(piece) if piece.color == self.turn => {
                self.valid_moves = self.board.valid_moves(&piece);
                self.selected = Some(pos);
                debug!(
                    "selected {} piece at ({row}, {col}) with {} destinations",
                    piece.color,
                    self.valid_moves.len()
                );
                true
            }
            _ => false,
        }
    }

    /// Moves the selected piece to `(row, col)` if that is a cached destination.
    /// The selection is cleared either way.
    pub fn move_to(&mut self, row: u8, col: u8) -> bool {
        let to = Position::new(row, col);
        let selected = self.selected;
        let captured = self.valid_moves.remove(&to);
        self.clear_selection();

        if self.game_over {
            return false;
        }
        let (Some(from), Some(captured)) = (selected, captured) else {
            return false;
        };

        self.board.move_piece(from, to);
        if !captured.is_empty() {
            self.board.remove(&captured);
        }
        debug!(
            "{} moved ({}, {}) -> ({row}, {col}) capturing {}",
            self.turn,
            from.row,
            from.col,
            captured.len()
        );

        self.change_turn();
        self.update_status();
        true
    }

    /// Lets the engine play one move for its side and adopts the resulting board.
    pub fn apply_engine_turn(&mut self) -> Result<(), String> {
        if self.game_over {
            return Err("game is already over".to_string());
        }

        let color = self.config.engine_color;
        let next = self
            .engine
            .choose_board(&self.board, color, self.config.search_depth.max(1));
        if next == self.board {
            warn!("{color} engine found no legal move, passing");
        }

        self.board = next;
        self.clear_selection();
        self.change_turn();
        self.update_status();
        Ok(())
    }

    pub fn change_turn(&mut self) {
        self.turn = self.turn.opposite();
    }

    pub fn is_engine_turn(&self) -> bool {
        !self.game_over && self.turn == self.config.engine_color
    }

    pub fn reset(&mut self) {
        info!("game reset");
        self.board = Board::new();
        self.turn = self.config.first_turn;
        self.clear_selection();
        self.game_over = false;
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn selected(&self) -> Option<Position> {
        self.selected
    }

    pub fn valid_moves(&self) -> &ValidMoves {
        &self.valid_moves
    }

    pub fn valid_destinations(&self) -> Vec<Position> {
        self.valid_moves.keys().copied().collect()
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn winner(&self) -> Option<Color> {
        self.board.winner()
    }

    pub fn to_snapshot(&self) -> GameSnapshot {
        let (red_count, white_count) = self.board.counts();
        let (red_kings, white_kings) = self.board.kings();
        GameSnapshot {
            pieces: self
                .board
                .all_pieces()
                .iter()
                .map(|piece| piece.to_view())
                .collect(),
            turn: self.turn,
            selected: self.selected,
            valid_moves: self
                .valid_moves
                .iter()
                .map(|(dest, captures)| MoveHint {
                    row: dest.row,
                    col: dest.col,
                    captures: captures.clone(),
                })
                .collect(),
            red_count,
            white_count,
            red_kings,
            white_kings,
            is_game_over: self.game_over,
            winner: self.winner(),
        }
    }

    pub fn to_game_result(&self) -> GameResult {
        let (red_count, white_count) = self.board.counts();
        let winner = self.winner();
        let message = match winner {
            Some(color) => format!("Game Over! {color} Wins!"),
            None => "Game in progress".to_string(),
        };
        GameResult {
            winner,
            red_count,
            white_count,
            message,
        }
    }

    fn clear_selection(&mut self) {
        self.selected = None;
        self.valid_moves.clear();
    }

    fn update_status(&mut self) {
        if let Some(winner) = self.board.winner() {
            info!("game over: {winner} wins");
            self.game_over = true;
        }
    }

    #[cfg(test)]
    fn set_board_for_test(&mut self, board: Board, turn: Color) {
        self.board = board;
        self.turn = turn;
        self.clear_selection();
        self.game_over = false;
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::with_default_engine(GameConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Piece;

    struct FixedBoardSelector {
        board: Board,
    }

    impl MoveSelector for FixedBoardSelector {
        fn choose_board(&self, _board: &Board, _color: Color, _depth: u8) -> Board {
            self.board
        }
    }

    fn pos(row: u8, col: u8) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn initial_state_is_correct() {
        let game = GameState::default();
        let state = game.to_snapshot();

        assert_eq!(state.turn, Color::Red);
        assert_eq!(state.pieces.len(), 24);
        assert_eq!((state.red_count, state.white_count), (12, 12));
        assert!(state.selected.is_none());
        assert!(state.valid_moves.is_empty());
        assert!(!state.is_game_over);
        assert!(state.winner.is_none());
        assert!(!game.is_engine_turn());
    }

    #[test]
    fn selecting_own_piece_caches_its_moves() {
        let mut game = GameState::default();

        assert!(game.select(5, 2));

        assert_eq!(game.selected(), Some(pos(5, 2)));
        assert_eq!(game.valid_destinations(), vec![pos(4, 1), pos(4, 3)]);
    }

    #[test]
    fn selecting_empty_or_opponent_cell_fails() {
        let mut game = GameState::default();

        assert!(!game.select(4, 1));
        assert!(!game.select(2, 1));
        assert!(!game.select(8, 0));
        assert!(game.selected().is_none());
        assert!(game.valid_moves().is_empty());
    }

    #[test]
    fn selecting_a_destination_moves_and_flips_turn() {
        let mut game = GameState::default();

        assert!(game.select(5, 2));
        assert!(game.select(4, 3));

        assert!(game.board().piece_at(5, 2).is_none());
        assert_eq!(game.board().piece_at(4, 3).map(|p| p.color), Some(Color::Red));
        assert_eq!(game.turn(), Color::White);
        assert!(game.selected().is_none());
        assert!(game.valid_moves().is_empty());
        assert!(game.is_engine_turn());
    }

    #[test]
    fn selecting_another_own_piece_switches_selection() {
        let mut game = GameState::default();

        assert!(game.select(5, 2));
        assert!(game.select(5, 6));

        assert_eq!(game.selected(), Some(pos(5, 6)));
        assert_eq!(game.valid_destinations(), vec![pos(4, 5), pos(4, 7)]);
        assert_eq!(game.turn(), Color::Red);
    }

    #[test]
    fn selecting_a_non_destination_drops_selection() {
        let mut game = GameState::default();

        assert!(game.select(5, 2));
        assert!(!game.select(3, 2));

        assert!(game.selected().is_none());
        assert_eq!(game.turn(), Color::Red);
        assert_eq!(game.board(), &Board::new());
    }

    #[test]
    fn move_to_rejects_uncached_destination() {
        let mut game = GameState::default();

        assert!(!game.move_to(4, 1));

        assert!(game.select(5, 2));
        assert!(!game.move_to(3, 4));
        assert!(game.selected().is_none());
        assert_eq!(game.board(), &Board::new());
        assert_eq!(game.turn(), Color::Red);
    }

    #[test]
    fn capture_removes_jumped_piece() {
        let mut game = GameState::default();
        let board = Board::from_pieces(&[
            Piece::new(5, 2, Color::Red),
            Piece::new(4, 3, Color::White),
            Piece::new(0, 1, Color::White),
        ])
        .unwrap();
        game.set_board_for_test(board, Color::Red);

        assert!(game.select(5, 2));
        assert_eq!(game.valid_moves().get(&pos(3, 4)), Some(&vec![pos(4, 3)]));
        assert!(game.select(3, 4));

        assert!(game.board().piece_at(4, 3).is_none());
        assert_eq!(game.board().counts(), (1, 1));
        assert!(!game.is_game_over());
        assert!(game.board().is_consistent());
    }

    #[test]
    fn capturing_the_last_piece_ends_the_game() {
        let mut game = GameState::default();
        let board = Board::from_pieces(&[
            Piece::new(5, 2, Color::Red),
            Piece::new(4, 3, Color::White),
        ])
        .unwrap();
        game.set_board_for_test(board, Color::Red);

        assert!(game.select(5, 2));
        assert!(game.select(3, 4));

        assert!(game.is_game_over());
        assert_eq!(game.winner(), Some(Color::Red));
        assert!(!game.select(3, 4));
        assert!(!game.move_to(2, 3));
        assert_eq!(
            game.apply_engine_turn(),
            Err("game is already over".to_string())
        );
        assert_eq!(game.to_game_result().message, "Game Over! Red Wins!");
        assert!(!game.is_engine_turn());
    }

    #[test]
    fn engine_turn_adopts_selected_board_and_flips_turn() {
        let mut expected = Board::new();
        expected.move_piece(pos(2, 1), pos(3, 2));
        let mut game = GameState::new(
            GameConfig::default(),
            Box::new(FixedBoardSelector { board: expected }),
        );
        game.change_turn();

        game.apply_engine_turn().unwrap();

        assert_eq!(game.board(), &expected);
        assert_eq!(game.turn(), Color::Red);
    }

    #[test]
    fn minimax_engine_plays_a_white_move() {
        let mut game = GameState::with_default_engine(GameConfig::with_depth(2));
        assert!(game.select(5, 2));
        assert!(game.select(4, 3));
        let before = *game.board();

        game.apply_engine_turn().unwrap();

        assert_ne!(game.board(), &before);
        assert_eq!(game.turn(), Color::Red);
        assert_eq!(game.board().pieces(Color::Red), before.pieces(Color::Red));
        assert!(game.board().is_consistent());
    }

    #[test]
    fn engine_without_moves_passes() {
        let mut game = GameState::default();
        let board = Board::from_pieces(&[
            Piece::new(1, 0, Color::White),
            Piece::new(2, 1, Color::Red),
            Piece::new(3, 2, Color::Red),
        ])
        .unwrap();
        game.set_board_for_test(board, Color::White);

        game.apply_engine_turn().unwrap();

        assert_eq!(game.board(), &board);
        assert_eq!(game.turn(), Color::Red);
        assert!(!game.is_game_over());
    }

    #[test]
    fn engine_winning_capture_latches_game_over() {
        let mut game = GameState::default();
        let board = Board::from_pieces(&[
            Piece::new(2, 1, Color::White),
            Piece::new(3, 2, Color::Red),
        ])
        .unwrap();
        game.set_board_for_test(board, Color::White);

        game.apply_engine_turn().unwrap();

        assert!(game.is_game_over());
        assert_eq!(game.winner(), Some(Color::White));
        assert_eq!(game.to_game_result().message, "Game Over! White Wins!");
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut game = GameState::default();
        assert!(game.select(5, 2));
        assert!(game.select(4, 3));
        assert!(game.select(2, 1));

        game.reset();

        assert_eq!(game.board(), &Board::new());
        assert_eq!(game.turn(), Color::Red);
        assert!(game.selected().is_none());
        assert!(!game.is_game_over());
    }

    #[test]
    fn snapshot_lists_move_hints_with_captures() {
        let mut game = GameState::default();
        let board = Board::from_pieces(&[
            Piece::new(5, 2, Color::Red),
            Piece::new(4, 3, Color::White),
            Piece::new(0, 1, Color::White),
        ])
        .unwrap();
        game.set_board_for_test(board, Color::Red);
        assert!(game.select(5, 2));

        let state = game.to_snapshot();

        assert_eq!(state.selected, Some(pos(5, 2)));
        assert_eq!(
            state.valid_moves,
            vec![
                MoveHint {
                    row: 3,
                    col: 4,
                    captures: vec![pos(4, 3)],
                },
                MoveHint {
                    row: 4,
                    col: 1,
                    captures: Vec::new(),
                },
            ]
        );
        assert_eq!(state.pieces.len(), 3);
    }

    #[test]
    fn random_walk_keeps_board_consistent() {
        let mut game = GameState::with_default_engine(GameConfig::with_depth(1));

        for _ in 0..20 {
            if game.is_game_over() {
                break;
            }
            if game.is_engine_turn() {
                game.apply_engine_turn().unwrap();
            } else {
                let turn = game.turn();
                let moved = game.board().pieces(turn).into_iter().any(|piece| {
                    game.select(piece.row, piece.col)
                        && match game.valid_destinations().first() {
                            Some(dest) => game.select(dest.row, dest.col),
                            None => false,
                        }
                });
                if !moved {
                    game.change_turn();
                }
            }
            assert!(game.board().is_consistent());
        }
    }
}
