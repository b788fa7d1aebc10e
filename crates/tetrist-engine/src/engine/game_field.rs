use crate::{
    SpawnCollisionError,
    core::{board::Board, piece::Piece, placement::Placement},
};

use super::piece_generator::{PieceGenerator, PieceSeed};

/// Live game state: the board, the falling piece and the generator feeding it.
///
/// The board is owned here and mutated in place only by [`GameField::complete_placement`].
/// Players read it through [`GameField::board`] and evaluate moves on scratch copies.
#[derive(Debug, Clone)]
pub struct GameField {
    board: Board,
    falling_piece: Piece,
    piece_generator: PieceGenerator,
    game_over: bool,
}

impl GameField {
    /// Creates a 20×10 field with a random seed.
    #[must_use]
    pub fn standard() -> Self {
        Self::with_generator(Board::standard(), PieceGenerator::new())
    }

    /// Creates a field of the given size with a deterministic piece sequence.
    #[must_use]
    pub fn with_seed(rows: usize, cols: usize, seed: PieceSeed) -> Self {
        Self::with_generator(Board::new(rows, cols), PieceGenerator::with_seed(seed))
    }

    fn with_generator(board: Board, mut piece_generator: PieceGenerator) -> Self {
        let falling_piece = Piece::new(piece_generator.pop_next());
        let game_over = board.is_colliding(&falling_piece, spawn_x(&board, &falling_piece), 0);
        Self {
            board,
            falling_piece,
            piece_generator,
            game_over,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The piece waiting to be placed, in spawn orientation.
    #[must_use]
    pub fn falling_piece(&self) -> Piece {
        self.falling_piece
    }

    /// Column where the falling piece spawned.
    #[must_use]
    pub fn spawn_x(&self) -> usize {
        spawn_x(&self.board, &self.falling_piece)
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Commits `placement` to the live board, clears lines and spawns the next piece.
    ///
    /// Returns the number of lines cleared, and an error when the next piece collides at its
    /// spawn position (game over). The placement must be for the current falling piece and
    /// must fit on the board.
    pub fn complete_placement(
        &mut self,
        placement: &Placement,
    ) -> (usize, Result<(), SpawnCollisionError>) {
        assert!(!self.game_over, "placement after game over");
        assert_eq!(placement.kind(), self.falling_piece.kind());
        assert!(placement.fits(&self.board), "placement collides");

        let cleared_lines = self.board.apply_placement(placement);

        self.falling_piece = Piece::new(self.piece_generator.pop_next());
        if self
            .board
            .is_colliding(&self.falling_piece, self.spawn_x(), 0)
        {
            self.game_over = true;
            return (cleared_lines, Err(SpawnCollisionError));
        }
        (cleared_lines, Ok(()))
    }
}

fn spawn_x(board: &Board, piece: &Piece) -> usize {
    (board.cols() / 2).saturating_sub(piece.width() / 2)
}
