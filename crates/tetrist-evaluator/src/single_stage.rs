//! Greedy single-stage player: the minimum-cost immediate placement.

use tetrist_engine::{Board, Piece};

use crate::{
    move_enumerator::{Candidate, enumerate_moves},
    scoring::ScoringModel,
};

/// Returns the lowest-cost placement of `piece` on `board`.
///
/// Deterministic: the same board, piece and model always produce the same placement. Which of
/// several equal-cost placements is returned is unspecified.
///
/// # Panics
///
/// Panics if no rotation of `piece` fits within the board width.
///
/// # Example
///
/// ```
/// use tetrist_engine::{Board, Piece, PieceKind};
/// use tetrist_evaluator::{scoring::ScoringModel, single_stage::select_move};
///
/// let board = Board::standard();
/// let best = select_move(&board, &Piece::new(PieceKind::O), &ScoringModel::default());
/// assert_eq!(best.placement().y(), 18);
/// ```
#[must_use]
pub fn select_move(board: &Board, piece: &Piece, model: &ScoringModel) -> Candidate {
    min_cost(enumerate_moves(board, piece, model)).unwrap_or_else(|| {
        panic!(
            "no rotation of piece {:?} fits a {}-column board",
            piece.kind(),
            board.cols()
        )
    })
}

/// Picks a candidate with the minimum cost.
pub(crate) fn min_cost<I>(candidates: I) -> Option<Candidate>
where
    I: IntoIterator<Item = Candidate>,
{
    candidates.into_iter().reduce(|best, candidate| {
        if candidate.cost() < best.cost() {
            candidate
        } else {
            best
        }
    })
}
