//! Enumeration of every (rotation × column) placement for a piece.
//!
//! For each of the four rotation states, cumulative from the given piece, and each column
//! `0 ≤ x ≤ cols − width`, the piece is dropped onto a scratch copy of the board and the
//! result is scored. Candidates come out rotation-major, columns ascending.

use std::iter;

use arrayvec::ArrayVec;
use tetrist_engine::{Board, Piece, Placement};

use crate::{placement_analysis::PlacementAnalysis, scoring::ScoringModel};

/// A scored placement together with the scratch board it produces.
#[derive(Debug, Clone)]
pub struct Candidate {
    analysis: PlacementAnalysis,
    cost: f64,
}

impl Candidate {
    #[must_use]
    pub fn new(analysis: PlacementAnalysis, cost: f64) -> Self {
        Self { analysis, cost }
    }

    #[must_use]
    pub fn placement(&self) -> &Placement {
        self.analysis.placement()
    }

    #[must_use]
    pub fn cost(&self) -> f64 {
        self.cost
    }

    #[must_use]
    pub fn analysis(&self) -> &PlacementAnalysis {
        &self.analysis
    }

    /// The scratch board left behind by this placement.
    #[must_use]
    pub fn board(&self) -> &Board {
        self.analysis.board()
    }

    #[must_use]
    pub fn into_board(self) -> Board {
        self.analysis.into_board()
    }
}

/// Returns the four rotation states reached by rotating `piece` clockwise, starting with itself.
#[must_use]
pub fn rotations(piece: &Piece) -> ArrayVec<Piece, 4> {
    iter::successors(Some(*piece), |p| Some(p.rotated_clockwise()))
        .take(4)
        .collect()
}

/// Drops `piece` in every rotation and column of `board` and scores each result.
///
/// Rotations too wide for the board produce no candidates. The result is empty only when
/// every rotation is wider than the board.
#[must_use]
pub fn enumerate_moves(board: &Board, piece: &Piece, model: &ScoringModel) -> Vec<Candidate> {
    rotations(piece)
        .into_iter()
        .flat_map(|rotated| {
            let max_x = board.cols().checked_sub(rotated.width());
            max_x
                .into_iter()
                .flat_map(move |max_x| (0..=max_x).map(move |x| (rotated, x)))
        })
        .map(|(rotated, x)| {
            let analysis = PlacementAnalysis::from_drop(board, &rotated, x);
            let cost = model.cost(&analysis);
            Candidate::new(analysis, cost)
        })
        .collect()
}
