//! Analysis of board state after piece placement.
//!
//! [`PlacementAnalysis`] bundles what the scoring models need to know about one candidate move:
//!
//! 1. **The placement** - oriented piece, column and resting row
//! 2. **Line clears** - how many rows the placement cleared on its scratch board
//! 3. **Board state** - the resulting scratch board metrics via [`BoardAnalysis`]
//!
//! The live board is never touched; the scratch board comes from
//! [`simulate_drop`](tetrist_engine::simulate_drop).

use tetrist_engine::{Board, Piece, Placement, SimulatedDrop, simulate_drop};

use crate::board_analysis::BoardAnalysis;

#[derive(Debug, Clone)]
pub struct PlacementAnalysis {
    placement: Placement,
    cleared_lines: usize,
    board_analysis: BoardAnalysis,
}

impl PlacementAnalysis {
    /// Drops `piece` in column `x` of `board` and analyzes the resulting scratch board.
    #[must_use]
    pub fn from_drop(board: &Board, piece: &Piece, x: usize) -> Self {
        Self::from_simulated_drop(simulate_drop(board, piece, x))
    }

    #[must_use]
    pub fn from_simulated_drop(drop: SimulatedDrop) -> Self {
        let SimulatedDrop {
            placement,
            board,
            cleared_lines,
        } = drop;
        Self {
            placement,
            cleared_lines,
            board_analysis: BoardAnalysis::from_board(board),
        }
    }

    #[must_use]
    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    #[must_use]
    pub fn cleared_lines(&self) -> usize {
        self.cleared_lines
    }

    #[must_use]
    pub fn board_analysis(&self) -> &BoardAnalysis {
        &self.board_analysis
    }

    /// The scratch board after the placement and its line clears.
    #[must_use]
    pub fn board(&self) -> &Board {
        self.board_analysis.board()
    }

    #[must_use]
    pub fn into_board(self) -> Board {
        self.board_analysis.into_board()
    }

    /// Returns `false` when the scratch board carries the invalid-placement marker.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.board().is_invalid()
    }

    /// Height above the floor of the piece's vertical midpoint, before any line clears.
    ///
    /// A horizontal I piece resting on the floor has landing height `0.0`; a vertical one has
    /// `1.5`.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn landing_height(&self) -> f64 {
        let rows = self.board().rows();
        let height = self.placement.piece().height();
        let rows_below = rows.saturating_sub(self.placement.y() + height);
        rows_below as f64 + (height - 1) as f64 / 2.0
    }
}
