//! Placement scoring: feature vectors combined with fixed weights into a scalar cost.
//!
//! Two models are available, selected through the closed [`ScoringModel`] variant:
//!
//! - [`ScoringModel::Simple`] - per-column heights, neighbor height differences, max height,
//!   holes and cleared rows. Weights live in cost space (positive is bad).
//! - [`ScoringModel::Dellacherie`] - the six-feature model from the Tetris AI literature:
//!   landing height, eroded cells, row transitions, column transitions, holes and cumulative
//!   wells. Weights live in reward space (positive is good); the cost is the negated score.
//!
//! Every caller minimizes cost. A scratch board carrying the invalid-placement marker
//! short-circuits to [`INVALID_COST`], far above any legitimate board.
//!
//! # Example
//!
//! ```
//! use tetrist_engine::{Board, Piece, PieceKind};
//! use tetrist_evaluator::{placement_analysis::PlacementAnalysis, scoring::ScoringModel};
//!
//! let board = Board::standard();
//! let model = ScoringModel::default();
//! let flat = PlacementAnalysis::from_drop(&board, &Piece::new(PieceKind::I), 0);
//! let tall = PlacementAnalysis::from_drop(&board, &Piece::new(PieceKind::I).rotated_clockwise(), 0);
//! assert!(model.cost(&flat) < model.cost(&tall));
//! ```

use std::iter;

use serde::{Deserialize, Serialize};
use tetrist_engine::Board;

use crate::placement_analysis::PlacementAnalysis;

/// Cost assigned to a placement whose scratch board carries the invalid marker.
pub const INVALID_COST: f64 = 1e12;

/// Height reported by the simple model for a column holding the invalid marker.
const INVALID_COLUMN_HEIGHT: f64 = 99_999.0;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::FromStr)]
pub enum ScoringKind {
    #[default]
    Simple,
    Dellacherie,
}

/// Weights of the simple height-based model (cost space).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimpleWeights {
    /// Applied to each column's squared height.
    pub height_squared: f64,
    /// Applied to each absolute height difference between neighbor columns.
    pub height_diff: f64,
    pub max_height: f64,
    pub holes: f64,
    /// Negative: clearing rows lowers the cost.
    pub cleared_lines: f64,
}

impl Default for SimpleWeights {
    fn default() -> Self {
        Self {
            height_squared: 15.0,
            height_diff: 3.0,
            max_height: 50.0,
            holes: 5.0,
            cleared_lines: -1.0,
        }
    }
}

/// Weights of the six-feature Dellacherie model (reward space).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DellacherieWeights {
    pub landing_height: f64,
    pub eroded_cells: f64,
    pub row_transitions: f64,
    pub column_transitions: f64,
    pub holes: f64,
    pub wells: f64,
    /// Power the cleared row count is raised to for the eroded cells feature.
    pub erosion_exponent: i32,
}

impl Default for DellacherieWeights {
    fn default() -> Self {
        Self {
            landing_height: -1.0,
            eroded_cells: 1.0,
            row_transitions: -1.0,
            column_transitions: -1.0,
            holes: -4.0,
            wells: -1.0,
            erosion_exponent: 4,
        }
    }
}

/// Scoring strategy together with its weight table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum ScoringModel {
    Simple(SimpleWeights),
    Dellacherie(DellacherieWeights),
}

impl Default for ScoringModel {
    fn default() -> Self {
        Self::Simple(SimpleWeights::default())
    }
}

impl From<ScoringKind> for ScoringModel {
    fn from(kind: ScoringKind) -> Self {
        match kind {
            ScoringKind::Simple => Self::Simple(SimpleWeights::default()),
            ScoringKind::Dellacherie => Self::Dellacherie(DellacherieWeights::default()),
        }
    }
}

impl ScoringModel {
    #[must_use]
    pub fn kind(&self) -> ScoringKind {
        match self {
            Self::Simple(_) => ScoringKind::Simple,
            Self::Dellacherie(_) => ScoringKind::Dellacherie,
        }
    }

    /// Extracts the model's feature vector from a placement.
    ///
    /// The simple model yields `2 * cols + 2` values: one squared height per column, one
    /// height difference per neighbor pair, then max height, holes and cleared rows.
    /// The Dellacherie model always yields six values.
    #[must_use]
    pub fn features(&self, analysis: &PlacementAnalysis) -> Vec<f64> {
        match self {
            Self::Simple(_) => simple_features(analysis),
            Self::Dellacherie(weights) => dellacherie_features(analysis, weights.erosion_exponent),
        }
    }

    /// Returns the weight vector matching [`Self::features`] on a board `cols` wide.
    #[must_use]
    pub fn weights(&self, cols: usize) -> Vec<f64> {
        match self {
            Self::Simple(w) => iter::repeat_n(w.height_squared, cols)
                .chain(iter::repeat_n(w.height_diff, cols.saturating_sub(1)))
                .chain([w.max_height, w.holes, w.cleared_lines])
                .collect(),
            Self::Dellacherie(w) => vec![
                w.landing_height,
                w.eroded_cells,
                w.row_transitions,
                w.column_transitions,
                w.holes,
                w.wells,
            ],
        }
    }

    /// Scalar cost of a placement (lower is better).
    ///
    /// # Panics
    ///
    /// Panics if the feature and weight vectors differ in length.
    #[must_use]
    pub fn cost(&self, analysis: &PlacementAnalysis) -> f64 {
        if !analysis.is_valid() {
            return INVALID_COST;
        }
        let features = self.features(analysis);
        let weights = self.weights(analysis.board().cols());
        assert_eq!(features.len(), weights.len());
        let score = iter::zip(&features, &weights)
            .map(|(f, w)| f * w)
            .sum::<f64>();
        match self {
            Self::Simple(_) => score,
            Self::Dellacherie(_) => -score,
        }
    }
}

#[expect(clippy::cast_precision_loss)]
fn simple_features(analysis: &PlacementAnalysis) -> Vec<f64> {
    let board = analysis.board();
    let board_analysis = analysis.board_analysis();
    let heights = board_analysis
        .column_heights()
        .iter()
        .enumerate()
        .map(|(x, &h)| {
            if column_is_invalid(board, x) {
                INVALID_COLUMN_HEIGHT
            } else {
                h as f64
            }
        })
        .collect::<Vec<_>>();

    let squared = heights.iter().map(|h| h * h);
    let diffs = heights.windows(2).map(|w| (w[0] - w[1]).abs());
    let max_height = heights.iter().copied().fold(0.0, f64::max);
    squared
        .chain(diffs)
        .chain([
            max_height,
            board_analysis.num_holes() as f64,
            analysis.cleared_lines() as f64,
        ])
        .collect()
}

#[expect(clippy::cast_precision_loss)]
fn dellacherie_features(analysis: &PlacementAnalysis, erosion_exponent: i32) -> Vec<f64> {
    let board_analysis = analysis.board_analysis();
    vec![
        analysis.landing_height(),
        (analysis.cleared_lines() as f64).powi(erosion_exponent),
        board_analysis.row_transitions() as f64,
        board_analysis.column_transitions() as f64,
        board_analysis.num_holes() as f64,
        board_analysis.cumulative_wells() as f64,
    ]
}

fn column_is_invalid(board: &Board, x: usize) -> bool {
    (0..board.rows()).any(|y| board.cell(x, y) == Board::INVALID)
}
