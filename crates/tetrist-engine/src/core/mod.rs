//! Board and piece model plus the placement mechanics that operate on them.
//!
//! - [`Board`] - rectangular grid of integer cells with a permanent floor sentinel row
//! - [`Piece`] / [`PieceKind`] - immutable tetromino grids, rotated by value
//! - [`Placement`] - an oriented piece at a resting column/row
//! - [`simulate_drop`] - gravity drop without animation, producing a scratch board

pub use self::{board::*, piece::*, placement::*};

pub(crate) mod board;
pub(crate) mod piece;
pub(crate) mod placement;
