//! Live game state driven by an autonomous player.
//!
//! This module provides the pieces of the game loop that sit around the placement engine:
//!
//! - [`GameField`] - live board, falling piece and piece generator
//! - [`GameStats`] - cleared lines, completed pieces and score
//! - [`PieceGenerator`] - seeded uniform piece generation
//! - [`PieceSeed`] - seed for deterministic piece sequences
//!
//! # Game Flow
//!
//! 1. Initialize [`GameField`] with a seed
//! 2. A player decides a [`Placement`](crate::Placement) for the falling piece
//! 3. [`GameField::complete_placement`] commits it, clears lines and spawns the next piece
//! 4. Repeat until the spawned piece collides (game over)
//!
//! # Example
//!
//! ```
//! use tetrist_engine::{GameField, simulate_drop};
//!
//! let mut field = GameField::standard();
//! let drop = simulate_drop(field.board(), &field.falling_piece(), 0);
//! let (cleared_lines, result) = field.complete_placement(&drop.placement);
//!
//! assert_eq!(cleared_lines, 0);
//! assert!(result.is_ok());
//! ```

pub use self::{game_field::*, game_stats::*, piece_generator::*};

mod game_field;
mod game_stats;
mod piece_generator;
