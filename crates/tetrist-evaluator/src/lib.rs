//! Move evaluation and lookahead search for autonomous Tetris play.
//!
//! The crate is layered bottom-up:
//!
//! ```text
//! Engine (decide_move / apply_placement / play_session)
//!     ↓ dispatches on Strategy
//! Lookahead player ── Single-stage player ── Random player
//!     ↓ uses
//! Move enumerator (every rotation × column)
//!     ↓ uses
//! Scoring model (Simple | Dellacherie)
//!     ↓ reads
//! Placement analysis + board analysis (lazy metrics)
//! ```
//!
//! - [`board_analysis`] - lazily evaluated board metrics (heights, holes, transitions, wells)
//! - [`placement_analysis`] - a dropped piece, its cleared lines and the resulting scratch board
//! - [`scoring`] - feature vectors and weights of the two scoring models
//! - [`move_enumerator`] - scored candidates for every rotation and column
//! - [`single_stage`] - greedy arg-min over the candidates
//! - [`lookahead`] - top-K candidates refined by sampled future play on worker threads
//! - [`random_player`] - uniformly random legal drops, a baseline for comparison
//! - [`engine`] - configuration context and the entry points used by a game loop
//!
//! All evaluation happens on scratch copies. The only mutation of a live board goes through
//! [`engine::Engine::apply_placement`] or [`tetrist_engine::GameField::complete_placement`].

pub mod board_analysis;
pub mod engine;
pub mod lookahead;
pub mod move_enumerator;
pub mod placement_analysis;
pub mod random_player;
pub mod scoring;
pub mod single_stage;
