//! Engine context: configuration plus the entry points the game layer calls.
//!
//! [`Engine`] holds the board dimensions, the scoring model and the lookahead parameters.
//! It is built once and borrowed by every call, so no global state is involved.
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg32;
//! use tetrist_evaluator::engine::{Engine, Strategy};
//!
//! let engine = Engine::default();
//! let mut rng = Pcg32::seed_from_u64(0);
//! let mut board = engine.new_board();
//! let piece = engine.new_piece(&mut rng);
//!
//! let placement = engine.decide_move(&board, &piece, Strategy::SingleStage, &mut rng);
//! let cleared_lines = engine.apply_placement(&mut board, &placement);
//! assert_eq!(cleared_lines, 0);
//! ```

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use tetrist_engine::{Board, GameField, GameStats, MAX_PIECE_SIZE, Piece, PieceSeed, Placement};

use crate::{
    lookahead::{LookaheadParams, select_move_with_lookahead},
    random_player::random_placement,
    scoring::ScoringModel,
    single_stage::select_move,
};

/// Stream selector for the lookahead RNG of a session, kept apart from the piece sequence.
const LOOKAHEAD_STREAM: u64 = 0x5851_f42d_4c95_7f2d;

/// How a move is chosen.
#[derive(
    Default,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::FromStr,
)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Greedy minimum of the immediate cost.
    SingleStage,
    /// Immediate cost plus sampled future cost.
    #[default]
    Lookahead,
    /// Uniformly random legal drop (baseline).
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub rows: usize,
    pub cols: usize,
    pub scoring: ScoringModel,
    pub lookahead: LookaheadParams,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rows: Board::STANDARD_ROWS,
            cols: Board::STANDARD_COLS,
            scoring: ScoringModel::default(),
            lookahead: LookaheadParams::default(),
        }
    }
}

/// Result of one headless game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub seed: PieceSeed,
    pub strategy: Strategy,
    pub stats: GameStats,
    /// `false` when the session stopped at the turn limit instead.
    pub game_over: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// # Panics
    ///
    /// Panics if the board is smaller than the largest piece in either dimension.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        assert!(
            config.rows >= MAX_PIECE_SIZE && config.cols >= MAX_PIECE_SIZE,
            "board must be at least {MAX_PIECE_SIZE}x{MAX_PIECE_SIZE}, got {}x{}",
            config.rows,
            config.cols
        );
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn new_board(&self) -> Board {
        Board::new(self.config.rows, self.config.cols)
    }

    /// Draws a uniformly random piece in spawn orientation.
    pub fn new_piece<R>(&self, rng: &mut R) -> Piece
    where
        R: Rng + ?Sized,
    {
        Piece::random(rng)
    }

    /// Chooses where to place `piece` on `board`.
    ///
    /// `rng` feeds the lookahead simulation and the random player; the single-stage player
    /// ignores it. The returned placement collides only when no legal drop exists.
    ///
    /// # Panics
    ///
    /// Panics if `board` carries the invalid marker.
    pub fn decide_move<R>(
        &self,
        board: &Board,
        piece: &Piece,
        strategy: Strategy,
        rng: &mut R,
    ) -> Placement
    where
        R: Rng + ?Sized,
    {
        assert!(!board.is_invalid(), "live board carries the invalid marker");
        match strategy {
            Strategy::SingleStage => *select_move(board, piece, &self.config.scoring).placement(),
            Strategy::Lookahead => *select_move_with_lookahead(
                board,
                piece,
                &self.config.scoring,
                &self.config.lookahead,
                rng,
            )
            .candidate()
            .placement(),
            Strategy::Random => random_placement(board, piece, rng),
        }
    }

    /// Commits `placement` to the live board and returns the number of cleared lines.
    ///
    /// # Panics
    ///
    /// Panics if the board carries the invalid marker or the placement collides with it.
    pub fn apply_placement(&self, board: &mut Board, placement: &Placement) -> usize {
        assert!(!board.is_invalid(), "live board carries the invalid marker");
        assert!(placement.fits(board), "placement {placement} collides");
        board.apply_placement(placement)
    }

    /// Plays one headless game until game over or `turn_limit` placed pieces.
    ///
    /// The piece sequence and the lookahead sampling both derive from `seed`, so a session is
    /// reproducible.
    #[must_use]
    pub fn play_session(
        &self,
        seed: PieceSeed,
        turn_limit: usize,
        strategy: Strategy,
    ) -> SessionOutcome {
        let mut field = GameField::with_seed(self.config.rows, self.config.cols, seed);
        let mut rng = Pcg32::new(seed.value(), LOOKAHEAD_STREAM);
        let mut stats = GameStats::new();
        let mut game_over = field.is_game_over();

        while !game_over && stats.completed_pieces() < turn_limit {
            let piece = field.falling_piece();
            let placement = self.decide_move(field.board(), &piece, strategy, &mut rng);
            if !placement.fits(field.board()) {
                game_over = true;
                break;
            }
            let (cleared_lines, result) = field.complete_placement(&placement);
            stats.complete_piece_drop(cleared_lines);
            game_over = result.is_err();
        }

        log::debug!(
            "session {seed:?} ({strategy}): {} pieces, {} lines, game over: {game_over}",
            stats.completed_pieces(),
            stats.total_cleared_lines()
        );
        SessionOutcome {
            seed,
            strategy,
            stats,
            game_over,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use tetrist_engine::PieceKind;

    use super::*;
    use crate::scoring::ScoringKind;

    fn quick_lookahead() -> EngineConfig {
        EngineConfig {
            lookahead: LookaheadParams {
                breadth: 2,
                trials: 1,
                steps: 1,
                max_workers: 2,
            },
            ..EngineConfig::default()
        }
    }

    #[test]
    fn test_decide_move_fits_for_every_strategy() {
        let engine = Engine::new(quick_lookahead());
        let board: Board = "
            ..........
            ..........
            ...3......
            ..33..2...
            ..3..22...
            1111.22.11
            "
        .parse()
        .unwrap();
        let mut rng = Pcg32::seed_from_u64(11);
        for strategy in [Strategy::SingleStage, Strategy::Lookahead, Strategy::Random] {
            for kind in PieceKind::ALL {
                let piece = Piece::new(kind);
                let placement = engine.decide_move(&board, &piece, strategy, &mut rng);
                assert!(placement.fits(&board), "{strategy} {kind:?}");
                assert_eq!(placement.kind(), kind);
            }
        }
    }

    #[test]
    fn test_apply_placement_clears_lines() {
        let engine = Engine::new(EngineConfig {
            rows: 4,
            cols: 4,
            ..EngineConfig::default()
        });
        let mut board: Board = "
            ....
            ....
            11..
            11..
            "
        .parse()
        .unwrap();
        let mut rng = Pcg32::seed_from_u64(0);
        let placement = engine.decide_move(
            &board,
            &Piece::new(PieceKind::O),
            Strategy::SingleStage,
            &mut rng,
        );
        assert_eq!(engine.apply_placement(&mut board, &placement), 2);
        assert_eq!(board, engine.new_board());
    }

    #[test]
    #[should_panic(expected = "collides")]
    fn test_apply_colliding_placement_panics() {
        let engine = Engine::default();
        let mut board = engine.new_board();
        let placement = Placement::new(Piece::new(PieceKind::O), 0, 19);
        let _ = engine.apply_placement(&mut board, &placement);
    }

    #[test]
    #[should_panic(expected = "invalid marker")]
    fn test_decide_move_rejects_marked_board() {
        let engine = Engine::new(EngineConfig {
            rows: 4,
            cols: 4,
            ..EngineConfig::default()
        });
        let board: Board = "...x\n....\n....\n....".parse().unwrap();
        let mut rng = Pcg32::seed_from_u64(0);
        let _ = engine.decide_move(
            &board,
            &Piece::new(PieceKind::O),
            Strategy::SingleStage,
            &mut rng,
        );
    }

    #[test]
    #[should_panic(expected = "invalid marker")]
    fn test_apply_placement_rejects_marked_board() {
        let engine = Engine::new(EngineConfig {
            rows: 4,
            cols: 4,
            ..EngineConfig::default()
        });
        let mut board: Board = "...x\n....\n....\n....".parse().unwrap();
        let placement = Placement::new(Piece::new(PieceKind::O), 0, 2);
        assert!(placement.fits(&board));
        let _ = engine.apply_placement(&mut board, &placement);
    }

    #[test]
    #[should_panic(expected = "board must be at least")]
    fn test_engine_rejects_tiny_board() {
        let _ = Engine::new(EngineConfig {
            cols: 3,
            ..EngineConfig::default()
        });
    }

    #[test]
    fn test_single_stage_session_survives() {
        let engine = Engine::default();
        let outcome = engine.play_session(PieceSeed::new(1), 60, Strategy::SingleStage);
        assert!(!outcome.game_over);
        assert_eq!(outcome.stats.completed_pieces(), 60);
        assert!(outcome.stats.score() > 0);
    }

    #[test]
    fn test_random_session_ends() {
        let engine = Engine::new(EngineConfig {
            rows: 8,
            cols: 6,
            ..EngineConfig::default()
        });
        let outcome = engine.play_session(PieceSeed::new(3), 10_000, Strategy::Random);
        assert!(outcome.game_over);
        assert!(outcome.stats.completed_pieces() < 10_000);
    }

    #[test]
    fn test_session_is_reproducible() {
        let engine = Engine::new(EngineConfig {
            scoring: ScoringKind::Dellacherie.into(),
            ..quick_lookahead()
        });
        let a = engine.play_session(PieceSeed::new(9), 30, Strategy::Lookahead);
        let b = engine.play_session(PieceSeed::new(9), 30, Strategy::Lookahead);
        assert_eq!(a, b);
    }

    #[test]
    fn test_config_serialization() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());

        let config: EngineConfig = serde_json::from_str(
            r#"{"rows": 12, "scoring": {"model": "dellacherie"}, "lookahead": {"breadth": 5}}"#,
        )
        .unwrap();
        assert_eq!(config.rows, 12);
        assert_eq!(config.cols, Board::STANDARD_COLS);
        assert_eq!(config.scoring.kind(), ScoringKind::Dellacherie);
        assert_eq!(config.lookahead.breadth, 5);
        assert_eq!(config.lookahead.trials, LookaheadParams::default().trials);

        let serialized = serde_json::to_string(&EngineConfig::default()).unwrap();
        let deserialized: EngineConfig = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, EngineConfig::default());
    }

    #[test]
    fn test_strategy_names() {
        assert_eq!(
            "SingleStage".parse::<Strategy>().unwrap(),
            Strategy::SingleStage
        );
        assert_eq!("Random".parse::<Strategy>().unwrap(), Strategy::Random);
        assert_eq!(Strategy::Lookahead.to_string(), "Lookahead");
        assert_eq!(
            serde_json::to_string(&Strategy::SingleStage).unwrap(),
            r#""single_stage""#
        );
    }
}
