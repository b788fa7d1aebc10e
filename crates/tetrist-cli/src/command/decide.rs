use std::path::PathBuf;

use rand::SeedableRng as _;
use rand_pcg::Pcg32;
use serde::Serialize;
use tetrist_engine::{Board, Piece, PieceKind, Placement};
use tetrist_evaluator::{
    engine::{Engine, EngineConfig, Strategy},
    scoring::ScoringKind,
};

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct DecideArg {
    /// Piece to place (I, S, Z, L, J, O, T)
    #[arg(long)]
    piece: PieceKind,
    /// Board in text form, one line per row; read from stdin when omitted
    #[arg(long)]
    board: Option<PathBuf>,
    /// Move selection strategy (lookahead, singlestage, random)
    #[arg(long, default_value = "singlestage")]
    strategy: Strategy,
    /// Scoring model (simple, dellacherie); overrides the config file
    #[arg(long)]
    scoring: Option<ScoringKind>,
    /// Seed for the lookahead sampling
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Engine configuration file (JSON, see `default-config`)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct Decision {
    strategy: Strategy,
    placement: Placement,
    cleared_lines: usize,
    board: Board,
}

pub(crate) fn run(arg: &DecideArg) -> anyhow::Result<()> {
    let DecideArg {
        piece,
        board,
        strategy,
        scoring,
        seed,
        config,
        output,
    } = arg;

    let mut board = util::read_board(board.as_deref())?;
    util::check_board_size(board.rows(), board.cols())?;

    let base = match config {
        Some(path) => util::read_json_file::<EngineConfig, _>("engine config", path)?,
        None => EngineConfig::default(),
    };
    let config = EngineConfig {
        rows: board.rows(),
        cols: board.cols(),
        scoring: scoring.map_or(base.scoring, Into::into),
        ..base
    };
    let engine = Engine::new(config);

    let mut rng = Pcg32::seed_from_u64(*seed);
    let placement = engine.decide_move(&board, &Piece::new(*piece), *strategy, &mut rng);
    anyhow::ensure!(
        placement.fits(&board),
        "no legal placement for piece {} on this board",
        piece.as_char()
    );
    let cleared_lines = engine.apply_placement(&mut board, &placement);
    log::info!("{strategy}: {placement} clears {cleared_lines} lines");

    let decision = Decision {
        strategy: *strategy,
        placement,
        cleared_lines,
        board,
    };
    Output::save_json(&decision, output.clone())
}
