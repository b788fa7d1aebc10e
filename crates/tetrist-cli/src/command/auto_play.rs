use std::path::PathBuf;

use chrono::Utc;
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use tetrist_engine::PieceSeed;
use tetrist_evaluator::{
    engine::{Engine, SessionOutcome, Strategy},
    scoring::ScoringKind,
};

use crate::{
    schema::run_record::{RunRecord, ScoreSummary},
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AutoPlayArg {
    /// Number of games to play
    #[arg(long, default_value_t = 10)]
    games: usize,
    /// Move selection strategy (lookahead, singlestage, random)
    #[arg(long, default_value = "lookahead")]
    strategy: Strategy,
    /// Scoring model (simple, dellacherie); overrides the config file
    #[arg(long)]
    scoring: Option<ScoringKind>,
    /// Seed (hex) the per-game piece seeds are drawn from; random when omitted
    #[arg(long)]
    seed: Option<PieceSeed>,
    /// Maximum number of pieces per game
    #[arg(long, default_value_t = 1000)]
    max_turns: usize,
    /// Engine configuration file (JSON, see `default-config`)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write a JSON run record to this file
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &AutoPlayArg) -> anyhow::Result<()> {
    let AutoPlayArg {
        games,
        strategy,
        scoring,
        seed,
        max_turns,
        config,
        output,
    } = arg;

    let mut config = util::load_engine_config(config.as_deref())?;
    if let Some(scoring) = scoring {
        config.scoring = (*scoring).into();
    }
    let engine = Engine::new(config);

    let run_seed = seed.unwrap_or_else(|| rand::rng().random());
    let mut seed_rng = Pcg32::seed_from_u64(run_seed.value());
    log::info!(
        "playing {games} games: strategy={strategy}, scoring={}, run seed={:016x}",
        config.scoring.kind(),
        run_seed.value()
    );

    let mut sessions = Vec::with_capacity(*games);
    for game in 0..*games {
        let outcome = engine.play_session(seed_rng.random(), *max_turns, *strategy);
        log_outcome(game, &outcome);
        sessions.push(outcome);
    }

    let summary = ScoreSummary::from_outcomes(&sessions);
    eprintln!("Summary ({strategy}, {}):", config.scoring.kind());
    eprintln!("  Games:      {}", summary.games);
    eprintln!("  Game overs: {}", summary.game_overs);
    eprintln!("  Score min:  {}", summary.min_score);
    eprintln!("  Score max:  {}", summary.max_score);
    eprintln!("  Score mean: {:.2}", summary.mean_score);
    eprintln!("  Pieces:     {:.2}", summary.mean_pieces);

    if let Some(path) = output {
        let record = RunRecord {
            recorded_at: Utc::now(),
            strategy: *strategy,
            max_turns: *max_turns,
            config,
            summary,
            sessions,
        };
        Output::save_json(&record, Some(path.clone()))?;
        eprintln!("Run record saved to {}", path.display());
    }

    Ok(())
}

fn log_outcome(game: usize, outcome: &SessionOutcome) {
    let stats = &outcome.stats;
    log::info!(
        "game #{game} (seed {:016x}): score={} pieces={} clears={:?}{}",
        outcome.seed.value(),
        stats.score(),
        stats.completed_pieces(),
        stats.line_cleared_counter(),
        if outcome.game_over {
            ""
        } else {
            " (turn limit)"
        }
    );
}
