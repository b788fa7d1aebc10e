//! Lookahead player: immediate cost plus a sampled estimate of future cost.
//!
//! # Algorithm
//!
//! 1. Enumerate and score every immediate placement.
//! 2. Keep the `breadth` lowest-cost candidates.
//! 3. For each kept candidate, play `trials` short games of `steps` pieces on a copy of its
//!    scratch board. Each future piece is drawn uniformly and placed by the single-stage player.
//!    The expected future cost is the mean chosen cost over all simulated steps.
//! 4. Return the candidate minimizing `immediate + expected future` cost.
//!
//! # Parallelism
//!
//! Step 3 runs one worker thread per candidate, at most `max_workers` at a time. Each worker
//! owns a copy of its board and a [`Pcg32`] seeded from the caller's RNG, so results are
//! reproducible for a given caller seed regardless of scheduling.

use std::thread;

use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use tetrist_engine::{Board, Piece};

use crate::{
    move_enumerator::{Candidate, enumerate_moves},
    scoring::{INVALID_COST, ScoringModel},
    single_stage::select_move,
};

/// Tuning knobs of the lookahead search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookaheadParams {
    /// Number of best immediate candidates explored further (K).
    pub breadth: usize,
    /// Simulated games per candidate.
    pub trials: usize,
    /// Future pieces placed per simulated game.
    pub steps: usize,
    /// Upper bound on concurrently running workers.
    pub max_workers: usize,
}

impl Default for LookaheadParams {
    fn default() -> Self {
        Self {
            breadth: 3,
            trials: 5,
            steps: 3,
            max_workers: 3,
        }
    }
}

/// A candidate together with its estimated future cost.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    candidate: Candidate,
    future_cost: f64,
}

impl ScoredCandidate {
    #[must_use]
    pub fn candidate(&self) -> &Candidate {
        &self.candidate
    }

    #[must_use]
    pub fn into_candidate(self) -> Candidate {
        self.candidate
    }

    #[must_use]
    pub fn immediate_cost(&self) -> f64 {
        self.candidate.cost()
    }

    #[must_use]
    pub fn future_cost(&self) -> f64 {
        self.future_cost
    }

    #[must_use]
    pub fn total_cost(&self) -> f64 {
        self.candidate.cost() + self.future_cost
    }
}

/// Chooses a placement for `piece` by looking ahead through simulated future pieces.
///
/// With `trials` or `steps` set to zero the future cost is zero everywhere and the result is
/// the same placement [`select_move`] returns.
///
/// # Panics
///
/// Panics if no rotation of `piece` fits within the board width.
pub fn select_move_with_lookahead<R>(
    board: &Board,
    piece: &Piece,
    model: &ScoringModel,
    params: &LookaheadParams,
    rng: &mut R,
) -> ScoredCandidate
where
    R: Rng + ?Sized,
{
    let mut candidates = enumerate_moves(board, piece, model);
    assert!(
        !candidates.is_empty(),
        "no rotation of piece {:?} fits a {}-column board",
        piece.kind(),
        board.cols()
    );

    // stable: equal costs keep enumeration order
    candidates.sort_by(|a, b| a.cost().total_cmp(&b.cost()));
    candidates.truncate(params.breadth.max(1));

    let seeds = candidates
        .iter()
        .map(|_| rng.random::<u64>())
        .collect::<Vec<_>>();
    let future_costs = estimate_future_costs(&candidates, &seeds, model, params);

    let mut best: Option<ScoredCandidate> = None;
    for (candidate, future_cost) in candidates.into_iter().zip(future_costs) {
        let scored = ScoredCandidate {
            candidate,
            future_cost,
        };
        log::debug!(
            "lookahead candidate {}: immediate={:.3} future={:.3}",
            scored.candidate.placement(),
            scored.immediate_cost(),
            scored.future_cost()
        );
        if best
            .as_ref()
            .is_none_or(|best| scored.total_cost() < best.total_cost())
        {
            best = Some(scored);
        }
    }
    best.unwrap_or_else(|| unreachable!("candidate list is non-empty"))
}

fn estimate_future_costs(
    candidates: &[Candidate],
    seeds: &[u64],
    model: &ScoringModel,
    params: &LookaheadParams,
) -> Vec<f64> {
    let workers = params.max_workers.max(1);
    let mut future_costs = vec![0.0; candidates.len()];

    let batches = candidates
        .chunks(workers)
        .zip(seeds.chunks(workers))
        .zip(future_costs.chunks_mut(workers));
    for ((candidates, seeds), future_costs) in batches {
        thread::scope(|s| {
            for ((candidate, &seed), future_cost) in candidates.iter().zip(seeds).zip(future_costs)
            {
                let board = candidate.board().clone();
                s.spawn(move || {
                    let mut rng = Pcg32::seed_from_u64(seed);
                    *future_cost = expected_future_cost(board, model, params, &mut rng);
                });
            }
        });
    }

    future_costs
}

/// Mean cost of the single-stage player's choices over `trials × steps` simulated pieces.
///
/// A trial that reaches an invalid board stops early and charges that step's cost for each
/// remaining step, so a doomed future is never cheaper than a surviving one.
#[expect(clippy::cast_precision_loss)]
pub fn expected_future_cost<R>(
    board: Board,
    model: &ScoringModel,
    params: &LookaheadParams,
    rng: &mut R,
) -> f64
where
    R: Rng + ?Sized,
{
    let total_steps = params.trials * params.steps;
    if total_steps == 0 {
        return 0.0;
    }
    if board.is_invalid() {
        return INVALID_COST;
    }

    let mut total_cost = 0.0;
    for _ in 0..params.trials {
        let mut board = board.clone();
        for step in 0..params.steps {
            let piece = Piece::random(rng);
            let chosen = select_move(&board, &piece, model);
            if !chosen.analysis().is_valid() {
                total_cost += chosen.cost() * (params.steps - step) as f64;
                break;
            }
            total_cost += chosen.cost();
            board = chosen.into_board();
        }
    }
    total_cost / total_steps as f64
}
