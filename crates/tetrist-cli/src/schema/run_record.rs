use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tetrist_evaluator::engine::{EngineConfig, SessionOutcome, Strategy};

/// Result of an `auto-play` run, written as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    /// Timestamp when the run finished (ISO 8601 format)
    pub recorded_at: DateTime<Utc>,
    pub strategy: Strategy,
    pub max_turns: usize,
    pub config: EngineConfig,
    pub summary: ScoreSummary,
    pub sessions: Vec<SessionOutcome>,
}

/// Aggregate scores over a set of sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub games: usize,
    pub game_overs: usize,
    pub min_score: usize,
    pub max_score: usize,
    pub mean_score: f64,
    pub mean_pieces: f64,
}

impl ScoreSummary {
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn from_outcomes(outcomes: &[SessionOutcome]) -> Self {
        let games = outcomes.len();
        let scores = outcomes.iter().map(|o| o.stats.score());
        let total_score = scores.clone().sum::<usize>();
        let total_pieces = outcomes
            .iter()
            .map(|o| o.stats.completed_pieces())
            .sum::<usize>();
        let mean = |total: usize| {
            if games == 0 {
                0.0
            } else {
                total as f64 / games as f64
            }
        };
        Self {
            games,
            game_overs: outcomes.iter().filter(|o| o.game_over).count(),
            min_score: scores.clone().min().unwrap_or(0),
            max_score: scores.max().unwrap_or(0),
            mean_score: mean(total_score),
            mean_pieces: mean(total_pieces),
        }
    }
}

#[cfg(test)]
mod tests {
    use tetrist_engine::{GameStats, PieceSeed};

    use super::*;

    fn outcome(lines: &[usize], game_over: bool) -> SessionOutcome {
        let mut stats = GameStats::new();
        for &n in lines {
            stats.complete_piece_drop(n);
        }
        SessionOutcome {
            seed: PieceSeed::new(0),
            strategy: Strategy::SingleStage,
            stats,
            game_over,
        }
    }

    #[test]
    fn test_summary() {
        let outcomes = [outcome(&[0, 1, 0, 4], true), outcome(&[2, 0], false)];
        let summary = ScoreSummary::from_outcomes(&outcomes);
        assert_eq!(summary.games, 2);
        assert_eq!(summary.game_overs, 1);
        assert_eq!(summary.min_score, 2);
        assert_eq!(summary.max_score, 5);
        assert!((summary.mean_score - 3.5).abs() < f64::EPSILON);
        assert!((summary.mean_pieces - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_summary() {
        let summary = ScoreSummary::from_outcomes(&[]);
        assert_eq!(summary.games, 0);
        assert!(summary.mean_score.abs() < f64::EPSILON);
    }
}
