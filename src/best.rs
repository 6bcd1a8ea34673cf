//! Personal best
//!
//! The game-over screen reports the final score. `PersonalBest` remembers the
//! strongest run so far so that screen can also say whether it was beaten.
//! Storage is left to the platform layer; this type only serializes.

use serde::{Deserialize, Serialize};

use crate::sim::GameState;

/// Outcome of one finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    pub score: u64,
    pub best_streak: u32,
}

impl RunResult {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            score: state.score,
            best_streak: state.best_streak,
        }
    }

    /// Higher score wins; equal scores fall to the longer streak
    pub fn beats(&self, other: &RunResult) -> bool {
        (self.score, self.best_streak) > (other.score, other.best_streak)
    }
}

/// What the game-over screen shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameOverSummary {
    pub run: RunResult,
    pub previous_best: Option<RunResult>,
    pub new_best: bool,
    pub runs_played: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalBest {
    pub best: Option<RunResult>,
    pub runs_played: u32,
}

impl PersonalBest {
    /// Restore from saved JSON, starting fresh if it is unreadable
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(best) => best,
            Err(e) => {
                log::warn!("Discarding corrupt personal best: {}", e);
                Self::default()
            }
        }
    }

    /// Count a finished run and keep it if it is the new best
    ///
    /// A run that scored nothing never becomes the best.
    pub fn record(&mut self, run: RunResult) -> GameOverSummary {
        self.runs_played = self.runs_played.saturating_add(1);
        let previous_best = self.best;
        let new_best = run.score > 0 && previous_best.is_none_or(|best| run.beats(&best));
        if new_best {
            log::info!(
                "New personal best: {} (streak {})",
                run.score,
                run.best_streak
            );
            self.best = Some(run);
        }
        GameOverSummary {
            run,
            previous_best,
            new_best,
            runs_played: self.runs_played,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(score: u64, best_streak: u32) -> RunResult {
        RunResult { score, best_streak }
    }

    #[test]
    fn test_first_scoring_run_is_best() {
        let mut pb = PersonalBest::default();
        let summary = pb.record(run(120, 2));
        assert!(summary.new_best);
        assert_eq!(summary.previous_best, None);
        assert_eq!(summary.runs_played, 1);
        assert_eq!(pb.best, Some(run(120, 2)));
    }

    #[test]
    fn test_zero_score_only_counts_the_run() {
        let mut pb = PersonalBest::default();
        let summary = pb.record(run(0, 0));
        assert!(!summary.new_best);
        assert_eq!(pb.best, None);
        assert_eq!(pb.runs_played, 1);
    }

    #[test]
    fn test_streak_breaks_ties() {
        let mut pb = PersonalBest::default();
        pb.record(run(300, 3));

        let summary = pb.record(run(300, 2));
        assert!(!summary.new_best);
        assert_eq!(pb.best, Some(run(300, 3)));

        let summary = pb.record(run(300, 6));
        assert!(summary.new_best);
        assert_eq!(summary.previous_best, Some(run(300, 3)));

        // A higher score wins regardless of streak
        assert!(pb.record(run(301, 0)).new_best);
        assert!(!pb.record(run(250, 40)).new_best);
        assert_eq!(pb.runs_played, 5);
    }

    #[test]
    fn test_corrupt_json_starts_fresh() {
        assert_eq!(PersonalBest::from_json("{ nope"), PersonalBest::default());

        let mut pb = PersonalBest::default();
        pb.record(run(90, 1));
        let json = serde_json::to_string(&pb).unwrap();
        assert_eq!(PersonalBest::from_json(&json), pb);
    }
}
