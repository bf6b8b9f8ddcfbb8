use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::scoring::score;

pub const DEFAULT_PLAYER_NAME: &str = "Player";

/// One finished game on the leaderboard. Fields are fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    id: Uuid,
    player_name: String,
    elapsed_seconds: f64,
    attempts: u32,
    score: f64,
    recorded_at: DateTime<Utc>,
}

impl ScoreEntry {
    /// Builds an entry and computes its score. Callers pass sanitized
    /// values: `attempts >= 1` and a finite, non-negative elapsed time.
    pub fn new(
        player_name: &str,
        elapsed_seconds: f64,
        attempts: u32,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            player_name: display_name(player_name),
            elapsed_seconds,
            attempts,
            score: score(elapsed_seconds, attempts),
            recorded_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_seconds
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    /// Secondary ranking key, lower is better.
    pub fn tie_breaker(&self) -> f64 {
        f64::from(self.attempts) + self.elapsed_seconds / 60.0
    }

    /// `Less` means `self` ranks ahead of `other`. Score descending, then
    /// tie-breaker ascending. Complete ties compare `Equal`.
    pub fn rank_cmp(&self, other: &ScoreEntry) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.tie_breaker().total_cmp(&other.tie_breaker()))
    }
}

fn display_name(player_name: &str) -> String {
    let trimmed = player_name.trim();
    if trimmed.is_empty() {
        DEFAULT_PLAYER_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// A freshly recorded entry with its 1-based leaderboard position, `None`
/// when it did not make the cut.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry {
    pub entry: ScoreEntry,
    pub rank: Option<usize>,
}

impl RankedEntry {
    pub fn made_leaderboard(&self) -> bool {
        self.rank.is_some()
    }
}
