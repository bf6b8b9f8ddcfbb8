use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use serde_with::DurationSecondsWithFrac;
use std::time::Duration;

use super::ScoreEntry;

/// What a won round hands to the leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameResult {
    pub elapsed: Duration,
    pub attempts: u32,
}

impl GameResult {
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Running totals over every recorded win, including those that missed the
/// leaderboard.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct GlobalStats {
    pub games_won: u32,
    pub total_attempts: u64,
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    pub total_time_played: Duration,
    pub best_score: Option<f64>,
}

impl GlobalStats {
    pub fn record(&mut self, entry: &ScoreEntry) {
        self.games_won = self.games_won.saturating_add(1);
        self.total_attempts = self.total_attempts.saturating_add(u64::from(entry.attempts()));
        self.total_time_played = self
            .total_time_played
            .saturating_add(Duration::try_from_secs_f64(entry.elapsed_seconds()).unwrap_or(Duration::MAX));
        self.best_score = Some(match self.best_score {
            Some(best) => best.max(entry.score()),
            None => entry.score(),
        });
    }

    pub fn average_attempts(&self) -> Option<f64> {
        if self.games_won > 0 {
            Some(self.total_attempts as f64 / f64::from(self.games_won))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_record_accumulates() {
        let mut stats = GlobalStats::default();
        assert_eq!(stats.average_attempts(), None);

        stats.record(&ScoreEntry::new("a", 300.0, 50, Utc::now()));
        stats.record(&ScoreEntry::new("b", 30.5, 10, Utc::now()));

        assert_eq!(stats.games_won, 2);
        assert_eq!(stats.total_attempts, 60);
        assert_eq!(stats.total_time_played, Duration::from_secs_f64(330.5));
        assert_eq!(stats.best_score, Some(50.0));
        assert_eq!(stats.average_attempts(), Some(30.0));
    }

    #[test]
    fn test_record_saturates_huge_elapsed() {
        let mut stats = GlobalStats::default();
        stats.record(&ScoreEntry::new("a", 1.0e20, 1, Utc::now()));
        stats.record(&ScoreEntry::new("b", 10.0, 1, Utc::now()));

        assert_eq!(stats.games_won, 2);
        assert_eq!(stats.total_time_played, Duration::MAX);
    }

    #[test]
    fn test_total_time_serialized_as_seconds() {
        let stats = GlobalStats {
            total_time_played: Duration::from_millis(1500),
            ..Default::default()
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["total_time_played"], serde_json::json!(1.5));
    }
}
