use super::{GameResult, GameSessionSnapshot, GlobalStats, RankedEntry, ScoreEntry};

#[derive(Debug, Clone)]
pub enum GameEngineEvent {
    SessionUpdated(GameSessionSnapshot),
    /// Input rejected; carries the message to show the player.
    InvalidInput(String),
    GameWon(GameResult),
    ScoreRecorded(RankedEntry),
    LeaderboardUpdated(Vec<ScoreEntry>),
    GlobalStatsUpdated(GlobalStats),
}
