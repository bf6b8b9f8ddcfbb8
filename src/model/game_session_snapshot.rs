use super::Verdict;

/// Immutable view of a session for presentation to render from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSessionSnapshot {
    pub attempts: u32,
    pub won: bool,
    pub last_verdict: Option<Verdict>,
    pub message: String,
    pub range_start: i64,
    pub range_end: i64,
}
