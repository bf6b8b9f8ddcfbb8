#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEngineCommand {
    NewGame,
    /// Raw player input, parsed by the session
    Guess(String),
    /// Records the pending win under this player name
    SubmitScore(String),
    InitDisplay,
}
