mod game_engine_command;
mod game_engine_event;
pub mod game_session_snapshot;
mod game_stats;
mod score_entry;
mod timer_state;
mod verdict;

pub use game_engine_command::GameEngineCommand;
pub use game_engine_event::GameEngineEvent;
pub use game_session_snapshot::GameSessionSnapshot;
pub use game_stats::{GameResult, GlobalStats};
pub use score_entry::{RankedEntry, ScoreEntry, DEFAULT_PLAYER_NAME};
pub use timer_state::TimerState;
pub use verdict::Verdict;
