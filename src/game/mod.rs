pub mod game_engine;
pub mod game_session;
pub mod leaderboard;
pub mod scoring;
pub mod settings;

pub use game_engine::GameEngine;
pub use game_session::{GameSession, SessionState, SECRET_RANGE};
pub use leaderboard::{LeaderboardStore, MAX_ENTRIES};
pub use scoring::score;
pub use settings::Settings;
