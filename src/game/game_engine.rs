use log::{trace, warn};
use std::cell::RefCell;
use std::rc::Rc;

use super::game_session::GameSession;
use super::leaderboard::LeaderboardStore;
use super::settings::Settings;
use crate::destroyable::Destroyable;
use crate::events::{EventEmitter, EventHandler, EventObserver, Unsubscriber};
use crate::model::{
    GameEngineCommand, GameEngineEvent, GameResult, GameSessionSnapshot, RankedEntry, Verdict,
};
use crate::platform::Storage;

/// Routes commands from the presentation layer into the session and the
/// leaderboard, and publishes the resulting state as events.
///
/// Listeners of `GameEngineEvent` run while the engine is borrowed, so they
/// must not send commands synchronously.
pub struct GameEngine {
    session: GameSession,
    leaderboard: LeaderboardStore,
    settings: Settings,
    settings_storage: Box<dyn Storage>,
    pending_result: Option<GameResult>,
    subscription: Option<Unsubscriber<GameEngineCommand>>,
    game_engine_event_emitter: EventEmitter<GameEngineEvent>,
}

impl Destroyable for GameEngine {
    fn destroy(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl EventHandler<GameEngineCommand> for GameEngine {
    fn handle_event(&mut self, event: &GameEngineCommand) {
        self.handle_command(event.clone());
    }
}

impl GameEngine {
    pub fn new(
        game_engine_command_observer: EventObserver<GameEngineCommand>,
        game_engine_event_emitter: EventEmitter<GameEngineEvent>,
        session: GameSession,
        leaderboard: LeaderboardStore,
        settings_storage: Box<dyn Storage>,
    ) -> Rc<RefCell<Self>> {
        let settings = Settings::load(settings_storage.as_ref());
        let engine = Self {
            session,
            leaderboard,
            settings,
            settings_storage,
            pending_result: None,
            subscription: None,
            game_engine_event_emitter,
        };
        let refcell = Rc::new(RefCell::new(engine));
        GameEngine::wire_subscription(refcell.clone(), game_engine_command_observer);
        refcell
    }

    fn wire_subscription(
        game_engine: Rc<RefCell<Self>>,
        game_engine_command_observer: EventObserver<GameEngineCommand>,
    ) {
        let handler = game_engine.clone();
        let subscription = game_engine_command_observer.subscribe(move |command| {
            handler.borrow_mut().handle_event(command);
        });
        game_engine.borrow_mut().subscription = Some(subscription);
    }

    pub fn handle_command(&mut self, command: GameEngineCommand) {
        trace!(target: "game_engine", "Handling command: {:?}", command);
        match command {
            GameEngineCommand::NewGame => self.new_game(),
            GameEngineCommand::Guess(input) => self.guess(&input),
            GameEngineCommand::SubmitScore(player_name) => self.submit_score(&player_name),
            GameEngineCommand::InitDisplay => self.sync_display(),
        }
    }

    fn new_game(&mut self) {
        self.session.new_game();
        self.pending_result = None;
        self.emit(GameEngineEvent::SessionUpdated(self.session.snapshot()));
    }

    fn guess(&mut self, input: &str) {
        match self.session.guess(input) {
            Err(e) => {
                self.emit(GameEngineEvent::InvalidInput(format!(
                    "{}. Please enter a whole number.",
                    e
                )));
            }
            Ok(None) => {
                trace!(target: "game_engine", "Round already won, ignoring {:?}", input);
            }
            Ok(Some(verdict)) => {
                self.emit(GameEngineEvent::SessionUpdated(self.session.snapshot()));
                if let Verdict::Won { elapsed, attempts } = verdict {
                    let result = GameResult { elapsed, attempts };
                    self.pending_result = Some(result);
                    self.emit(GameEngineEvent::GameWon(result));
                }
            }
        }
    }

    fn submit_score(&mut self, player_name: &str) {
        let Some(result) = self.pending_result.take() else {
            warn!(target: "game_engine", "No finished game to record for {:?}", player_name);
            return;
        };

        let ranked = self.leaderboard.submit_result(player_name, &result);
        self.remember_player(&ranked);

        self.emit(GameEngineEvent::ScoreRecorded(ranked));
        self.emit(GameEngineEvent::LeaderboardUpdated(
            self.leaderboard.entries().to_vec(),
        ));
        self.emit(GameEngineEvent::GlobalStatsUpdated(
            self.leaderboard.global_stats().clone(),
        ));
    }

    fn remember_player(&mut self, ranked: &RankedEntry) {
        let name = ranked.entry.player_name().to_string();
        if self.settings.last_player_name.as_deref() == Some(name.as_str()) {
            return;
        }
        self.settings.last_player_name = Some(name);
        if let Err(e) = self.settings.save(self.settings_storage.as_mut()) {
            warn!(target: "game_engine", "Failed to save settings: {}", e);
        }
    }

    fn sync_display(&mut self) {
        self.emit(GameEngineEvent::SessionUpdated(self.session.snapshot()));
        self.emit(GameEngineEvent::LeaderboardUpdated(
            self.leaderboard.entries().to_vec(),
        ));
        self.emit(GameEngineEvent::GlobalStatsUpdated(
            self.leaderboard.global_stats().clone(),
        ));
    }

    fn emit(&self, event: GameEngineEvent) {
        self.game_engine_event_emitter.emit(event);
    }

    pub fn session_snapshot(&self) -> GameSessionSnapshot {
        self.session.snapshot()
    }

    pub fn leaderboard(&self) -> &LeaderboardStore {
        &self.leaderboard
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The won round waiting for a player name, if any.
    pub fn pending_result(&self) -> Option<GameResult> {
        self.pending_result
    }
}
