use log::{debug, trace, warn};
use std::cmp::Ordering;
use std::ops::RangeInclusive;
use std::rc::Rc;

use super::settings::Settings;
use crate::error::GuessError;
use crate::model::{GameResult, GameSessionSnapshot, TimerState, Verdict};
use crate::platform::{Clock, RandomSource};

pub const SECRET_RANGE: RangeInclusive<i64> = 0..=100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    InProgress,
    Won,
}

/// One round of the game: the hidden secret, the attempt counter and the
/// timer. Only `guess` and `new_game` change it.
pub struct GameSession {
    secret: i64,
    range: RangeInclusive<i64>,
    attempts: u32,
    timer_state: TimerState,
    state: SessionState,
    last_verdict: Option<Verdict>,
    debug_mode: bool,
    clock: Rc<dyn Clock>,
    random: Box<dyn RandomSource>,
}

impl GameSession {
    pub fn new(clock: Rc<dyn Clock>, random: Box<dyn RandomSource>) -> Self {
        let now = clock.now();
        let mut session = Self {
            secret: 0,
            range: SECRET_RANGE,
            attempts: 0,
            timer_state: TimerState::started(now),
            state: SessionState::InProgress,
            last_verdict: None,
            debug_mode: Settings::is_debug_mode(),
            clock,
            random,
        };
        session.new_game();
        session
    }

    /// Starts a fresh round over the default range.
    pub fn new_game(&mut self) {
        self.new_game_in(SECRET_RANGE);
    }

    /// Starts a fresh round with the secret drawn from `range`.
    pub fn new_game_in(&mut self, range: RangeInclusive<i64>) {
        let range = if range.is_empty() {
            warn!(target: "game_session", "Empty secret range {:?}, using {:?}", range, SECRET_RANGE);
            SECRET_RANGE
        } else {
            range
        };
        self.secret = self.random.uniform(range.clone());
        self.range = range;
        self.attempts = 0;
        self.timer_state = TimerState::started(self.clock.now());
        self.state = SessionState::InProgress;
        self.last_verdict = None;
        if self.debug_mode {
            debug!(target: "game_session", "New game; secret: {}", self.secret);
        }
        trace!(target: "game_session", "New game in {:?}", self.range);
    }

    /// Parses player input and evaluates it. Returns `Ok(None)` once the
    /// round is won; further guesses are ignored until `new_game`.
    pub fn guess(&mut self, input: &str) -> Result<Option<Verdict>, GuessError> {
        let trimmed = input.trim();
        let value = trimmed
            .parse::<i64>()
            .map_err(|_| GuessError::InvalidInput(trimmed.to_string()))?;
        Ok(self.guess_value(value))
    }

    pub fn guess_value(&mut self, value: i64) -> Option<Verdict> {
        if self.state == SessionState::Won {
            trace!(target: "game_session", "Ignoring guess {} after win", value);
            return None;
        }

        self.attempts = self.attempts.saturating_add(1);
        let verdict = match value.cmp(&self.secret) {
            Ordering::Less => Verdict::TooLow,
            Ordering::Greater => Verdict::TooHigh,
            Ordering::Equal => {
                let now = self.clock.now();
                self.timer_state = self.timer_state.ended(now);
                self.state = SessionState::Won;
                Verdict::Won {
                    elapsed: self.timer_state.elapsed(now),
                    attempts: self.attempts,
                }
            }
        };
        trace!(target: "game_session", "Guess {} (attempt {}): {:?}", value, self.attempts, verdict);
        self.last_verdict = Some(verdict);
        Some(verdict)
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_won(&self) -> bool {
        self.state == SessionState::Won
    }

    pub fn range(&self) -> RangeInclusive<i64> {
        self.range.clone()
    }

    pub fn last_verdict(&self) -> Option<Verdict> {
        self.last_verdict
    }

    /// The finished round, once won.
    pub fn result(&self) -> Option<GameResult> {
        match self.last_verdict {
            Some(Verdict::Won { elapsed, attempts }) => Some(GameResult { elapsed, attempts }),
            _ => None,
        }
    }

    pub fn message(&self) -> String {
        match self.last_verdict {
            Some(verdict) => verdict.to_string(),
            None => format!(
                "Guess a number between {} and {}.",
                self.range.start(),
                self.range.end()
            ),
        }
    }

    pub fn snapshot(&self) -> GameSessionSnapshot {
        GameSessionSnapshot {
            attempts: self.attempts,
            won: self.is_won(),
            last_verdict: self.last_verdict,
            message: self.message(),
            range_start: *self.range.start(),
            range_end: *self.range.end(),
        }
    }
}
