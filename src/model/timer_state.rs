use std::time::{Duration, Instant};

/// Start/stop marks for one round, on the monotonic clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerState {
    pub started_at: Instant,
    pub ended_at: Option<Instant>,
}

impl TimerState {
    pub fn started(now: Instant) -> Self {
        Self {
            started_at: now,
            ended_at: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.ended_at.is_none()
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        self.ended_at
            .unwrap_or(now)
            .saturating_duration_since(self.started_at)
    }

    pub fn ended(&self, now: Instant) -> TimerState {
        let mut new_state = *self;
        new_state.ended_at = Some(now);
        new_state
    }
}
