use crate::ports::TimeProvider;
use crate::scoreboard::detector::{BadgeKind, StyleHint};
use crate::types::matches::MatchId;

use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use time::OffsetDateTime;
use tokio::task::JoinHandle;

pub const DEFAULT_BADGE_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadgeSignal {
    pub match_id: MatchId,
    pub label: String,
    pub style: StyleHint,
    pub kind: BadgeKind,
    pub expires_at: OffsetDateTime,
}

#[derive(Debug)]
struct ActiveBadge {
    signal: BadgeSignal,
    generation: u64,
}

#[derive(Debug, Default)]
struct BoardState {
    active: HashMap<MatchId, ActiveBadge>,
    timers: HashMap<MatchId, JoinHandle<()>>,
    generation: u64,
}

/// At most one badge per match, each cleared by its own timer.
///
/// Raising a badge for a match that already shows one replaces it and
/// restarts the timer. Outside a tokio runtime no timer is spawned and
/// badges are dropped once `expires_at` has passed on the next read.
#[derive(Debug, Clone)]
pub struct BadgeBoard<T> {
    time: T,
    duration: Duration,
    state: Arc<Mutex<BoardState>>,
}

impl<T: TimeProvider> BadgeBoard<T> {
    pub fn new(time: T) -> Self {
        Self::with_duration(time, DEFAULT_BADGE_DURATION)
    }

    pub fn with_duration(time: T, duration: Duration) -> Self {
        Self {
            time,
            duration,
            state: Arc::new(Mutex::new(BoardState::default())),
        }
    }

    pub fn raise(&self, match_id: MatchId, kind: BadgeKind) -> BadgeSignal {
        let signal = BadgeSignal {
            label: kind.label(),
            style: kind.style(),
            match_id: match_id.clone(),
            kind,
            expires_at: self.time.deadline(self.duration),
        };

        let mut state = self.state.lock().expect("badge board lock");
        state.generation += 1;
        let generation = state.generation;
        state.active.insert(
            match_id.clone(),
            ActiveBadge {
                signal: signal.clone(),
                generation,
            },
        );

        let previous = match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let timer = self.spawn_clear(&handle, match_id.clone(), generation);
                state.timers.insert(match_id, timer)
            }
            Err(_) => {
                tracing::warn!(
                    match_id = %signal.match_id,
                    "no tokio runtime; badge expires on read"
                );
                state.timers.remove(&match_id)
            }
        };
        if let Some(previous) = previous {
            previous.abort();
        }
        tracing::debug!(
            match_id = %signal.match_id,
            label = %signal.label,
            "badge raised"
        );
        signal
    }

    pub fn active(&self, match_id: &MatchId) -> Option<BadgeSignal> {
        let mut state = self.state.lock().expect("badge board lock");
        self.drop_expired(&mut state);
        state.active.get(match_id).map(|badge| badge.signal.clone())
    }

    pub fn snapshot(&self) -> Vec<BadgeSignal> {
        let mut state = self.state.lock().expect("badge board lock");
        self.drop_expired(&mut state);
        let mut signals: Vec<BadgeSignal> = state
            .active
            .values()
            .map(|badge| badge.signal.clone())
            .collect();
        signals.sort_by(|a, b| a.match_id.cmp(&b.match_id));
        signals
    }

    fn drop_expired(&self, state: &mut BoardState) {
        let now = self.time.now();
        let expired: Vec<MatchId> = state
            .active
            .iter()
            .filter(|(_, badge)| badge.signal.expires_at <= now)
            .map(|(match_id, _)| match_id.clone())
            .collect();
        for match_id in expired {
            state.active.remove(&match_id);
            if let Some(timer) = state.timers.remove(&match_id) {
                timer.abort();
            }
        }
    }

    fn spawn_clear(
        &self,
        handle: &tokio::runtime::Handle,
        match_id: MatchId,
        generation: u64,
    ) -> JoinHandle<()> {
        let time = self.time.clone();
        let duration = self.duration;
        let state = Arc::clone(&self.state);
        handle.spawn(async move {
            time.sleep(duration).await;
            let mut state = state.lock().expect("badge board lock");
            let current = state
                .active
                .get(&match_id)
                .is_some_and(|badge| badge.generation == generation);
            if current {
                state.active.remove(&match_id);
                state.timers.remove(&match_id);
                tracing::debug!(match_id = %match_id, "badge cleared");
            }
        })
    }

    #[cfg(test)]
    pub(crate) fn take_timer(&self, match_id: &MatchId) -> Option<JoinHandle<()>> {
        let mut state = self.state.lock().expect("badge board lock");
        state.timers.remove(match_id)
    }
}
