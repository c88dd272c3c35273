//! Correlation registry: sent message id to in-progress session.

use crate::session::{GameSession, MessageId, Seating};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, warn};

/// A correlated token. `session` is `None` while a handler has it claimed.
#[derive(Debug)]
struct Slot<S> {
    seating: Seating,
    session: Option<GameSession<S>>,
}

/// Shared map from correlation token to session.
///
/// Cloning yields another handle to the same map. The lock is never held
/// across an `.await`; every operation completes under a single acquisition.
///
/// A handler that wants to advance a session [`claim`](Self::claim)s it.
/// The token stays correlated and its [`Seating`] stays readable, but until
/// the handler puts the session back with [`insert`](Self::insert) or moves
/// it with [`replace`](Self::replace), further claims on that token return
/// `None`, so one session can never be advanced twice.
#[derive(Debug)]
pub struct CorrelationRegistry<S> {
    slots: Arc<Mutex<HashMap<MessageId, Slot<S>>>>,
}

impl<S> CorrelationRegistry<S> {
    /// Creates an empty registry.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating correlation registry");
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<MessageId, Slot<S>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers `session` under its current token, releasing any claim on it.
    ///
    /// Returns a different session previously stored under that token, which
    /// only happens if a channel reuses message ids.
    #[instrument(skip(self, session), fields(token = %session.token()))]
    pub fn insert(&self, session: GameSession<S>) -> Option<GameSession<S>> {
        let token = session.token().clone();
        let slot = Slot {
            seating: session.seating().clone(),
            session: Some(session),
        };
        let displaced = self.lock().insert(token, slot).and_then(|old| old.session);
        if displaced.is_some() {
            warn!("Token was already correlated, previous session displaced");
        } else {
            debug!("Session correlated");
        }
        displaced
    }

    /// Atomically drops `previous` and registers `session` under its token.
    #[instrument(skip(self, session), fields(token = %session.token()))]
    pub fn replace(&self, previous: &str, session: GameSession<S>) {
        let token = session.token().clone();
        let slot = Slot {
            seating: session.seating().clone(),
            session: Some(session),
        };
        let mut slots = self.lock();
        slots.remove(previous);
        if slots.insert(token, slot).is_some() {
            warn!("Token was already correlated, previous session displaced");
        }
        debug!("Session re-keyed");
    }

    /// Takes the session correlated to `token` for exclusive handling.
    ///
    /// Returns `None` if the token is unknown or already claimed.
    #[instrument(skip(self))]
    pub fn claim(&self, token: &str) -> Option<GameSession<S>> {
        let session = self.lock().get_mut(token).and_then(|slot| slot.session.take());
        if session.is_none() {
            debug!("No unclaimed session correlated to token");
        }
        session
    }

    /// Seating of the session correlated to `token`, claimed or not.
    pub fn seating(&self, token: &str) -> Option<Seating> {
        self.lock().get(token).map(|slot| slot.seating.clone())
    }

    /// Drops the token, claimed or not. Returns whether it was correlated.
    #[instrument(skip(self))]
    pub fn remove(&self, token: &str) -> bool {
        self.lock().remove(token).is_some()
    }

    /// Whether `token` is correlated to a session.
    pub fn contains(&self, token: &str) -> bool {
        self.lock().contains_key(token)
    }

    /// Whether `token` is correlated and currently claimed.
    pub fn is_claimed(&self, token: &str) -> bool {
        self.lock()
            .get(token)
            .is_some_and(|slot| slot.session.is_none())
    }

    /// Runs `f` against the unclaimed session correlated to `token`.
    pub fn lookup<R>(&self, token: &str, f: impl FnOnce(&GameSession<S>) -> R) -> Option<R> {
        self.lock().get(token).and_then(|slot| slot.session.as_ref()).map(f)
    }

    /// Lists correlated tokens.
    pub fn tokens(&self) -> Vec<MessageId> {
        self.lock().keys().cloned().collect()
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no session is live.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Evicts unclaimed sessions with no accepted move or board update for
    /// longer than `max_idle`. Returns the evicted tokens.
    #[instrument(skip(self))]
    pub fn evict_idle(&self, max_idle: Duration, now: DateTime<Utc>) -> Vec<MessageId> {
        let mut slots = self.lock();
        let expired: Vec<MessageId> = slots
            .iter()
            .filter(|(_, slot)| {
                slot.session
                    .as_ref()
                    .is_some_and(|session| now - *session.last_active() > max_idle)
            })
            .map(|(token, _)| token.clone())
            .collect();

        for token in &expired {
            slots.remove(token);
        }

        if !expired.is_empty() {
            info!(count = expired.len(), "Evicted idle sessions");
        }
        expired
    }
}

impl<S> Clone for CorrelationRegistry<S> {
    fn clone(&self) -> Self {
        Self {
            slots: Arc::clone(&self.slots),
        }
    }
}

impl<S> Default for CorrelationRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}
