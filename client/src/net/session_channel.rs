//! Ordered session-change broadcast.
//!
//! DESIGN
//! ======
//! The identity gateway owns one channel and publishes every session
//! transition through it. Deliveries go through a FIFO queue drained by
//! whichever caller started draining first, so:
//!
//! - listeners observe changes in publish order, none skipped or merged;
//! - at most one listener callback runs at a time, even when a callback
//!   publishes or subscribes re-entrantly;
//! - a new subscriber receives the current session before any later change,
//!   and changes queued ahead of its subscription reach it only through that
//!   first delivery.
//!
//! The lock is never held while a listener runs.

#[cfg(test)]
#[path = "session_channel_test.rs"]
mod session_channel_test;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::types::Session;

type Listener = Arc<dyn Fn(Option<&Session>) + Send + Sync>;

enum Delivery {
    /// A new session state for every listener.
    Broadcast(Option<Session>),
    /// Replay the current state to one freshly subscribed listener.
    Replay(u64),
}

#[derive(Default)]
struct Inner {
    current: Option<Session>,
    listeners: Vec<(u64, Listener)>,
    /// Listeners whose replay is still queued; broadcasts skip them.
    awaiting_replay: Vec<u64>,
    next_id: u64,
    pending: VecDeque<Delivery>,
    draining: bool,
}

/// Cloneable handle to a shared session broadcast.
#[derive(Clone, Default)]
pub struct SessionChannel {
    inner: Arc<Mutex<Inner>>,
}

impl SessionChannel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Last session delivered to listeners.
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.lock().current.clone()
    }

    /// Queue a session transition and deliver it unless a delivery is already
    /// running further up the stack, in which case that drain picks it up.
    pub fn publish(&self, session: Option<Session>) {
        self.lock().pending.push_back(Delivery::Broadcast(session));
        self.drain();
    }

    /// Register `on_change`; it is called with the current session first and
    /// then with every subsequent change.
    pub fn subscribe<F>(&self, on_change: F) -> Subscription
    where
        F: Fn(Option<&Session>) + Send + Sync + 'static,
    {
        let id = {
            let mut inner = self.lock();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.listeners.push((id, Arc::new(on_change)));
            inner.awaiting_replay.push(id);
            inner.pending.push_back(Delivery::Replay(id));
            id
        };
        self.drain();
        Subscription { channel: self.clone(), id }
    }

    /// Number of attached listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    fn drain(&self) {
        {
            let mut inner = self.lock();
            if inner.draining {
                return;
            }
            inner.draining = true;
        }
        loop {
            let (session, targets) = {
                let mut inner = self.lock();
                let Some(delivery) = inner.pending.pop_front() else {
                    inner.draining = false;
                    return;
                };
                match delivery {
                    Delivery::Broadcast(session) => {
                        inner.current.clone_from(&session);
                        let targets: Vec<Listener> = inner
                            .listeners
                            .iter()
                            .filter(|(lid, _)| !inner.awaiting_replay.contains(lid))
                            .map(|(_, l)| Arc::clone(l))
                            .collect();
                        (session, targets)
                    }
                    Delivery::Replay(id) => {
                        inner.awaiting_replay.retain(|lid| *lid != id);
                        let targets: Vec<Listener> = inner
                            .listeners
                            .iter()
                            .filter(|(lid, _)| *lid == id)
                            .map(|(_, l)| Arc::clone(l))
                            .collect();
                        (inner.current.clone(), targets)
                    }
                }
            };
            for listener in targets {
                listener(session.as_ref());
            }
        }
    }

    fn remove(&self, id: u64) {
        let mut inner = self.lock();
        inner.listeners.retain(|(lid, _)| *lid != id);
        inner.awaiting_replay.retain(|lid| *lid != id);
    }
}

/// Handle returned by [`SessionChannel::subscribe`].
#[must_use = "dropping the handle keeps the listener attached; call `unsubscribe` to detach"]
pub struct Subscription {
    channel: SessionChannel,
    id: u64,
}

impl Subscription {
    /// Detach the listener. Changes published afterwards are not delivered.
    pub fn unsubscribe(self) {
        self.channel.remove(self.id);
    }
}
