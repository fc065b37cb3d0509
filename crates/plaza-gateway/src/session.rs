//! The session registry: who is connected, and how to reach them.
//!
//! # Concurrency note
//!
//! `SessionRegistry` is NOT thread-safe by itself — it's a plain
//! `HashMap` behind the gateway's mutex. Every operation here is a quick
//! map lookup plus a non-blocking queue push; the lock is never held
//! across network I/O. The actual socket writes happen in per-session
//! writer tasks that drain the queues.

use std::collections::HashMap;
use std::time::Instant;

use plaza_protocol::PlayerId;
use tokio::sync::mpsc;

/// One connected client, as the fan-out sees it: an id and a queue.
///
/// The queue carries pre-encoded text frames. It is unbounded on
/// purpose — enqueueing never blocks the fan-out, and a consumer that
/// stops draining is detected by its writer task hanging up, which
/// closes the channel and surfaces here as a failed send.
pub struct Session {
    outbound: mpsc::UnboundedSender<String>,
    connected_at: Instant,
    frames_sent: u64,
}

impl Session {
    /// How long this session has been registered.
    pub fn connected_for(&self) -> std::time::Duration {
        self.connected_at.elapsed()
    }

    /// Frames successfully enqueued to this session.
    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }
}

/// Registry of all live sessions, keyed by player id.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: HashMap<PlayerId, Session>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a session's outbound queue. A stale entry under the
    /// same id is replaced; its old queue closes when dropped.
    pub fn register(&mut self, id: PlayerId, outbound: mpsc::UnboundedSender<String>) {
        let replaced = self
            .sessions
            .insert(
                id,
                Session {
                    outbound,
                    connected_at: Instant::now(),
                    frames_sent: 0,
                },
            )
            .is_some();
        if replaced {
            tracing::warn!(player_id = %id, "replaced stale session entry");
        }
    }

    /// Removes a session. Safe to call twice — teardown races between
    /// the handler and the fan-out's dead-queue detection.
    pub fn remove(&mut self, id: PlayerId) -> Option<Session> {
        self.sessions.remove(&id)
    }

    /// Enqueues a frame to one session. Returns `false` if the session
    /// is unknown or its queue is closed.
    pub fn send_to(&mut self, id: PlayerId, frame: String) -> bool {
        match self.sessions.get_mut(&id) {
            Some(session) => {
                if session.outbound.send(frame).is_ok() {
                    session.frames_sent += 1;
                    true
                } else {
                    false
                }
            }
            None => false,
        }
    }

    /// Enqueues a frame to every session. Sessions whose queue is closed
    /// are removed immediately and returned so the caller can tell the
    /// world they left.
    pub fn broadcast(&mut self, frame: &str) -> Vec<PlayerId> {
        let mut dead = Vec::new();

        for (id, session) in &mut self.sessions {
            if session.outbound.send(frame.to_string()).is_ok() {
                session.frames_sent += 1;
            } else {
                dead.push(*id);
            }
        }

        for id in &dead {
            self.sessions.remove(id);
            tracing::debug!(player_id = %id, "dropped dead session during broadcast");
        }

        dead
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

// =========================================================================
// Tests
// =========================================================================
