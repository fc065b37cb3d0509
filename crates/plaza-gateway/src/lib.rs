//! The connection fan-out layer for Plaza.
//!
//! The gateway sits between the transport and the world actor. It owns
//! everything per-connection: the reader loop that decodes client frames
//! into world commands, the per-session outbound queue that absorbs slow
//! consumers, and the single fan-out task that turns world events into
//! broadcast frames.
//!
//! The load-bearing rule: a broadcast frame is encoded exactly once and
//! then cloned into per-session queues. Delivery to one session never
//! waits on another — a session that can't keep up gets torn down, not
//! waited for.

mod broadcast;
mod error;
mod handler;
mod maintenance;
mod session;

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use plaza_protocol::JsonCodec;
use plaza_world::WorldHandle;
use tokio::sync::Mutex;

pub use broadcast::{event_to_wire, run_fanout};
pub use error::GatewayError;
pub use handler::handle_connection;
pub use maintenance::run_maintenance;
pub use session::SessionRegistry;

/// Shared gateway state: the session registry plus the pieces every
/// connection task needs.
///
/// Wrapped in an `Arc` by the server; each accepted connection gets a
/// clone of that `Arc`.
pub struct GatewayState {
    /// All live sessions. Locked briefly for registry operations only,
    /// never across network I/O.
    pub(crate) registry: Mutex<SessionRegistry>,

    /// Handle to the world actor.
    pub(crate) world: WorldHandle,

    /// Shared codec; encoding happens once per broadcast, here.
    pub(crate) codec: JsonCodec,

    /// Players idle longer than this are swept by maintenance.
    pub(crate) sweep_after: Duration,

    /// Inbound messages decoded in the current rate window.
    inbound_window: AtomicU64,
}

impl GatewayState {
    pub fn new(world: WorldHandle, sweep_after: Duration) -> Self {
        Self {
            registry: Mutex::new(SessionRegistry::new()),
            world,
            codec: JsonCodec,
            sweep_after,
            inbound_window: AtomicU64::new(0),
        }
    }

    /// Number of registered sessions.
    pub async fn session_count(&self) -> usize {
        self.registry.lock().await.len()
    }

    /// Counts one decoded inbound message toward the current window.
    pub(crate) fn record_inbound(&self) {
        self.inbound_window.fetch_add(1, Ordering::Relaxed);
    }

    /// Closes the current rate window and returns its count.
    pub(crate) fn finish_rate_window(&self) -> u64 {
        self.inbound_window.swap(0, Ordering::Relaxed)
    }
}
