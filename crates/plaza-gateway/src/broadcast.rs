//! The fan-out task: world events in, broadcast frames out.
//!
//! Exactly one of these runs per server. It drains the world actor's
//! event stream in order, maps each event to its wire message, encodes
//! it ONCE, and clones the resulting frame into every session queue.
//! Because there is a single consumer and the queues preserve order,
//! every client observes broadcasts in the same sequence the world
//! emitted them.

use std::sync::Arc;

use plaza_protocol::{Codec, ServerMessage};
use plaza_world::Event;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::GatewayState;

/// Maps a world event to the message every client should see.
///
/// Total by construction — both enums are closed, so a new event
/// variant fails to compile until it gets a wire mapping here.
pub fn event_to_wire(event: Event) -> ServerMessage {
    match event {
        Event::PlayerJoined {
            player,
            total_players,
        } => ServerMessage::PlayerJoined {
            player,
            total_players,
        },
        Event::PlayerLeft {
            player_id,
            player_name,
            total_players,
            reason,
        } => ServerMessage::PlayerLeft {
            player_id,
            player_name: Some(player_name),
            total_players: Some(total_players),
            reason: Some(reason),
        },
        Event::PlayerMoved {
            player_id,
            x,
            y,
            avatar_display,
        } => ServerMessage::PlayerMoved {
            player_id,
            x,
            y,
            avatar_display,
        },
        Event::AvatarUpdated { player_id, avatar } => {
            ServerMessage::AvatarUpdated { player_id, avatar }
        }
        Event::ChatPosted { message } => ServerMessage::ChatMessage { message },
        Event::ObjectSpawned { object } => ServerMessage::WorldObjectSpawned { object },
    }
}

/// Runs until the world actor drops its event sender.
pub async fn run_fanout(mut events: UnboundedReceiver<Event>, state: Arc<GatewayState>) {
    tracing::debug!("fan-out task started");

    while let Some(event) = events.recv().await {
        let message = event_to_wire(event);

        let frame = match state.codec.encode(&message) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!(error = %e, "failed to encode broadcast frame");
                continue;
            }
        };

        let dead = state.registry.lock().await.broadcast(&frame);

        // A dead queue means the writer task is gone; the player is no
        // longer reachable, so they leave the world too.
        for id in dead {
            tracing::info!(player_id = %id, "session unreachable, removing from world");
            let _ = state.world.leave(id);
        }
    }

    tracing::debug!("fan-out task stopped");
}

// =========================================================================
// Tests
// =========================================================================
