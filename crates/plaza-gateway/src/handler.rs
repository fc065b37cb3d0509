//! Per-connection handler: greet, register, decode, forward, tear down.
//!
//! Each accepted connection gets its own Tokio task running this handler,
//! plus a writer task that drains the session's outbound queue into the
//! socket. The split matters: a client that stops reading stalls only its
//! writer task, never the reader loop or any other session.

use std::sync::Arc;
use std::time::Instant;

use plaza_protocol::{ClientMessage, Codec, PlayerId, ServerMessage};
use plaza_transport::{ConnectionSink, ConnectionSource, WebSocketConnection};
use plaza_world::{avatar, now_millis};
use tokio::sync::mpsc;

use crate::{GatewayError, GatewayState};

/// Handles a single connection from accept to close.
///
/// The player id is the connection id: one connection, one player, no
/// handshake needed. Until the client sends `join_world` it has an id
/// and a world snapshot but no presence in the world — the world treats
/// commands for unknown players as no-ops, so nothing here has to gate
/// on join state.
///
/// Once the session is registered, every path out of this function runs
/// the teardown block at the bottom exactly once.
pub async fn handle_connection(
    conn: WebSocketConnection,
    state: Arc<GatewayState>,
) -> Result<(), GatewayError> {
    let player_id = PlayerId(conn.id().into_inner());
    let (sink, mut source) = conn.into_split();
    let started = Instant::now();

    tracing::debug!(%player_id, "handling new connection");

    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
    tokio::spawn(run_writer(sink, outbound_rx, player_id));

    // Queue the greeting before the session becomes visible to the
    // fan-out, so connection_established is always the first frame.
    let greeting = state.codec.encode(&ServerMessage::ConnectionEstablished {
        player_id,
        server_time: now_millis(),
    })?;
    let _ = outbound_tx.send(greeting);

    state
        .registry
        .lock()
        .await
        .register(player_id, outbound_tx.clone());

    // Seed the client's view. Sent to this session only, never broadcast.
    // A snapshot failure means the world actor is gone; skip the reader
    // loop but still fall through to the teardown below.
    match state.world.snapshot().await {
        Ok(snapshot) => {
            match state.codec.encode(&ServerMessage::WorldState { state: snapshot }) {
                Ok(frame) => {
                    let _ = outbound_tx.send(frame);
                }
                Err(e) => tracing::error!(%player_id, error = %e, "failed to encode world state"),
            }
            read_loop(&state, player_id, &outbound_tx, &mut source).await;
        }
        Err(e) => tracing::warn!(%player_id, error = %e, "world unavailable, closing connection"),
    }

    // --- Teardown (single exit for every path above) ---
    if let Some(session) = state.registry.lock().await.remove(player_id) {
        tracing::info!(
            %player_id,
            connected_secs = session.connected_for().as_secs(),
            frames_sent = session.frames_sent(),
            "connection closed"
        );
    } else {
        // The fan-out already dropped the session after its queue died.
        tracing::info!(
            %player_id,
            connected_secs = started.elapsed().as_secs(),
            "connection closed"
        );
    }
    let _ = state.world.leave(player_id);
    Ok(())
}

/// Reads frames until the client goes away or the world does.
async fn read_loop(
    state: &Arc<GatewayState>,
    player_id: PlayerId,
    outbound: &mpsc::UnboundedSender<String>,
    source: &mut ConnectionSource,
) {
    loop {
        let text = match source.next_text().await {
            Ok(Some(text)) => text,
            Ok(None) => {
                tracing::debug!(%player_id, "connection closed cleanly");
                return;
            }
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "receive error");
                return;
            }
        };

        let message: ClientMessage = match state.codec.decode(&text) {
            Ok(message) => message,
            Err(e) => {
                // Malformed input is the client's problem, not ours:
                // log, drop, keep the connection.
                tracing::debug!(%player_id, error = %e, "dropping undecodable frame");
                continue;
            }
        };
        state.record_inbound();

        if !dispatch(state, player_id, outbound, message) {
            return;
        }
    }
}

/// Routes one decoded message. Returns `false` when the handler should
/// stop because the world or the outbound queue is gone.
fn dispatch(
    state: &Arc<GatewayState>,
    player_id: PlayerId,
    outbound: &mpsc::UnboundedSender<String>,
    message: ClientMessage,
) -> bool {
    let result = match message {
        ClientMessage::JoinWorld {
            name,
            avatar_type,
            avatar_accessories,
        } => state
            .world
            .join(player_id, name, avatar_type, avatar_accessories),

        ClientMessage::Move { x, y } => state.world.move_player(player_id, x, y),

        ClientMessage::Chat { text } => state.world.chat(player_id, text),

        ClientMessage::ChangeAvatar {
            avatar_type,
            accessories,
        } => state.world.update_avatar(player_id, avatar_type, accessories),

        ClientMessage::SpawnObject { object_type } => state.world.spawn_object(object_type),

        // Answered here; the world never sees these.
        ClientMessage::Ping { timestamp } => {
            return reply(state, outbound, ServerMessage::Pong {
                timestamp,
                server_time: now_millis(),
            });
        }
        ClientMessage::GetAvatarOptions => {
            return reply(state, outbound, ServerMessage::AvatarOptions {
                options: avatar::options(),
            });
        }
    };

    if result.is_err() {
        tracing::warn!(%player_id, "world unavailable, closing connection");
        return false;
    }
    true
}

/// Encodes and enqueues a direct reply. Returns `false` if the writer
/// task has hung up.
fn reply(
    state: &Arc<GatewayState>,
    outbound: &mpsc::UnboundedSender<String>,
    message: ServerMessage,
) -> bool {
    match state.codec.encode(&message) {
        Ok(frame) => outbound.send(frame).is_ok(),
        Err(e) => {
            tracing::error!(error = %e, "failed to encode reply");
            true
        }
    }
}

/// Drains one session's outbound queue into its socket.
///
/// Exits when the queue closes (handler teardown) or a send fails
/// (client gone); either way the close frame is best-effort.
async fn run_writer(
    mut sink: ConnectionSink,
    mut outbound: mpsc::UnboundedReceiver<String>,
    player_id: PlayerId,
) {
    while let Some(frame) = outbound.recv().await {
        if let Err(e) = sink.send_text(&frame).await {
            tracing::debug!(%player_id, error = %e, "writer send failed");
            break;
        }
    }
    let _ = sink.close().await;
    tracing::debug!(%player_id, "writer task stopped");
}
