//! Integration tests for the full server: real WebSocket clients against
//! a server on an ephemeral port.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use plaza::prelude::*;
use serde_json::{json, Value};
use tokio_tungstenite::tungstenite::Message;

// =========================================================================
// Helpers
// =========================================================================

type ClientWs = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// Starts a server on a random port and returns the address.
async fn start_server() -> String {
    let server = PlazaServer::builder()
        .bind("127.0.0.1:0")
        .build()
        .await
        .expect("server should build");

    let addr = server
        .local_addr()
        .expect("should have local addr")
        .to_string();

    tokio::spawn(async move {
        let _ = server.run().await;
    });

    // Give the accept loop a moment to start.
    tokio::time::sleep(Duration::from_millis(10)).await;
    addr
}

async fn connect(addr: &str) -> ClientWs {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .expect("should connect");
    ws
}

async fn send_json(ws: &mut ClientWs, value: Value) {
    ws.send(Message::Text(value.to_string().into()))
        .await
        .expect("send");
}

/// Receives the next text frame as JSON.
async fn recv_json(ws: &mut ClientWs) -> Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(2), ws.next())
            .await
            .expect("timed out waiting for frame")
            .expect("stream ended")
            .expect("receive error");
        if let Message::Text(text) = msg {
            return serde_json::from_str(&text).expect("frame should be JSON");
        }
        // skip ping/pong control frames
    }
}

/// Receives frames until one carries the wanted `type` tag, skipping
/// interleaved broadcasts (stats ticks, other players' events).
async fn recv_until(ws: &mut ClientWs, wanted: &str) -> Value {
    for _ in 0..50 {
        let frame = recv_json(ws).await;
        if frame["type"] == wanted {
            return frame;
        }
    }
    panic!("never received a {wanted} frame");
}

/// Connects and consumes the greeting pair, returning the assigned id.
async fn connect_and_greet(addr: &str) -> (ClientWs, u64) {
    let mut ws = connect(addr).await;
    let established = recv_json(&mut ws).await;
    assert_eq!(established["type"], "connection_established");
    let player_id = established["player_id"].as_u64().expect("numeric id");
    let state = recv_json(&mut ws).await;
    assert_eq!(state["type"], "world_state");
    (ws, player_id)
}

fn join_world(name: &str) -> Value {
    json!({ "type": "join_world", "name": name, "avatar_type": "explorer" })
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_connect_receives_established_then_world_state() {
    let addr = start_server().await;
    let mut ws = connect(&addr).await;

    let first = recv_json(&mut ws).await;
    assert_eq!(first["type"], "connection_established");
    assert!(first["player_id"].is_u64());
    assert!(first["server_time"].is_u64());

    let second = recv_json(&mut ws).await;
    assert_eq!(second["type"], "world_state");
    assert_eq!(second["state"]["bounds"]["width"], 2000.0);
    assert_eq!(second["state"]["bounds"]["height"], 1500.0);
    assert_eq!(second["state"]["players"], json!([]));
}

#[tokio::test]
async fn test_join_world_broadcast_reaches_everyone() {
    let addr = start_server().await;
    let (mut watcher, _) = connect_and_greet(&addr).await;
    let (mut joiner, joiner_id) = connect_and_greet(&addr).await;

    send_json(&mut joiner, join_world("Ada")).await;

    // Both the joiner and the watcher see the broadcast.
    for ws in [&mut joiner, &mut watcher] {
        let joined = recv_until(ws, "player_joined").await;
        assert_eq!(joined["player"]["id"].as_u64(), Some(joiner_id));
        assert_eq!(joined["player"]["display_name"], "Ada");
        assert_eq!(joined["total_players"], 1);
    }
}

#[tokio::test]
async fn test_move_is_clamped_to_world_bounds() {
    let addr = start_server().await;
    let (mut ws, id) = connect_and_greet(&addr).await;

    send_json(&mut ws, join_world("Ada")).await;
    recv_until(&mut ws, "player_joined").await;

    send_json(&mut ws, json!({ "type": "move", "x": -50.0, "y": 4000.0 })).await;

    let moved = recv_until(&mut ws, "player_moved").await;
    assert_eq!(moved["player_id"].as_u64(), Some(id));
    assert_eq!(moved["x"], 0.0);
    assert_eq!(moved["y"], 1500.0);
}

#[tokio::test]
async fn test_chat_broadcast_carries_author() {
    let addr = start_server().await;
    let (mut speaker, _) = connect_and_greet(&addr).await;
    let (mut listener, _) = connect_and_greet(&addr).await;

    send_json(&mut speaker, join_world("Ada")).await;
    recv_until(&mut speaker, "player_joined").await;

    send_json(&mut speaker, json!({ "type": "chat", "text": "hello plaza" })).await;

    let heard = recv_until(&mut listener, "chat_message").await;
    assert_eq!(heard["message"]["text"], "hello plaza");
    assert_eq!(heard["message"]["author_name"], "Ada");
}

#[tokio::test]
async fn test_ping_answered_with_pong() {
    let addr = start_server().await;
    let (mut ws, _) = connect_and_greet(&addr).await;

    send_json(&mut ws, json!({ "type": "ping", "timestamp": 123456 })).await;

    let pong = recv_until(&mut ws, "pong").await;
    assert_eq!(pong["timestamp"], 123456);
    assert!(pong["server_time"].is_u64());
}

#[tokio::test]
async fn test_get_avatar_options_lists_catalog() {
    let addr = start_server().await;
    let (mut ws, _) = connect_and_greet(&addr).await;

    send_json(&mut ws, json!({ "type": "get_avatar_options" })).await;

    let options = recv_until(&mut ws, "avatar_options").await;
    let archetypes = options["options"]["archetypes"]
        .as_array()
        .expect("archetype list");
    assert!(archetypes.contains(&json!("explorer")));
    assert!(options["options"]["accessories"]["hat"].is_array());
}

#[tokio::test]
async fn test_malformed_frame_ignored_connection_survives() {
    let addr = start_server().await;
    let (mut ws, _) = connect_and_greet(&addr).await;

    // Garbage, valid JSON with an unknown tag, and a move missing a
    // field: all dropped without killing the connection.
    ws.send(Message::Text("{{nope".into())).await.expect("send");
    send_json(&mut ws, json!({ "type": "fly_to_the_moon" })).await;
    send_json(&mut ws, json!({ "type": "move", "x": 10.0 })).await;

    send_json(&mut ws, json!({ "type": "ping", "timestamp": 7 })).await;
    let pong = recv_until(&mut ws, "pong").await;
    assert_eq!(pong["timestamp"], 7);
}

#[tokio::test]
async fn test_disconnect_broadcasts_player_left() {
    let addr = start_server().await;
    let (mut watcher, _) = connect_and_greet(&addr).await;
    let (mut leaver, leaver_id) = connect_and_greet(&addr).await;

    send_json(&mut leaver, join_world("Ada")).await;
    recv_until(&mut watcher, "player_joined").await;

    leaver.close(None).await.expect("close");

    let left = recv_until(&mut watcher, "player_left").await;
    assert_eq!(left["player_id"].as_u64(), Some(leaver_id));
    assert_eq!(left["player_name"], "Ada");
    assert_eq!(left["total_players"], 0);
    assert_eq!(left["reason"], "disconnected");
}

#[tokio::test]
async fn test_spawn_object_broadcast() {
    let addr = start_server().await;
    let (mut ws, _) = connect_and_greet(&addr).await;

    send_json(&mut ws, json!({ "type": "spawn_object", "object_type": "tree" })).await;

    let spawned = recv_until(&mut ws, "world_object_spawned").await;
    assert_eq!(spawned["object"]["kind"], "tree");
    assert_eq!(spawned["object"]["emoji"], "🌳");
}

#[tokio::test]
async fn test_late_joiner_sees_existing_players_in_snapshot() {
    let addr = start_server().await;
    let (mut early, early_id) = connect_and_greet(&addr).await;

    send_json(&mut early, join_world("Ada")).await;
    recv_until(&mut early, "player_joined").await;

    // The second client's world_state snapshot includes Ada.
    let mut late = connect(&addr).await;
    let established = recv_json(&mut late).await;
    assert_eq!(established["type"], "connection_established");
    let state = recv_json(&mut late).await;
    assert_eq!(state["type"], "world_state");

    let players = state["state"]["players"].as_array().expect("player list");
    assert_eq!(players.len(), 1);
    assert_eq!(players[0]["id"].as_u64(), Some(early_id));
    assert_eq!(players[0]["display_name"], "Ada");
}

#[tokio::test]
async fn test_change_avatar_broadcasts_new_snapshot() {
    let addr = start_server().await;
    let (mut ws, id) = connect_and_greet(&addr).await;

    send_json(&mut ws, join_world("Ada")).await;
    recv_until(&mut ws, "player_joined").await;

    send_json(
        &mut ws,
        json!({
            "type": "change_avatar",
            "avatar_type": "robot",
            "accessories": { "hat": "crown" }
        }),
    )
    .await;

    let updated = recv_until(&mut ws, "avatar_updated").await;
    assert_eq!(updated["player_id"].as_u64(), Some(id));
    assert_eq!(updated["avatar"]["archetype"], "robot");
    assert_eq!(updated["avatar"]["accessories"]["hat"], "crown");
}

#[tokio::test]
async fn test_dead_consumer_does_not_stall_broadcasts() {
    let addr = start_server().await;

    // One client connects and immediately goes away without a close
    // handshake; its frames pile up and its writer eventually fails.
    let ghost = connect(&addr).await;
    drop(ghost);

    let (mut live, _) = connect_and_greet(&addr).await;
    send_json(&mut live, join_world("Ada")).await;

    // The live client still receives its broadcasts promptly.
    let joined = recv_until(&mut live, "player_joined").await;
    assert_eq!(joined["player"]["display_name"], "Ada");
}
