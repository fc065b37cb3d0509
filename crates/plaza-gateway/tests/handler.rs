//! Integration tests for the connection handler's lifecycle: the
//! teardown block must run on every exit path, including the one where
//! the world actor is already gone when the handler asks for its
//! seeding snapshot.

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use plaza_gateway::{handle_connection, GatewayState};
use plaza_transport::{Transport, WebSocketTransport};
use plaza_world::{spawn_world, WorldConfig, WorldHandle};
use tokio_tungstenite::tungstenite::Message;

/// A handle whose actor is already dead: the actor task is spawned on a
/// throwaway runtime that is dropped before the handle is returned, so
/// every command send fails with `WorldError::Unavailable`.
fn dead_world() -> WorldHandle {
    std::thread::spawn(|| {
        let rt = tokio::runtime::Runtime::new().expect("runtime");
        let (world, _events) = rt.block_on(async { spawn_world(WorldConfig::default()) });
        drop(rt);
        world
    })
    .join()
    .expect("world thread")
}

#[tokio::test]
async fn test_teardown_runs_when_world_is_unavailable() {
    let state = Arc::new(GatewayState::new(dead_world(), Duration::from_secs(30)));

    let mut transport = WebSocketTransport::bind("127.0.0.1:0").await.expect("bind");
    let addr = transport.local_addr().expect("addr").to_string();

    let client = tokio::spawn(async move {
        let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
            .await
            .expect("connect");

        // The greeting still arrives, then the server closes.
        let first = ws.next().await.expect("greeting").expect("frame");
        assert!(
            matches!(first, Message::Text(ref t) if t.contains("connection_established")),
            "expected greeting, got {first:?}"
        );
        loop {
            match ws.next().await {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => continue,
                Some(Err(_)) => break,
            }
        }
    });

    let conn = transport.accept().await.expect("accept");
    handle_connection(conn, Arc::clone(&state))
        .await
        .expect("handler should exit cleanly, not error out");

    // The session must not linger in the registry after the handler
    // returns, even though the seeding snapshot failed.
    assert_eq!(state.session_count().await, 0);

    tokio::time::timeout(Duration::from_secs(2), client)
        .await
        .expect("client should see the connection close")
        .expect("client task");
}

#[tokio::test]
async fn test_clean_disconnect_empties_registry() {
    let (world, _events) = spawn_world(WorldConfig::default());
    let state = Arc::new(GatewayState::new(world, Duration::from_secs(30)));

    let mut transport = WebSocketTransport::bind("127.0.0.1:0").await.expect("bind");
    let addr = transport.local_addr().expect("addr").to_string();

    let client = tokio::spawn(async move {
        let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
            .await
            .expect("connect");
        // Consume the greeting pair, then hang up politely.
        let _ = ws.next().await;
        let _ = ws.next().await;
        ws.close(None).await.expect("close");
    });

    let conn = transport.accept().await.expect("accept");
    let server = tokio::spawn(handle_connection(conn, Arc::clone(&state)));

    client.await.expect("client task");
    server
        .await
        .expect("join handler")
        .expect("handler should exit cleanly");

    assert_eq!(state.session_count().await, 0);
}
