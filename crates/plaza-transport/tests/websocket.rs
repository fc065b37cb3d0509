//! Integration tests for the WebSocket transport.
//!
//! These spin up a real listener and a real tungstenite client to verify
//! frames actually flow, and that the split halves work independently.

#[cfg(feature = "websocket")]
mod websocket {
    use futures_util::{SinkExt, StreamExt};
    use plaza_transport::{Transport, WebSocketTransport};
    use tokio_tungstenite::tungstenite::Message;

    type ClientWs = tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >;

    async fn connect_client(addr: &str) -> ClientWs {
        let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
            .await
            .expect("client should connect");
        ws
    }

    /// Binds on port 0 and returns (transport, actual address).
    async fn bind_ephemeral() -> (WebSocketTransport, String) {
        let transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport.local_addr().expect("addr").to_string();
        (transport, addr)
    }

    #[tokio::test]
    async fn test_accept_and_exchange_text_frames() {
        let (mut transport, addr) = bind_ephemeral().await;

        let server = tokio::spawn(async move {
            transport.accept().await.expect("should accept")
        });
        let mut client = connect_client(&addr).await;
        let conn = server.await.expect("accept task");

        assert!(conn.id().into_inner() > 0);
        let (mut sink, mut source) = conn.into_split();

        // Server → client.
        sink.send_text("hello from server").await.expect("send");
        let msg = client.next().await.unwrap().unwrap();
        assert_eq!(msg.into_text().unwrap().as_str(), "hello from server");

        // Client → server.
        client
            .send(Message::Text("hello from client".into()))
            .await
            .expect("client send");
        let received = source.next_text().await.expect("recv");
        assert_eq!(received.as_deref(), Some("hello from client"));
    }

    #[tokio::test]
    async fn test_clean_close_yields_none() {
        let (mut transport, addr) = bind_ephemeral().await;

        let server = tokio::spawn(async move {
            transport.accept().await.expect("should accept")
        });
        let mut client = connect_client(&addr).await;
        let conn = server.await.expect("accept task");
        let (_sink, mut source) = conn.into_split();

        client.close(None).await.expect("close");

        let received = source.next_text().await.expect("recv");
        assert!(received.is_none(), "clean close should read as None");
    }

    #[tokio::test]
    async fn test_binary_utf8_frame_is_accepted_as_text() {
        let (mut transport, addr) = bind_ephemeral().await;

        let server = tokio::spawn(async move {
            transport.accept().await.expect("should accept")
        });
        let mut client = connect_client(&addr).await;
        let conn = server.await.expect("accept task");
        let (_sink, mut source) = conn.into_split();

        client
            .send(Message::Binary(b"{\"type\":\"ping\"}".to_vec().into()))
            .await
            .expect("client send");

        let received = source.next_text().await.expect("recv");
        assert_eq!(received.as_deref(), Some("{\"type\":\"ping\"}"));
    }

    #[tokio::test]
    async fn test_connection_ids_are_unique() {
        let (mut transport, addr) = bind_ephemeral().await;

        let server = tokio::spawn(async move {
            let a = transport.accept().await.expect("accept a");
            let b = transport.accept().await.expect("accept b");
            (a, b)
        });
        let _c1 = connect_client(&addr).await;
        let _c2 = connect_client(&addr).await;
        let (a, b) = server.await.expect("accept task");

        assert_ne!(a.id(), b.id());
    }
}
