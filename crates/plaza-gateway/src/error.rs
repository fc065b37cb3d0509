use thiserror::Error;

/// Errors from the gateway layer.
///
/// These are per-connection: a `GatewayError` ends one session's handler,
/// never the server.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("transport error: {0}")]
    Transport(#[from] plaza_transport::TransportError),

    #[error("protocol error: {0}")]
    Protocol(#[from] plaza_protocol::ProtocolError),

    #[error("world error: {0}")]
    World(#[from] plaza_world::WorldError),
}
