use thiserror::Error;

/// Top-level error type, aggregating every layer.
#[derive(Debug, Error)]
pub enum PlazaError {
    #[error(transparent)]
    Transport(#[from] plaza_transport::TransportError),

    #[error(transparent)]
    Gateway(#[from] plaza_gateway::GatewayError),

    #[error(transparent)]
    World(#[from] plaza_world::WorldError),
}
