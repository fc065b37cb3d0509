//! `PlazaServer` builder and accept loop.
//!
//! This is the entry point for running a Plaza world. It ties together
//! all the layers: transport → gateway → world, spawning the world
//! actor, the fan-out task, and the maintenance task, then accepting
//! connections forever.

use std::sync::Arc;

use plaza_gateway::{handle_connection, run_fanout, run_maintenance, GatewayState};
use plaza_transport::{Transport, WebSocketTransport};
use plaza_world::{spawn_world, WorldConfig};

use crate::PlazaError;

/// Builder for configuring and starting a Plaza server.
///
/// # Example
///
/// ```rust,no_run
/// use plaza::prelude::*;
///
/// # async fn demo() -> Result<(), PlazaError> {
/// let server = PlazaServer::builder()
///     .bind("0.0.0.0:8080")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct PlazaServerBuilder {
    bind_addr: String,
    world_config: WorldConfig,
}

impl PlazaServerBuilder {
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            world_config: WorldConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the world configuration.
    pub fn world_config(mut self, config: WorldConfig) -> Self {
        self.world_config = config;
        self
    }

    /// Builds the server: binds the transport and spawns the world
    /// actor, fan-out, and maintenance tasks.
    pub async fn build(self) -> Result<PlazaServer, PlazaError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let sweep_after = self.world_config.inactive_after;
        let (world, events) = spawn_world(self.world_config);
        let state = Arc::new(GatewayState::new(world, sweep_after));

        tokio::spawn(run_fanout(events, Arc::clone(&state)));
        tokio::spawn(run_maintenance(Arc::clone(&state)));

        Ok(PlazaServer { transport, state })
    }
}

impl Default for PlazaServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Plaza server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct PlazaServer {
    transport: WebSocketTransport,
    state: Arc<GatewayState>,
}

impl PlazaServer {
    /// Creates a new builder.
    pub fn builder() -> PlazaServerBuilder {
        PlazaServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the accept loop, spawning a handler task per connection.
    /// Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), PlazaError> {
        tracing::info!("Plaza server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
