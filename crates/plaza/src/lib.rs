//! # Plaza
//!
//! A shared-world server: one authoritative world, many WebSocket
//! clients. Everyone who connects walks the same 2D space — moving,
//! chatting, dressing up an avatar — and every client sees the same
//! sequence of events, because a single actor task owns all world state
//! and a single fan-out task turns its event stream into broadcasts.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use plaza::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), PlazaError> {
//!     let server = PlazaServer::builder()
//!         .bind("0.0.0.0:8080")
//!         .build()
//!         .await?;
//!     server.run().await
//! }
//! ```

mod error;
mod server;

pub use error::PlazaError;
pub use server::{PlazaServer, PlazaServerBuilder};

/// The types most servers need in one import.
pub mod prelude {
    pub use crate::{PlazaError, PlazaServer, PlazaServerBuilder};
    pub use plaza_protocol::{ClientMessage, PlayerId, ServerMessage};
    pub use plaza_world::WorldConfig;
}
