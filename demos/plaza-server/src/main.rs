//! Runs a Plaza world on 0.0.0.0:8080 (override with `PLAZA_ADDR`).
//!
//! Log verbosity follows `RUST_LOG`, e.g. `RUST_LOG=plaza=debug`.

use plaza::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr = std::env::var("PLAZA_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let server = PlazaServer::builder().bind(&addr).build().await?;
    tracing::info!(addr = %server.local_addr()?, "plaza world open");

    server.run().await?;
    Ok(())
}
