use thiserror::Error;

/// Errors surfaced by [`WorldHandle`](crate::WorldHandle) operations.
#[derive(Debug, Error)]
pub enum WorldError {
    /// The actor task is gone; its command channel is closed.
    #[error("world is unavailable")]
    Unavailable,
}
