//! Wire protocol for Plaza.
//!
//! This crate defines the "language" that clients and the server speak:
//!
//! - **Messages** ([`ClientMessage`], [`ServerMessage`]) — the tagged
//!   records that travel on the wire.
//! - **Model** ([`Player`], [`AvatarSnapshot`], [`ChatMessage`], ...) —
//!   the value types embedded in those messages. These are always copies;
//!   the world's own state never crosses this boundary by reference.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how messages are
//!   converted to and from text frames.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while encoding
//!   or decoding.
//!
//! The protocol layer sits between transport (raw frames) and the world
//! (authoritative state). It knows nothing about connections or tasks —
//! it only knows how to name and serialize things.

mod codec;
mod error;
mod model;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use model::{
    AvatarOptions, AvatarSnapshot, ChatMessage, Player, StatsReport,
    WorldBounds, WorldObject, WorldSnapshot,
};
pub use types::{ClientMessage, LeaveReason, ObjectId, PlayerId, ServerMessage};
