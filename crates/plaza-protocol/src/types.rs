//! Identifier newtypes and the two wire-message vocabularies.
//!
//! Every message on the wire is a JSON object with a `"type"` discriminator
//! field (snake_case), produced by `#[serde(tag = "type")]` on the two
//! enums below. Because the enums are closed, dispatch on the receiving
//! side is exhaustiveness-checked — an unrecognized tag is a decode error,
//! which the gateway logs and drops.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{AvatarOptions, AvatarSnapshot, ChatMessage, StatsReport, WorldObject, WorldSnapshot};
use crate::Player;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a player.
///
/// Newtype over `u64` so a player id can't be confused with an object id
/// even though both are plain numbers underneath. `#[serde(transparent)]`
/// makes `PlayerId(42)` serialize as `42`, not `{"0":42}` — the client
/// sees an opaque number.
///
/// A player's id equals the id of the connection that controls it: one
/// connection, one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A unique identifier for a world object (decoration spawned into the
/// shared world). Same newtype pattern as [`PlayerId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obj-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// LeaveReason
// ---------------------------------------------------------------------------

/// Why a player left the world.
///
/// `Disconnected` covers explicit closes and transport errors;
/// `Inactive` means the inactivity sweep removed them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveReason {
    Disconnected,
    Inactive,
}

impl fmt::Display for LeaveReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "disconnected"),
            Self::Inactive => write!(f, "inactive"),
        }
    }
}

// ---------------------------------------------------------------------------
// ClientMessage — client → server
// ---------------------------------------------------------------------------

/// Messages a client can send.
///
/// `#[serde(tag = "type", rename_all = "snake_case")]` produces the
/// internally tagged format the wire uses:
///   `{ "type": "move", "x": 120.0, "y": 85.5 }`
///
/// Field presence doubles as validation: a `move` missing `x` or `y`
/// simply fails to decode, so the gateway drops it without ever bothering
/// the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Enter the world, optionally with a chosen name and avatar.
    JoinWorld {
        name: Option<String>,
        avatar_type: Option<String>,
        avatar_accessories: Option<BTreeMap<String, String>>,
    },

    /// Request to move to a position. Both coordinates are required.
    Move { x: f64, y: f64 },

    /// Post a chat message. Empty-after-trim text is ignored server-side.
    Chat { text: String },

    /// Swap avatar archetype and/or accessories.
    ChangeAvatar {
        avatar_type: Option<String>,
        accessories: Option<BTreeMap<String, String>>,
    },

    /// Latency probe. Answered locally by the gateway with [`ServerMessage::Pong`]
    /// — it never round-trips through the world.
    Ping { timestamp: u64 },

    /// Ask which avatar archetypes and accessories exist.
    GetAvatarOptions,

    /// Drop a decorative object somewhere in the world.
    SpawnObject { object_type: Option<String> },
}

// ---------------------------------------------------------------------------
// ServerMessage — server → client
// ---------------------------------------------------------------------------

/// Messages the server can send.
///
/// Same internally tagged snake_case format as [`ClientMessage`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// First message on every connection: the id the server assigned and
    /// the server's clock (unix milliseconds) for client-side offset math.
    ConnectionEstablished { player_id: PlayerId, server_time: u64 },

    /// Full snapshot of the visible world, sent once per connection to
    /// seed the client's view. Never broadcast.
    WorldState { state: WorldSnapshot },

    /// Someone joined (broadcast, including to the joiner).
    PlayerJoined { player: Player, total_players: usize },

    /// Someone left. `reason` distinguishes inactivity sweeps from
    /// ordinary disconnects; absent means disconnected.
    PlayerLeft {
        player_id: PlayerId,
        #[serde(skip_serializing_if = "Option::is_none")]
        player_name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        total_players: Option<usize>,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<LeaveReason>,
    },

    /// Someone moved. Coordinates are post-clamp, i.e. authoritative.
    PlayerMoved {
        player_id: PlayerId,
        x: f64,
        y: f64,
        avatar_display: String,
    },

    /// Someone changed their avatar.
    AvatarUpdated { player_id: PlayerId, avatar: AvatarSnapshot },

    /// A chat message was posted (broadcast).
    ChatMessage { message: ChatMessage },

    /// A decorative object appeared (broadcast).
    WorldObjectSpawned { object: WorldObject },

    /// Periodic advisory stats (broadcast every sweep interval).
    GameStats { stats: StatsReport },

    /// Reply to [`ClientMessage::Ping`]: the client's timestamp echoed
    /// back plus the server clock, for round-trip measurement.
    Pong { timestamp: u64, server_time: u64 },

    /// Reply to [`ClientMessage::GetAvatarOptions`].
    AvatarOptions { options: AvatarOptions },
}

// =========================================================================
// Tests
// =========================================================================
