//! The command/event vocabulary of the world actor.
//!
//! Both enums are closed on purpose: every variant a session can cause
//! and every broadcast the fan-out can emit is listed here, so dispatch
//! in the actor and in the fan-out is an exhaustive `match`.

use std::collections::BTreeMap;
use std::time::Duration;

use plaza_protocol::{
    AvatarSnapshot, ChatMessage, LeaveReason, Player, PlayerId, StatsReport,
    WorldObject, WorldSnapshot,
};
use tokio::sync::oneshot;

/// Everything that can be asked of the world, in queue order.
///
/// Mutations are fire-and-forget; reads carry a `oneshot` reply channel
/// and observe all commands queued before them.
#[derive(Debug)]
pub enum Command {
    Join {
        id: PlayerId,
        name: Option<String>,
        avatar_type: Option<String>,
        accessories: Option<BTreeMap<String, String>>,
    },
    Leave {
        id: PlayerId,
    },
    Move {
        id: PlayerId,
        x: f64,
        y: f64,
    },
    UpdateAvatar {
        id: PlayerId,
        avatar_type: Option<String>,
        accessories: Option<BTreeMap<String, String>>,
    },
    Chat {
        id: PlayerId,
        text: String,
    },
    Snapshot {
        reply: oneshot::Sender<WorldSnapshot>,
    },
    Stats {
        reply: oneshot::Sender<StatsReport>,
    },
    SweepInactive {
        threshold: Duration,
    },
    SpawnObject {
        kind: Option<String>,
    },
}

/// A state change the world acknowledges, emitted in command order.
///
/// Commands that change nothing (unknown player, empty chat) emit no
/// event at all.
#[derive(Debug, Clone)]
pub enum Event {
    PlayerJoined {
        player: Player,
        total_players: usize,
    },
    PlayerLeft {
        player_id: PlayerId,
        player_name: String,
        total_players: usize,
        reason: LeaveReason,
    },
    PlayerMoved {
        player_id: PlayerId,
        x: f64,
        y: f64,
        avatar_display: String,
    },
    AvatarUpdated {
        player_id: PlayerId,
        avatar: AvatarSnapshot,
    },
    ChatPosted {
        message: ChatMessage,
    },
    ObjectSpawned {
        object: WorldObject,
    },
}
