//! The shared data model: value types embedded in wire messages.
//!
//! The world actor owns the only mutable copies of these; everything that
//! leaves the actor is cloned into a message. Nothing in here has
//! behavior beyond construction — behavior lives in `plaza-world`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{ObjectId, PlayerId};

/// An immutable description of how a player looks and moves.
///
/// Produced by the avatar catalog, attached to a [`Player`]. The world
/// reads only `speed_multiplier`; everything else is display data passed
/// through to clients untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvatarSnapshot {
    /// Archetype name, e.g. `"wizard"`.
    pub archetype: String,
    /// Display glyph shown next to movement and chat.
    pub emoji: String,
    /// CSS-style color string for client rendering.
    pub color: String,
    /// Body shape hint (`"circle"`, `"square"`, ...).
    pub shape: String,
    /// Scales requested movement before clamping.
    pub speed_multiplier: f64,
    /// Equipped accessories, slot → item.
    pub accessories: BTreeMap<String, String>,
    /// Archetype base stats plus accessory bonuses.
    pub stats: BTreeMap<String, i64>,
}

/// One player as visible to every client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub x: f64,
    pub y: f64,
    pub display_name: String,
    pub avatar: AvatarSnapshot,
    /// Unix milliseconds of the last move or join. Drives the
    /// inactivity sweep.
    pub last_seen: u64,
    /// Unix milliseconds when the player joined.
    pub joined_at: u64,
}

/// One chat message. Immutable once created; lives in the world's
/// bounded ring until 50 newer messages push it out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: u64,
    pub author_id: PlayerId,
    pub author_name: String,
    pub author_emoji: String,
    pub text: String,
    pub timestamp: u64,
}

/// A decorative object in the world. No removal policy — objects live
/// until the process exits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldObject {
    pub id: ObjectId,
    pub kind: String,
    pub x: f64,
    pub y: f64,
    pub emoji: String,
    pub created_at: u64,
}

/// The playable area. Positions are clamped into `[0, width] × [0, height]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub width: f64,
    pub height: f64,
}

/// Counters and derived figures reported by the world.
///
/// `uptime_seconds` is computed at the moment the report is built, never
/// stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsReport {
    pub active_players: usize,
    pub total_players_joined: u64,
    pub messages_sent: u64,
    pub uptime_seconds: u64,
    pub object_count: usize,
}

/// A full point-in-time copy of the visible world, sent to exactly one
/// session to seed its view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub players: Vec<Player>,
    pub objects: Vec<WorldObject>,
    /// The most recent chat messages, oldest first. Capped at the
    /// snapshot limit (20), not the full ring.
    pub chat: Vec<ChatMessage>,
    pub bounds: WorldBounds,
    pub stats: StatsReport,
}

/// What the avatar catalog offers, for client character pickers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvatarOptions {
    pub archetypes: Vec<String>,
    /// Slot → available items.
    pub accessories: BTreeMap<String, Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_avatar() -> AvatarSnapshot {
        AvatarSnapshot {
            archetype: "wizard".into(),
            emoji: "🧙".into(),
            color: "#7c3aed".into(),
            shape: "circle".into(),
            speed_multiplier: 1.2,
            accessories: BTreeMap::from([("hat".to_string(), "crown".to_string())]),
            stats: BTreeMap::from([("charm".to_string(), 7)]),
        }
    }

    #[test]
    fn test_player_round_trip() {
        let player = Player {
            id: PlayerId(1),
            x: 150.0,
            y: 220.5,
            display_name: "Ada".into(),
            avatar: sample_avatar(),
            last_seen: 1_700_000_000_000,
            joined_at: 1_700_000_000_000,
        };
        let text = serde_json::to_string(&player).unwrap();
        let decoded: Player = serde_json::from_str(&text).unwrap();
        assert_eq!(player, decoded);
    }

    #[test]
    fn test_snapshot_round_trip_empty_world() {
        let snapshot = WorldSnapshot {
            players: vec![],
            objects: vec![],
            chat: vec![],
            bounds: WorldBounds { width: 2000.0, height: 1500.0 },
            stats: StatsReport {
                active_players: 0,
                total_players_joined: 0,
                messages_sent: 0,
                uptime_seconds: 12,
                object_count: 0,
            },
        };
        let text = serde_json::to_string(&snapshot).unwrap();
        let decoded: WorldSnapshot = serde_json::from_str(&text).unwrap();
        assert_eq!(snapshot, decoded);
    }

    #[test]
    fn test_avatar_accessories_serialize_as_object() {
        let json: serde_json::Value =
            serde_json::to_value(sample_avatar()).unwrap();
        assert_eq!(json["accessories"]["hat"], "crown");
        assert_eq!(json["stats"]["charm"], 7);
    }
}
