//! The canonical world state and its mutation rules.
//!
//! `WorldState` is deliberately a plain synchronous struct — `HashMap`s
//! and a `VecDeque`, no locks, no interior mutability. It is safe only
//! because exactly one task (the [`WorldActor`](crate::spawn_world)) ever
//! holds it. Every method here runs to completion before the next command
//! is looked at, which is what makes each command apply-or-discard.
//!
//! All methods return owned value copies; nothing hands out references
//! into the maps.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use plaza_protocol::{
    AvatarSnapshot, ChatMessage, ObjectId, Player, PlayerId, StatsReport,
    WorldBounds, WorldObject, WorldSnapshot,
};
use rand::Rng;

use crate::avatar;
use crate::WorldConfig;

/// Current wall-clock time in unix milliseconds.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_millis() as u64
}

/// Clamp one axis into `[0, bound]`.
///
/// Order is `min(max(value, 0), bound)`; `max` first also normalizes a
/// NaN input to 0 rather than letting it through.
fn clamp_axis(value: f64, bound: f64) -> f64 {
    value.max(0.0).min(bound)
}

/// Truncate to at most `max` characters, respecting char boundaries.
fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Everything the world knows. Owned exclusively by the world actor.
pub struct WorldState {
    config: WorldConfig,
    players: HashMap<PlayerId, Player>,
    objects: HashMap<ObjectId, WorldObject>,
    /// Bounded ring of recent chat; newest at the back.
    chat: VecDeque<ChatMessage>,
    total_players_joined: u64,
    messages_sent: u64,
    uptime_start: Instant,
    next_chat_id: u64,
    next_object_id: u64,
}

impl WorldState {
    pub fn new(config: WorldConfig) -> Self {
        Self {
            config,
            players: HashMap::new(),
            objects: HashMap::new(),
            chat: VecDeque::new(),
            total_players_joined: 0,
            messages_sent: 0,
            uptime_start: Instant::now(),
            next_chat_id: 1,
            next_object_id: 1,
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    // -----------------------------------------------------------------
    // Joins and leaves
    // -----------------------------------------------------------------

    /// Inserts a player (overwriting any existing entry for the id) at a
    /// random spawn position. Returns a copy of the stored player.
    pub fn join(
        &mut self,
        id: PlayerId,
        name: Option<String>,
        avatar_type: Option<String>,
        accessories: Option<BTreeMap<String, String>>,
    ) -> Player {
        let mut rng = rand::rng();
        let x = rng.random_range(self.config.spawn_min..=self.config.spawn_max);
        let y = rng.random_range(self.config.spawn_min..=self.config.spawn_max);

        let display_name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| format!("Wanderer-{}", rng.random_range(100..1000)));

        let now = now_millis();
        let player = Player {
            id,
            x,
            y,
            display_name,
            avatar: avatar::create(avatar_type.as_deref(), accessories.as_ref()),
            last_seen: now,
            joined_at: now,
        };

        self.players.insert(id, player.clone());
        self.total_players_joined += 1;
        player
    }

    /// Removes a player if present. Returns the removed player so the
    /// caller can report who left; `None` means nothing happened.
    pub fn leave(&mut self, id: PlayerId) -> Option<Player> {
        self.players.remove(&id)
    }

    // -----------------------------------------------------------------
    // Movement
    // -----------------------------------------------------------------

    /// Moves a player: scale the requested position by their avatar's
    /// speed multiplier, then clamp each axis into the world bounds.
    ///
    /// Clamping happens after scaling so a fast avatar heading into a
    /// wall stops exactly at the wall. Returns the authoritative
    /// `(x, y, display glyph)` or `None` for an unknown player.
    pub fn move_player(&mut self, id: PlayerId, x: f64, y: f64) -> Option<(f64, f64, String)> {
        let (width, height) = (self.config.width, self.config.height);
        let player = self.players.get_mut(&id)?;

        let speed = player.avatar.speed_multiplier;
        player.x = clamp_axis(x * speed, width);
        player.y = clamp_axis(y * speed, height);
        player.last_seen = now_millis();

        Some((player.x, player.y, player.avatar.emoji.clone()))
    }

    // -----------------------------------------------------------------
    // Avatars
    // -----------------------------------------------------------------

    /// Replaces a player's avatar snapshot. Returns the new snapshot,
    /// or `None` for an unknown player.
    pub fn update_avatar(
        &mut self,
        id: PlayerId,
        avatar_type: Option<String>,
        accessories: Option<BTreeMap<String, String>>,
    ) -> Option<AvatarSnapshot> {
        let player = self.players.get_mut(&id)?;
        player.avatar = avatar::create(avatar_type.as_deref(), accessories.as_ref());
        player.last_seen = now_millis();
        Some(player.avatar.clone())
    }

    // -----------------------------------------------------------------
    // Chat
    // -----------------------------------------------------------------

    /// Posts a chat message: trim, reject empty, truncate to the char
    /// limit, push into the ring (evicting the oldest past capacity).
    ///
    /// Returns `None` for unknown players or empty text.
    pub fn add_chat(&mut self, id: PlayerId, text: &str) -> Option<ChatMessage> {
        let player = self.players.get(&id)?;

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }

        let message = ChatMessage {
            id: self.next_chat_id,
            author_id: id,
            author_name: player.display_name.clone(),
            author_emoji: player.avatar.emoji.clone(),
            text: truncate_chars(trimmed, self.config.chat_max_chars),
            timestamp: now_millis(),
        };
        self.next_chat_id += 1;

        self.chat.push_back(message.clone());
        while self.chat.len() > self.config.chat_capacity {
            self.chat.pop_front();
        }
        self.messages_sent += 1;

        Some(message)
    }

    // -----------------------------------------------------------------
    // Objects
    // -----------------------------------------------------------------

    /// Spawns a decorative object at a random position inset from the
    /// world edges by the configured margin.
    pub fn spawn_object(&mut self, kind: Option<String>) -> WorldObject {
        const KINDS: &[(&str, &str)] = &[
            ("tree", "🌳"),
            ("rock", "🪨"),
            ("flower", "🌸"),
            ("mushroom", "🍄"),
            ("crystal", "💎"),
            ("lantern", "🏮"),
        ];

        let mut rng = rand::rng();
        let (kind, emoji) = match kind.as_deref().and_then(|k| {
            KINDS.iter().find(|(name, _)| *name == k)
        }) {
            Some((name, emoji)) => (*name, *emoji),
            None => KINDS[rng.random_range(0..KINDS.len())],
        };

        let margin = self.config.object_margin;
        let object = WorldObject {
            id: ObjectId(self.next_object_id),
            kind: kind.to_string(),
            x: rng.random_range(margin..=(self.config.width - margin)),
            y: rng.random_range(margin..=(self.config.height - margin)),
            emoji: emoji.to_string(),
            created_at: now_millis(),
        };
        self.next_object_id += 1;

        self.objects.insert(object.id, object.clone());
        object
    }

    // -----------------------------------------------------------------
    // Inactivity sweep
    // -----------------------------------------------------------------

    /// Removes every player whose `last_seen` is staler than `threshold`
    /// relative to `now` (unix millis). Returns the removed players.
    ///
    /// `now` is a parameter rather than read internally so the sweep is
    /// testable without sleeping.
    pub fn sweep_inactive(&mut self, threshold: Duration, now: u64) -> Vec<Player> {
        let cutoff = threshold.as_millis() as u64;
        let stale: Vec<PlayerId> = self
            .players
            .values()
            .filter(|p| now.saturating_sub(p.last_seen) > cutoff)
            .map(|p| p.id)
            .collect();

        stale
            .into_iter()
            .filter_map(|id| self.players.remove(&id))
            .collect()
    }

    // -----------------------------------------------------------------
    // Read projections
    // -----------------------------------------------------------------

    /// A full copy of the visible world: all players, all objects, the
    /// newest chat (snapshot limit, oldest first), bounds, and stats
    /// computed from the state as it is right now.
    pub fn snapshot(&self) -> WorldSnapshot {
        let chat_skip = self.chat.len().saturating_sub(self.config.chat_snapshot);
        WorldSnapshot {
            players: self.players.values().cloned().collect(),
            objects: self.objects.values().cloned().collect(),
            chat: self.chat.iter().skip(chat_skip).cloned().collect(),
            bounds: WorldBounds {
                width: self.config.width,
                height: self.config.height,
            },
            stats: self.stats_report(),
        }
    }

    /// Counters plus uptime, derived at call time.
    pub fn stats_report(&self) -> StatsReport {
        StatsReport {
            active_players: self.players.len(),
            total_players_joined: self.total_players_joined,
            messages_sent: self.messages_sent,
            uptime_seconds: self.uptime_start.elapsed().as_secs(),
            object_count: self.objects.len(),
        }
    }

    /// Test hook: backdate a player's `last_seen` to simulate idleness.
    #[cfg(test)]
    pub(crate) fn set_last_seen(&mut self, id: PlayerId, last_seen: u64) {
        if let Some(player) = self.players.get_mut(&id) {
            player.last_seen = last_seen;
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
