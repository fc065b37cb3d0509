//! World configuration.

use std::time::Duration;

/// Tunables for one world instance.
///
/// Multiple worlds with different configs can coexist in one process
/// (tests rely on this — nothing in the world layer is global).
#[derive(Debug, Clone)]
pub struct WorldConfig {
    /// Playable width. Positions are clamped into `[0, width]`.
    pub width: f64,

    /// Playable height. Positions are clamped into `[0, height]`.
    pub height: f64,

    /// How many chat messages the ring retains.
    pub chat_capacity: usize,

    /// How many of the newest chat messages a snapshot includes.
    pub chat_snapshot: usize,

    /// Maximum chat message length in characters; longer text is truncated.
    pub chat_max_chars: usize,

    /// New players spawn at a random position in
    /// `[spawn_min, spawn_max] × [spawn_min, spawn_max]`.
    pub spawn_min: f64,
    pub spawn_max: f64,

    /// Objects spawn inset this far from every edge.
    pub object_margin: f64,

    /// Players idle longer than this are removed by the sweep.
    pub inactive_after: Duration,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 2000.0,
            height: 1500.0,
            chat_capacity: 50,
            chat_snapshot: 20,
            chat_max_chars: 200,
            spawn_min: 100.0,
            spawn_max: 300.0,
            object_margin: 50.0,
            inactive_after: Duration::from_secs(30),
        }
    }
}
