//! World actor: one Tokio task that owns the whole world.
//!
//! The actor drains its command queue one command at a time, applies
//! each fully against [`WorldState`], and emits the resulting events in
//! the same order. No shared mutable state anywhere — every other task
//! talks to the world through a [`WorldHandle`].

use std::collections::BTreeMap;
use std::time::Duration;

use plaza_protocol::{LeaveReason, PlayerId, StatsReport, WorldSnapshot};
use tokio::sync::{mpsc, oneshot};

use crate::{Command, Event, WorldConfig, WorldError, WorldState};

/// Handle to the running world actor. Cheap to clone — it's just an
/// `mpsc::UnboundedSender` wrapper.
///
/// Mutations enqueue and return immediately; [`snapshot`] and [`stats`]
/// await a reply and therefore observe every command enqueued before
/// them.
///
/// [`snapshot`]: WorldHandle::snapshot
/// [`stats`]: WorldHandle::stats
#[derive(Clone)]
pub struct WorldHandle {
    sender: mpsc::UnboundedSender<Command>,
}

impl WorldHandle {
    fn send(&self, cmd: Command) -> Result<(), WorldError> {
        self.sender.send(cmd).map_err(|_| WorldError::Unavailable)
    }

    /// Enqueues a join for `id`. Missing name or avatar fields are
    /// filled in by the world (generated name, random archetype).
    pub fn join(
        &self,
        id: PlayerId,
        name: Option<String>,
        avatar_type: Option<String>,
        accessories: Option<BTreeMap<String, String>>,
    ) -> Result<(), WorldError> {
        self.send(Command::Join {
            id,
            name,
            avatar_type,
            accessories,
        })
    }

    /// Enqueues a leave for `id`. A no-op in the world if the player is
    /// already gone, so callers may send it unconditionally on teardown.
    pub fn leave(&self, id: PlayerId) -> Result<(), WorldError> {
        self.send(Command::Leave { id })
    }

    /// Enqueues a move request. The world scales and clamps; the
    /// authoritative position arrives as an event.
    pub fn move_player(&self, id: PlayerId, x: f64, y: f64) -> Result<(), WorldError> {
        self.send(Command::Move { id, x, y })
    }

    /// Enqueues an avatar swap for `id`.
    pub fn update_avatar(
        &self,
        id: PlayerId,
        avatar_type: Option<String>,
        accessories: Option<BTreeMap<String, String>>,
    ) -> Result<(), WorldError> {
        self.send(Command::UpdateAvatar {
            id,
            avatar_type,
            accessories,
        })
    }

    /// Enqueues a chat message from `id`.
    pub fn chat(&self, id: PlayerId, text: String) -> Result<(), WorldError> {
        self.send(Command::Chat { id, text })
    }

    /// Enqueues an inactivity sweep; removals surface as
    /// [`Event::PlayerLeft`] with reason `inactive`.
    pub fn sweep_inactive(&self, threshold: Duration) -> Result<(), WorldError> {
        self.send(Command::SweepInactive { threshold })
    }

    /// Enqueues spawning a decorative object; `None` picks a random kind.
    pub fn spawn_object(&self, kind: Option<String>) -> Result<(), WorldError> {
        self.send(Command::SpawnObject { kind })
    }

    /// Requests a full world snapshot, sequenced after everything
    /// already in the queue.
    pub async fn snapshot(&self) -> Result<WorldSnapshot, WorldError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::Snapshot { reply: reply_tx })?;
        reply_rx.await.map_err(|_| WorldError::Unavailable)
    }

    /// Requests the current stats counters.
    pub async fn stats(&self) -> Result<StatsReport, WorldError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::Stats { reply: reply_tx })?;
        reply_rx.await.map_err(|_| WorldError::Unavailable)
    }
}

/// The actor proper. Runs inside a Tokio task until every handle drops.
struct WorldActor {
    state: WorldState,
    commands: mpsc::UnboundedReceiver<Command>,
    events: mpsc::UnboundedSender<Event>,
}

impl WorldActor {
    async fn run(mut self) {
        tracing::info!(
            width = self.state.config().width,
            height = self.state.config().height,
            "world actor started"
        );

        while let Some(cmd) = self.commands.recv().await {
            self.apply(cmd);
        }

        tracing::info!("world actor stopped");
    }

    /// Applies one command fully. Emits zero or more events; a command
    /// that changes nothing emits nothing.
    fn apply(&mut self, cmd: Command) {
        match cmd {
            Command::Join {
                id,
                name,
                avatar_type,
                accessories,
            } => {
                let player = self.state.join(id, name, avatar_type, accessories);
                tracing::info!(
                    player_id = %player.id,
                    name = %player.display_name,
                    archetype = %player.avatar.archetype,
                    players = self.state.player_count(),
                    "player joined"
                );
                self.emit(Event::PlayerJoined {
                    player,
                    total_players: self.state.player_count(),
                });
            }
            Command::Leave { id } => {
                if let Some(player) = self.state.leave(id) {
                    tracing::info!(
                        player_id = %id,
                        players = self.state.player_count(),
                        "player left"
                    );
                    self.emit(Event::PlayerLeft {
                        player_id: id,
                        player_name: player.display_name,
                        total_players: self.state.player_count(),
                        reason: LeaveReason::Disconnected,
                    });
                }
            }
            Command::Move { id, x, y } => {
                if let Some((x, y, avatar_display)) = self.state.move_player(id, x, y) {
                    self.emit(Event::PlayerMoved {
                        player_id: id,
                        x,
                        y,
                        avatar_display,
                    });
                }
            }
            Command::UpdateAvatar {
                id,
                avatar_type,
                accessories,
            } => {
                if let Some(avatar) = self.state.update_avatar(id, avatar_type, accessories) {
                    tracing::debug!(
                        player_id = %id,
                        archetype = %avatar.archetype,
                        "avatar updated"
                    );
                    self.emit(Event::AvatarUpdated {
                        player_id: id,
                        avatar,
                    });
                }
            }
            Command::Chat { id, text } => {
                if let Some(message) = self.state.add_chat(id, &text) {
                    self.emit(Event::ChatPosted { message });
                }
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.state.snapshot());
            }
            Command::Stats { reply } => {
                let _ = reply.send(self.state.stats_report());
            }
            Command::SweepInactive { threshold } => {
                let removed = self.state.sweep_inactive(threshold, crate::now_millis());
                for player in removed {
                    tracing::info!(
                        player_id = %player.id,
                        name = %player.display_name,
                        "player removed for inactivity"
                    );
                    self.emit(Event::PlayerLeft {
                        player_id: player.id,
                        player_name: player.display_name,
                        total_players: self.state.player_count(),
                        reason: LeaveReason::Inactive,
                    });
                }
            }
            Command::SpawnObject { kind } => {
                let object = self.state.spawn_object(kind);
                tracing::debug!(object_id = %object.id, kind = %object.kind, "object spawned");
                self.emit(Event::ObjectSpawned { object });
            }
        }
    }

    fn emit(&self, event: Event) {
        // The fan-out dropping its receiver means shutdown; nothing to do.
        let _ = self.events.send(event);
    }
}

/// Spawns the world actor and returns a handle plus the event stream.
///
/// The caller owns the event receiver; the intended consumer is a
/// single fan-out task that turns events into broadcast frames.
pub fn spawn_world(config: WorldConfig) -> (WorldHandle, mpsc::UnboundedReceiver<Event>) {
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    let actor = WorldActor {
        state: WorldState::new(config),
        commands: cmd_rx,
        events: event_tx,
    };

    tokio::spawn(actor.run());

    (WorldHandle { sender: cmd_tx }, event_rx)
}
