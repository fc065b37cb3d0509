//! Periodic maintenance: inactivity sweeps, stats broadcasts, and the
//! operator summary log.
//!
//! One task per server. Every interval it asks the world to sweep idle
//! players (removals surface through the normal event stream as
//! `player_left` with reason `inactive`), broadcasts a fresh stats
//! report, and rolls the inbound message-rate window. Every third tick
//! it writes a one-line summary to the log.

use std::sync::Arc;
use std::time::Duration;

use plaza_protocol::{Codec, ServerMessage};
use tokio::time::MissedTickBehavior;

use crate::GatewayState;

const TICK: Duration = Duration::from_secs(10);
const SUMMARY_EVERY: u64 = 3;

/// Runs until the world actor goes away.
pub async fn run_maintenance(state: Arc<GatewayState>) {
    let mut ticker = tokio::time::interval(TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick of an interval fires immediately; swallow it so
    // the first sweep happens a full period after startup.
    ticker.tick().await;

    let mut ticks: u64 = 0;
    loop {
        ticker.tick().await;
        ticks += 1;

        if state.world.sweep_inactive(state.sweep_after).is_err() {
            tracing::debug!("world gone, maintenance stopping");
            break;
        }

        let stats = match state.world.stats().await {
            Ok(stats) => stats,
            Err(_) => break,
        };
        let rate = state.finish_rate_window();

        match state.codec.encode(&ServerMessage::GameStats {
            stats: stats.clone(),
        }) {
            Ok(frame) => {
                let dead = state.registry.lock().await.broadcast(&frame);
                for id in dead {
                    let _ = state.world.leave(id);
                }
            }
            Err(e) => tracing::error!(error = %e, "failed to encode stats frame"),
        }

        if ticks % SUMMARY_EVERY == 0 {
            let sessions = state.session_count().await;
            tracing::info!(
                sessions,
                active_players = stats.active_players,
                total_joined = stats.total_players_joined,
                messages_sent = stats.messages_sent,
                objects = stats.object_count,
                uptime_secs = stats.uptime_seconds,
                inbound_per_window = rate,
                "world summary"
            );
        }
    }
}
