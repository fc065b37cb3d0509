//! The World State Authority for Plaza.
//!
//! One actor task owns every byte of mutable world state. Commands go in
//! through an ordered queue, events come out in the same order, and no
//! other task ever touches the maps inside — that single-owner loop is
//! the entire concurrency-safety story, so it must stay single.
//!
//! # Key types
//!
//! - [`WorldHandle`] — enqueue commands, await snapshot/stats replies
//! - [`Command`] / [`Event`] — the closed in/out vocabulary of the actor
//! - [`WorldState`] — the state itself (only the actor holds one)
//! - [`WorldConfig`] — bounds, chat limits, sweep threshold
//! - [`avatar`] — the static archetype/accessory catalog

mod actor;
pub mod avatar;
mod command;
mod config;
mod error;
mod state;

pub use actor::{spawn_world, WorldHandle};
pub use command::{Command, Event};
pub use config::WorldConfig;
pub use error::WorldError;
pub use state::{now_millis, WorldState};
