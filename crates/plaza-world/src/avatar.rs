//! The avatar catalog: static archetype and accessory tables.
//!
//! This is lookup data, not game state — no concurrency, no mutation.
//! The world attaches the produced [`AvatarSnapshot`] to a player and
//! reads back only `speed_multiplier`; everything else is for clients.

use std::collections::BTreeMap;

use plaza_protocol::{AvatarOptions, AvatarSnapshot};
use rand::prelude::IndexedRandom;

/// One row of the archetype table.
struct Archetype {
    name: &'static str,
    emoji: &'static str,
    color: &'static str,
    shape: &'static str,
    speed_multiplier: f64,
    base_stats: &'static [(&'static str, i64)],
}

const ARCHETYPES: &[Archetype] = &[
    Archetype {
        name: "explorer",
        emoji: "🧭",
        color: "#2563eb",
        shape: "circle",
        speed_multiplier: 1.0,
        base_stats: &[("charm", 5), ("agility", 5), ("luck", 5)],
    },
    Archetype {
        name: "wizard",
        emoji: "🧙",
        color: "#7c3aed",
        shape: "circle",
        speed_multiplier: 1.2,
        base_stats: &[("charm", 7), ("agility", 4), ("luck", 6)],
    },
    Archetype {
        name: "robot",
        emoji: "🤖",
        color: "#64748b",
        shape: "square",
        speed_multiplier: 0.8,
        base_stats: &[("charm", 3), ("agility", 3), ("luck", 8)],
    },
    Archetype {
        name: "sprinter",
        emoji: "🐆",
        color: "#f59e0b",
        shape: "triangle",
        speed_multiplier: 1.5,
        base_stats: &[("charm", 4), ("agility", 9), ("luck", 3)],
    },
    Archetype {
        name: "ghost",
        emoji: "👻",
        color: "#e2e8f0",
        shape: "blob",
        speed_multiplier: 1.1,
        base_stats: &[("charm", 6), ("agility", 6), ("luck", 4)],
    },
];

/// Accessory items per slot, each granting one stat bonus.
const ACCESSORY_SLOTS: &[(&str, &[(&str, (&str, i64))])] = &[
    (
        "hat",
        &[
            ("crown", ("charm", 3)),
            ("beanie", ("luck", 1)),
            ("halo", ("charm", 2)),
            ("propeller", ("agility", 1)),
        ],
    ),
    (
        "face",
        &[
            ("sunglasses", ("charm", 2)),
            ("monocle", ("luck", 2)),
            ("mask", ("agility", 1)),
        ],
    ),
    (
        "trail",
        &[
            ("sparkles", ("luck", 2)),
            ("bubbles", ("charm", 1)),
            ("flames", ("agility", 2)),
        ],
    ),
];

fn archetype_by_name(name: &str) -> Option<&'static Archetype> {
    ARCHETYPES.iter().find(|a| a.name == name)
}

fn accessory_bonus(slot: &str, item: &str) -> Option<(&'static str, i64)> {
    let (_, items) = ACCESSORY_SLOTS.iter().find(|(s, _)| *s == slot)?;
    let (_, bonus) = items.iter().find(|(i, _)| *i == item)?;
    Some(*bonus)
}

/// Builds an avatar from a requested archetype and accessory set.
///
/// Unknown or missing archetype names fall back to a random pick;
/// accessory entries that name an unknown slot or item are silently
/// ignored. Stats are the archetype base plus one bonus per equipped
/// accessory.
pub fn create(
    kind: Option<&str>,
    accessories: Option<&BTreeMap<String, String>>,
) -> AvatarSnapshot {
    let archetype = kind
        .and_then(archetype_by_name)
        .unwrap_or_else(|| {
            ARCHETYPES
                .choose(&mut rand::rng())
                .unwrap_or(&ARCHETYPES[0])
        });

    let mut equipped = BTreeMap::new();
    let mut stats: BTreeMap<String, i64> = archetype
        .base_stats
        .iter()
        .map(|(k, v)| (k.to_string(), *v))
        .collect();

    if let Some(requested) = accessories {
        for (slot, item) in requested {
            if let Some((stat, amount)) = accessory_bonus(slot, item) {
                equipped.insert(slot.clone(), item.clone());
                *stats.entry(stat.to_string()).or_insert(0) += amount;
            }
        }
    }

    AvatarSnapshot {
        archetype: archetype.name.to_string(),
        emoji: archetype.emoji.to_string(),
        color: archetype.color.to_string(),
        shape: archetype.shape.to_string(),
        speed_multiplier: archetype.speed_multiplier,
        accessories: equipped,
        stats,
    }
}

/// Lists everything the catalog offers, for client character pickers.
pub fn options() -> AvatarOptions {
    AvatarOptions {
        archetypes: ARCHETYPES.iter().map(|a| a.name.to_string()).collect(),
        accessories: ACCESSORY_SLOTS
            .iter()
            .map(|(slot, items)| {
                (
                    slot.to_string(),
                    items.iter().map(|(item, _)| item.to_string()).collect(),
                )
            })
            .collect(),
    }
}
